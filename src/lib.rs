pub mod cli;
pub mod config;
pub mod logging;
pub mod midi;
pub mod pulse_loop;
pub mod render;
pub mod smoother;
pub mod state;
pub mod ui;

pub use cli::{validate_device, Args};
pub use pulse_loop::{run_pulse_loop, ForwardMode, PulseLoop};
pub use render::RenderLoop;
pub use smoother::{EstimatorConfig, NotifyOutcome, PulseVelocityEstimator};
pub use state::{create_shared_state, DeckState, SharedState};

/// Waits for a worker thread, logging if it panicked. Returns `false` on panic.
pub fn join_worker<T>(handle: std::thread::JoinHandle<T>, name: &str) -> bool {
    match handle.join() {
        Ok(_) => true,
        Err(_) => {
            log::error!("{} thread panicked", name);
            false
        }
    }
}

#[cfg(not(feature = "test-mock"))]
pub fn handle_device_list() -> Vec<String> {
    midi::list_input_ports()
}

#[cfg(feature = "test-mock")]
pub fn handle_device_list() -> Vec<String> {
    use crate::midi::PulseSource;
    midi::MockPulseSource::new(Vec::<Vec<u8>>::new()).list_devices()
}
