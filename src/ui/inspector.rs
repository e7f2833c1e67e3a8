use super::progress::{create_deck_spinner, create_speed_gauge, format_readout, gauge_position};
use crate::state::SharedState;
use indicatif::{MultiProgress, ProgressDrawTarget};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Redraws the deck readout every `interval` until `running` goes false
pub fn run_state_inspector(state: SharedState, interval: Duration, running: Arc<AtomicBool>) {
    let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
    let speed_pb = multi_progress.add(create_speed_gauge());
    let deck_pb = multi_progress.add(create_deck_spinner());

    while running.load(Ordering::SeqCst) {
        let velocity = state.velocity();

        speed_pb.set_position(gauge_position(velocity));
        speed_pb.set_message(format!("{:+.3}x", velocity));

        deck_pb.set_message(format_readout(
            state.is_active(),
            velocity,
            state.position_ms(),
        ));
        deck_pb.tick();

        thread::sleep(interval);
    }

    speed_pb.finish();
    deck_pb.finish();
}
