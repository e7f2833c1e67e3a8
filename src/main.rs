use clap::Parser;
use platterrs::{
    cli::{select_device, validate_device, Args},
    config::Settings,
    handle_device_list, join_worker, logging,
    midi::DefaultPulseSource,
    run_pulse_loop,
    ui::run_state_inspector,
    PulseVelocityEstimator, RenderLoop,
};
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn main() {
    initialize_logging();
    let args = parse_command_line_arguments();
    let devices = get_available_devices();

    if args.device_list {
        list_available_devices(&devices);
        return;
    }

    let settings = match Settings::load(args.config.as_deref(), &args.overrides()) {
        Ok(settings) => settings,
        Err(e) => exit_with_error(format!("Error loading settings: {}", e)),
    };

    let device_name = match resolve_device(&args, &devices) {
        Some(name) => name,
        None => exit_with_error("Error: no MIDI input device selected".to_string()),
    };

    if let Err(error_msg) = validate_device(&device_name, &devices) {
        exit_with_error(error_msg);
    }

    run_deck(&device_name, &settings);
}

fn initialize_logging() {
    if let Err(e) = logging::init_logger() {
        logging::init_stderr_logger();
        log::warn!("File logging unavailable ({}), logging to stderr", e);
    }
    log::info!("Application starting");
}

fn parse_command_line_arguments() -> Args {
    Args::parse()
}

fn get_available_devices() -> Vec<String> {
    handle_device_list()
}

fn list_available_devices(devices: &[String]) {
    println!("Available MIDI devices:");
    for device in devices {
        println!("  - {}", device);
    }
}

fn resolve_device(args: &Args, devices: &[String]) -> Option<String> {
    if let Some(name) = &args.bind_to_device {
        return Some(name.clone());
    }
    if std::io::stdin().is_terminal() {
        select_device(devices)
    } else {
        None
    }
}

fn run_deck(device_name: &str, settings: &Settings) {
    let source = match DefaultPulseSource::new(device_name) {
        Ok(source) => source,
        Err(e) => exit_with_error(format!("Error connecting to MIDI device: {}", e)),
    };
    log::info!("Successfully connected to MIDI device: {}", device_name);
    println!("Successfully connected to MIDI device: {}", device_name);

    let mut estimator = PulseVelocityEstimator::with_system_clock(settings.estimator);
    let state = estimator.state();
    estimator.activate();

    let pulse_handle = run_pulse_loop(source, estimator, settings.forward_mode);

    let mut render = RenderLoop::new(state.clone(), settings.render_block());
    render.start();

    let running = Arc::new(AtomicBool::new(true));
    let inspector_running = running.clone();
    let inspector_state = state.clone();
    let interval = settings.inspector_interval();
    let inspector = thread::spawn(move || {
        run_state_inspector(inspector_state, interval, inspector_running);
    });

    log::info!("Deck running. Press Ctrl+C to exit...");
    println!("\nPress Ctrl+C to exit...");

    // Returns once the device goes away.
    join_worker(pulse_handle, "Pulse loop");

    render.stop();
    running.store(false, Ordering::SeqCst);
    join_worker(inspector, "Inspector");
    log::info!(
        "Deck stopped, final position {:.1} ms",
        state.position_ms()
    );
}

fn exit_with_error(error_msg: String) -> ! {
    log::error!("{}", error_msg);
    eprintln!("{}", error_msg);
    std::process::exit(1);
}
