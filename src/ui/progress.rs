use indicatif::{ProgressBar, ProgressStyle};

/// Velocity gauge range, in multiples of normal speed
pub const GAUGE_MAX_SPEED: f64 = 2.0;
const GAUGE_STEPS: u64 = 200;

pub fn create_speed_gauge() -> ProgressBar {
    let pb = ProgressBar::new(GAUGE_STEPS);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:40.cyan}] {msg}")
            .unwrap()
            .progress_chars("⣀⣤⣦⣶⣷⣿ "),
    );
    pb.set_prefix("Speed");
    pb
}

pub fn create_deck_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {wide_msg}")
            .unwrap(),
    );
    pb.set_prefix("Deck");
    pb
}

/// Gauge position for a velocity; direction is shown in the message, not the bar
pub fn gauge_position(velocity: f64) -> u64 {
    let fraction = (velocity.abs() / GAUGE_MAX_SPEED).clamp(0.0, 1.0);
    (fraction * GAUGE_STEPS as f64).round() as u64
}

pub fn format_readout(active: bool, velocity: f64, position_ms: f64) -> String {
    let direction = if velocity < 0.0 { "rev" } else { "fwd" };
    format!(
        "{} | {:+.3}x {} | position {:.1} s",
        if active { "active" } else { "stopped" },
        velocity,
        direction,
        position_ms / 1000.0
    )
}
