//! Terminal readout
//!
//! A speed gauge and a deck spinner showing activation, velocity and the
//! render position. Built on indicatif.

mod inspector;
mod progress;

pub use inspector::run_state_inspector;
pub use progress::{create_deck_spinner, create_speed_gauge, format_readout, gauge_position};
