//! MIDI plumbing for platterrs
//!
//! This module gets raw bytes from a jog wheel into the estimator:
//! - Status nibble classification ([`StatusKind`])
//! - Message parsing and pulse byte extraction ([`MidiMessage`])
//! - The [`PulseSource`] trait with a real (midir) and a scripted implementation
//!
mod engine;
pub mod midir_engine;
pub mod mock_engine;
mod status;

pub use engine::{MidiError, MidiMessage, PulseSource, Result};
pub use midir_engine::{list_input_ports, MidirPulseSource};
pub use mock_engine::MockPulseSource;
pub use status::StatusKind;

// Set default source type
pub type DefaultPulseSource = MidirPulseSource;
