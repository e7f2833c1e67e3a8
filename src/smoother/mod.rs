//! Pulse decoding and velocity estimation
//!
//! The transport thread pushes raw bytes into a [`PulseVelocityEstimator`];
//! the render side reads the published velocity through the
//! [`SharedState`](crate::state::SharedState) handle. Time comes from a
//! [`Clock`] so tests can drive it by hand.

mod clock;
pub mod decode;
mod estimator;

pub use clock::{elapsed_ms, Clock, ManualClock, SystemClock};
pub use decode::{decode_pulse, is_motion, Decoded};
pub use estimator::{EstimatorConfig, EstimatorError, NotifyOutcome, PulseVelocityEstimator};
