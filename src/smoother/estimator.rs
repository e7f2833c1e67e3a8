use super::clock::{elapsed_ms, Clock, SystemClock};
use super::decode::{decode_pulse, motion_value, Decoded};
use crate::state::{create_shared_state, SharedState};
use chrono::Local;
use log::{debug, info, trace};
use std::error::Error;
use std::fmt;
use std::time::Instant;

/// Rejected construction parameters
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatorError {
    ZeroPulsesPerRevolution,
    InvalidSecondsPerRevolution(f64),
}

impl fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorError::ZeroPulsesPerRevolution => {
                write!(f, "pulses per revolution must be greater than zero")
            }
            EstimatorError::InvalidSecondsPerRevolution(value) => write!(
                f,
                "seconds per revolution must be a positive number, got {}",
                value
            ),
        }
    }
}

impl Error for EstimatorError {}

/// Platter geometry, fixed for the estimator's lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    pulses_per_revolution: u32,
    seconds_per_revolution: f64,
}

impl EstimatorConfig {
    pub fn new(
        pulses_per_revolution: u32,
        seconds_per_revolution: f64,
    ) -> Result<Self, EstimatorError> {
        if pulses_per_revolution == 0 {
            return Err(EstimatorError::ZeroPulsesPerRevolution);
        }
        if !seconds_per_revolution.is_finite() || seconds_per_revolution <= 0.0 {
            return Err(EstimatorError::InvalidSecondsPerRevolution(
                seconds_per_revolution,
            ));
        }

        Ok(Self {
            pulses_per_revolution,
            seconds_per_revolution,
        })
    }

    pub fn pulses_per_revolution(&self) -> u32 {
        self.pulses_per_revolution
    }

    pub fn seconds_per_revolution(&self) -> f64 {
        self.seconds_per_revolution
    }

    /// `value / pulses * seconds * interval`.
    ///
    /// There is no ms to s conversion here. An earlier formula divided by
    /// 1000; whether dropping it was intended is still open.
    pub fn velocity_for(&self, value: i32, interval_ms: f64) -> f64 {
        f64::from(value) / f64::from(self.pulses_per_revolution)
            * self.seconds_per_revolution
            * interval_ms
    }
}

/// What a call to [`PulseVelocityEstimator::notify`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotifyOutcome {
    /// Same byte as last time; nothing changed
    Duplicate,
    /// Two-part decode failed; stored value cleared, velocity untouched
    Incomplete,
    /// Non-motion status; velocity forced to zero
    Filtered,
    /// New velocity published
    Updated(f64),
}

/// Turns jog wheel pulses into a playback-rate multiplier.
///
/// The estimator itself is the single writer and lives on the transport
/// thread. Readers get a [`SharedState`] from [`state`](Self::state) and
/// call `request_advance` on it from the render side.
pub struct PulseVelocityEstimator<C: Clock = SystemClock> {
    config: EstimatorConfig,
    clock: C,
    shared: SharedState,
    session_start: Instant,
    last_event: Option<Instant>,
    last_raw_byte: Option<u8>,
    stored_value: i32,
}

impl PulseVelocityEstimator<SystemClock> {
    pub fn with_system_clock(config: EstimatorConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> PulseVelocityEstimator<C> {
    pub fn new(config: EstimatorConfig, clock: C) -> Self {
        debug!(
            "Creating estimator: {} pulses/rev, {} s/rev (no ms->s scaling applied)",
            config.pulses_per_revolution(),
            config.seconds_per_revolution()
        );

        let session_start = clock.now();
        Self {
            config,
            clock,
            shared: create_shared_state(),
            session_start,
            last_event: None,
            last_raw_byte: None,
            stored_value: 0,
        }
    }

    /// Handle for readers on other threads
    pub fn state(&self) -> SharedState {
        self.shared.clone()
    }

    /// Starts (or restarts) a session. The velocity is kept.
    pub fn activate(&mut self) {
        self.session_start = self.clock.now();
        self.last_event = None;
        self.shared.set_active(true);
        info!(
            "Pulse session activated at {}",
            Local::now().format("%H:%M:%S%.3f")
        );
    }

    pub fn deactivate(&self) {
        self.shared.deactivate();
        info!(
            "Pulse session deactivated, velocity frozen at {}",
            self.shared.velocity()
        );
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    /// Feeds one raw protocol byte.
    ///
    /// This runs whether or not the session is active; keeping bytes away
    /// while stopped is the transport's job.
    pub fn notify(&mut self, raw: u8) -> NotifyOutcome {
        if self.last_raw_byte == Some(raw) {
            trace!("Duplicate pulse byte {:#04X}", raw);
            return NotifyOutcome::Duplicate;
        }

        let now = self.clock.now();
        let since = self.last_event.unwrap_or(self.session_start);
        let interval_ms = elapsed_ms(since, now);
        self.last_event = Some(now);

        let value = match decode_pulse(self.stored_value, raw) {
            Decoded::Complete(value) => value,
            Decoded::Incomplete => {
                debug!("Incomplete two-part pulse {:#04X}, clearing stored value", raw);
                self.stored_value = 0;
                return NotifyOutcome::Incomplete;
            }
        };

        let motion = motion_value(value);
        let velocity = self.config.velocity_for(motion, interval_ms);
        self.shared.publish_velocity(velocity);
        self.stored_value = motion;
        self.last_raw_byte = Some(raw);

        if motion == value {
            trace!(
                "Pulse {:#04X} -> value {} over {} ms, velocity {}",
                raw,
                value,
                interval_ms,
                velocity
            );
            NotifyOutcome::Updated(velocity)
        } else {
            debug!("Non-motion value {:#X} from byte {:#04X}", value, raw);
            NotifyOutcome::Filtered
        }
    }

    pub fn velocity(&self) -> f64 {
        self.shared.velocity()
    }

    pub fn request_advance(&self, elapsed_ms: f64) -> f64 {
        self.shared.request_advance(elapsed_ms)
    }

    /// Value retained for the next two-part decode
    pub fn stored_value(&self) -> i32 {
        self.stored_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoother::ManualClock;

    fn estimator() -> (PulseVelocityEstimator<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = EstimatorConfig::new(360, 1.8).unwrap();
        (PulseVelocityEstimator::new(config, clock.clone()), clock)
    }

    #[test]
    fn test_config_rejects_bad_geometry() {
        assert_eq!(
            EstimatorConfig::new(0, 1.8),
            Err(EstimatorError::ZeroPulsesPerRevolution)
        );
        assert!(EstimatorConfig::new(360, 0.0).is_err());
        assert!(EstimatorConfig::new(360, -1.0).is_err());
        assert!(EstimatorConfig::new(360, f64::NAN).is_err());
        assert!(EstimatorConfig::new(360, f64::INFINITY).is_err());
    }

    #[test]
    fn test_starts_stopped_with_zero_velocity() {
        let (est, _) = estimator();
        assert!(!est.is_active());
        assert_eq!(est.velocity(), 0.0);
        assert_eq!(est.stored_value(), 0);
    }

    #[test]
    fn test_first_interval_measured_from_activation() {
        let (mut est, clock) = estimator();
        clock.advance_ms(50);
        est.activate();
        clock.advance_ms(10);

        let outcome = est.notify(0x05);
        let expected = 5.0 / 360.0 * 1.8 * 10.0;
        assert_eq!(outcome, NotifyOutcome::Updated(expected));
        assert!((est.velocity() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_incomplete_leaves_duplicate_window_open() {
        let (mut est, clock) = estimator();
        est.activate();
        clock.advance_ms(10);
        est.notify(0x05);

        clock.advance_ms(10);
        assert_eq!(est.notify(0x81), NotifyOutcome::Incomplete);
        assert_eq!(est.stored_value(), 0);

        // 0x81 was never recorded as the last byte, so it is decoded again
        clock.advance_ms(10);
        assert_eq!(est.notify(0x81), NotifyOutcome::Incomplete);
    }
}
