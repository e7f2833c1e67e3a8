use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// An `f64` stored as its bit pattern in an `AtomicU64`
#[derive(Debug)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.0.load(order))
    }

    pub fn store(&self, value: f64, order: Ordering) {
        self.0.store(value.to_bits(), order);
    }
}

/// State shared between the pulse thread (writer) and the render side (readers).
///
/// Only the velocity, the activation flag and the rendered playback position
/// live here. Everything the decoder needs stays private to the estimator.
#[derive(Debug)]
pub struct DeckState {
    velocity: AtomicF64,
    active: AtomicBool,
    position_ms: AtomicF64,
}

pub type SharedState = Arc<DeckState>;

impl Default for DeckState {
    fn default() -> Self {
        Self {
            velocity: AtomicF64::new(0.0),
            active: AtomicBool::new(false),
            position_ms: AtomicF64::new(0.0),
        }
    }
}

impl DeckState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback-rate multiplier
    pub fn velocity(&self) -> f64 {
        self.velocity.load(Ordering::Acquire)
    }

    pub(crate) fn publish_velocity(&self, velocity: f64) {
        self.velocity.store(velocity, Ordering::Release);
    }

    /// Milliseconds of audio to advance for `elapsed_ms` of wall-clock time.
    ///
    /// Never blocks, so it is safe to call from an audio callback. No bounds
    /// checking is done on `elapsed_ms`; zero and negative values pass through.
    pub fn request_advance(&self, elapsed_ms: f64) -> f64 {
        self.velocity() * elapsed_ms
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    /// Stops the session. Pulses already in flight may still land (last write wins).
    pub fn deactivate(&self) {
        self.set_active(false);
    }

    /// Playback position accumulated by the render loop
    pub fn position_ms(&self) -> f64 {
        self.position_ms.load(Ordering::Acquire)
    }

    pub(crate) fn advance_position(&self, delta_ms: f64) -> f64 {
        // Single writer (the render loop), so load/store is enough.
        let position = self.position_ms() + delta_ms;
        self.position_ms.store(position, Ordering::Release);
        position
    }
}

pub fn create_shared_state() -> SharedState {
    Arc::new(DeckState::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f64_round_trips_negative_values() {
        let cell = AtomicF64::new(0.0);
        cell.store(-1.25, Ordering::Release);
        assert_eq!(cell.load(Ordering::Acquire), -1.25);
    }

    #[test]
    fn test_request_advance_scales_velocity() {
        let state = DeckState::new();
        state.publish_velocity(0.5);
        assert_eq!(state.request_advance(20.0), 10.0);
        assert_eq!(state.request_advance(0.0), 0.0);
        assert_eq!(state.request_advance(-4.0), -2.0);
    }

    #[test]
    fn test_position_accumulates() {
        let state = DeckState::new();
        state.advance_position(10.0);
        state.advance_position(-2.5);
        assert_eq!(state.position_ms(), 7.5);
    }
}
