use crate::midi::{MidiError, PulseSource, Result};
use std::collections::VecDeque;

/// Replays a fixed script of raw messages, then reports a disconnect
pub struct MockPulseSource {
    script: VecDeque<Vec<u8>>,
}

impl MockPulseSource {
    pub fn new<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        MockPulseSource {
            script: messages.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl PulseSource for MockPulseSource {
    fn recv(&mut self) -> Result<Vec<u8>> {
        self.script.pop_front().ok_or(MidiError::Disconnected)
    }

    fn list_devices(&self) -> Vec<String> {
        vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()]
    }
}
