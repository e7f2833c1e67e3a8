use super::status::StatusKind;
use std::error::Error;
use std::fmt;

/// Custom error type for MIDI operations
#[derive(Debug)]
pub enum MidiError {
    /// No input port matched the requested name
    DeviceNotFound(String),
    /// Error when connecting to a MIDI device
    ConnectionError(String),
    /// The source has no more messages to deliver
    Disconnected,
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::DeviceNotFound(name) => write!(f, "MIDI device not found: {}", name),
            MidiError::ConnectionError(msg) => write!(f, "MIDI connection error: {}", msg),
            MidiError::Disconnected => write!(f, "MIDI source disconnected"),
        }
    }
}

impl Error for MidiError {}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl<T> From<midir::ConnectError<T>> for MidiError {
    fn from(e: midir::ConnectError<T>) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// The messages the pulse loop cares about
#[derive(Debug, Clone, PartialEq)]
pub enum MidiMessage {
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    /// Any other channel message; `data` is its last byte
    Channel { kind: StatusKind, channel: u8, data: u8 },
    /// MIDI Start message
    Start,
    /// MIDI Stop message
    Stop,
    /// MIDI Continue message
    Continue,
    /// Other system messages (clock, sysex, ...)
    System(u8),
}

impl MidiMessage {
    pub fn parse(data: &[u8]) -> Option<MidiMessage> {
        let status = *data.first()?;

        match StatusKind::from_byte(status) {
            StatusKind::Data => None,
            StatusKind::ControlChange if data.len() >= 3 => Some(MidiMessage::ControlChange {
                channel: status & 0x0F,
                controller: data[1],
                value: data[2],
            }),
            StatusKind::System => Some(match status {
                0xFA => MidiMessage::Start,
                0xFC => MidiMessage::Stop,
                0xFB => MidiMessage::Continue,
                other => MidiMessage::System(other),
            }),
            kind if data.len() >= 2 => Some(MidiMessage::Channel {
                kind,
                channel: status & 0x0F,
                data: data[data.len() - 1],
            }),
            _ => None,
        }
    }

    /// The relative-motion byte carried by this message, if any.
    ///
    /// Note releases and channel pressure never carry motion. With a
    /// controller filter only control changes on that controller count.
    pub fn pulse_byte(&self, controller: Option<u8>) -> Option<u8> {
        match (self, controller) {
            (MidiMessage::ControlChange { value, .. }, None) => Some(*value),
            (
                MidiMessage::ControlChange {
                    controller: number,
                    value,
                    ..
                },
                Some(wanted),
            ) if *number == wanted => Some(*value),
            (
                MidiMessage::Channel {
                    kind: StatusKind::NoteOff | StatusKind::ChannelPressure,
                    ..
                },
                _,
            ) => None,
            (MidiMessage::Channel { data, .. }, None) => Some(*data),
            _ => None,
        }
    }
}

/// Anything that can hand over raw MIDI messages one at a time
pub trait PulseSource: Send {
    /// Blocks until the next raw message arrives
    fn recv(&mut self) -> Result<Vec<u8>>;

    fn list_devices(&self) -> Vec<String>;
}
