//! Pulse byte decoding
//!
//! A jog wheel reports small moves as one data byte. Larger moves are split
//! over two bytes: a byte tagged with the note-off nibble carries the upper
//! seven bits, and the lower seven bits come from the value decoded on the
//! previous call.

use crate::midi::StatusKind;

/// Result of decoding one raw byte against the previously stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A working value ready for the relevance filter
    Complete(i32),
    /// A two-part value whose combined result still carries the note-off nibble
    Incomplete,
}

/// True when `raw` opens a two-part value
pub fn is_two_part(raw: u8) -> bool {
    StatusKind::from_byte(raw) == StatusKind::NoteOff
}

/// Reconstructs the working value for `raw`.
///
/// Single bytes are read as signed, so `0xFF` is one pulse in reverse.
pub fn decode_pulse(stored: i32, raw: u8) -> Decoded {
    if !is_two_part(raw) {
        return Decoded::Complete(i32::from(raw as i8));
    }

    let combined = (i32::from(raw & 0x7F) << 7) | (stored & 0x7F);
    if StatusKind::of_value(combined) == StatusKind::NoteOff {
        Decoded::Incomplete
    } else {
        Decoded::Complete(combined)
    }
}

/// Note releases and channel pressure are not rotation
pub fn is_motion(value: i32) -> bool {
    !matches!(
        StatusKind::of_value(value),
        StatusKind::NoteOff | StatusKind::ChannelPressure
    )
}

/// Applies the relevance filter, zeroing non-motion values
pub fn motion_value(value: i32) -> i32 {
    if is_motion(value) {
        value
    } else {
        0
    }
}
