/// Event category carried in the high nibble of a protocol byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Below `0x80`: a data byte, not a status
    Data,
    NoteOff,
    NoteOn,
    Aftertouch,
    ControlChange,
    PatchChange,
    ChannelPressure,
    PitchBend,
    /// `0xF0` and up: system common and realtime messages
    System,
}

impl StatusKind {
    pub fn from_byte(byte: u8) -> Self {
        match byte & 0xF0 {
            0x80 => StatusKind::NoteOff,
            0x90 => StatusKind::NoteOn,
            0xA0 => StatusKind::Aftertouch,
            0xB0 => StatusKind::ControlChange,
            0xC0 => StatusKind::PatchChange,
            0xD0 => StatusKind::ChannelPressure,
            0xE0 => StatusKind::PitchBend,
            0xF0 => StatusKind::System,
            _ => StatusKind::Data,
        }
    }

    /// Classifies the low byte of a decoded working value
    pub fn of_value(value: i32) -> Self {
        Self::from_byte((value & 0xFF) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_nibble_classification() {
        assert_eq!(StatusKind::from_byte(0x05), StatusKind::Data);
        assert_eq!(StatusKind::from_byte(0x7F), StatusKind::Data);
        assert_eq!(StatusKind::from_byte(0x81), StatusKind::NoteOff);
        assert_eq!(StatusKind::from_byte(0x9F), StatusKind::NoteOn);
        assert_eq!(StatusKind::from_byte(0xB3), StatusKind::ControlChange);
        assert_eq!(StatusKind::from_byte(0xD0), StatusKind::ChannelPressure);
        assert_eq!(StatusKind::from_byte(0xF8), StatusKind::System);
    }

    #[test]
    fn test_values_use_low_byte() {
        // -43 is 0xD5 as a byte
        assert_eq!(StatusKind::of_value(-43), StatusKind::ChannelPressure);
        assert_eq!(StatusKind::of_value(-1), StatusKind::System);
        assert_eq!(StatusKind::of_value(0x105), StatusKind::Data);
    }
}
