//! Raw 3-byte MIDI message decoding and encoding.
//!
//! The status byte packs a 4-bit command in the high nibble and a 4-bit
//! channel (0-indexed) in the low nibble. Data bytes are 7-bit.

use serde::{Deserialize, Serialize};

/// Command nibble for Note Off.
const COMMAND_NOTE_OFF: u8 = 0x8;
/// Command nibble for Note On.
const COMMAND_NOTE_ON: u8 = 0x9;
/// Command nibble for Control Change.
const COMMAND_CONTROL_CHANGE: u8 = 0xB;

/// MIDI message types we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Anything else, kept raw for logging. Never an error.
    Unknown([u8; 3]),
}

impl MidiMessage {
    /// Decode a raw wire message.
    ///
    /// Note On with velocity 0 is semantically Note Off and is normalized
    /// as such. Data bytes from non-conformant devices are clamped to
    /// 0-127 rather than trusted. Returns `None` for truncated input.
    pub fn decode(data: &[u8]) -> Option<MidiMessage> {
        if data.len() < 3 {
            return None;
        }

        let command = data[0] >> 4;
        let channel = data[0] & 0x0F;
        let data1 = data[1].min(127);
        let data2 = data[2].min(127);

        let message = match command {
            COMMAND_NOTE_ON => {
                if data2 > 0 {
                    MidiMessage::NoteOn {
                        channel,
                        note: data1,
                        velocity: data2,
                    }
                } else {
                    // Zero-velocity note ons are treated as note offs.
                    MidiMessage::NoteOff {
                        channel,
                        note: data1,
                    }
                }
            }
            COMMAND_NOTE_OFF => MidiMessage::NoteOff {
                channel,
                note: data1,
            },
            COMMAND_CONTROL_CHANGE => MidiMessage::ControlChange {
                channel,
                controller: data1,
                value: data2,
            },
            _ => MidiMessage::Unknown([data[0], data[1], data[2]]),
        };

        Some(message)
    }
}

/// Encode a Control Change message for the wire.
///
/// `channel` is 0-indexed (0-15, masked); data bytes are clamped to 0-127.
pub fn encode_control_change(channel: u8, controller: u8, value: u8) -> [u8; 3] {
    [
        (COMMAND_CONTROL_CHANGE << 4) | (channel & 0x0F),
        controller.min(127),
        value.min(127),
    ]
}
