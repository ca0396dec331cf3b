//! Fixed controller assignment for the effects unit.
//!
//! Each color component drives one parameter of the hardware:
//!
//! ```text
//! CC 1  (mix)   <- red
//! CC 33 (decay) <- green
//! CC 21 (mod)   <- blue
//! ```
//!
//! Outgoing messages go out on MIDI channel 4 (status byte 0xB4) unless
//! the caller overrides the channel.

use serde::{Deserialize, Serialize};

use super::message::encode_control_change;
use crate::color::{channel_to_midi, midi_to_channel, Color, ColorComponent};

/// Controller map constants and translation.
pub struct ControlMapping;

impl ControlMapping {
    /// Mix level, driven by the red channel.
    pub const CC_MIX: u8 = 1;
    /// Decay time, driven by the green channel.
    pub const CC_DECAY: u8 = 33;
    /// Modulation depth, driven by the blue channel.
    pub const CC_MOD: u8 = 21;

    /// MIDI channel for outgoing messages (0-indexed).
    pub const OUTPUT_CHANNEL: u8 = 4;

    /// The color component a controller number drives, if any.
    pub fn component_for_controller(controller: u8) -> Option<ColorComponent> {
        match controller {
            Self::CC_MIX => Some(ColorComponent::Red),
            Self::CC_DECAY => Some(ColorComponent::Green),
            Self::CC_MOD => Some(ColorComponent::Blue),
            _ => None,
        }
    }

    /// Translate an inbound control change to a color component update.
    ///
    /// The 7-bit value is scaled up to the 8-bit channel range. Controllers
    /// outside the map return `None`.
    pub fn translate_cc(controller: u8, value: u8) -> Option<(ColorComponent, u8)> {
        Self::component_for_controller(controller)
            .map(|component| (component, midi_to_channel(value)))
    }

    /// The three outbound control change messages representing a color,
    /// in mix/decay/mod order.
    pub fn color_to_messages(color: &Color, channel: u8) -> [[u8; 3]; 3] {
        let triple = MidiTriple::from_color(color);
        [
            encode_control_change(channel, Self::CC_MIX, triple.mix),
            encode_control_change(channel, Self::CC_DECAY, triple.decay),
            encode_control_change(channel, Self::CC_MOD, triple.modulation),
        ]
    }
}

/// The 7-bit view of a color, one value per hardware parameter.
///
/// Always derived from a [`Color`]; never stored as independent truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiTriple {
    pub mix: u8,
    pub decay: u8,
    pub modulation: u8,
}

impl MidiTriple {
    pub fn from_color(color: &Color) -> Self {
        Self {
            mix: channel_to_midi(color.r),
            decay: channel_to_midi(color.g),
            modulation: channel_to_midi(color.b),
        }
    }
}

impl std::fmt::Display for MidiTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mix={} decay={} mod={}",
            self.mix, self.decay, self.modulation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_cc_full_scale() {
        let update = ControlMapping::translate_cc(ControlMapping::CC_MIX, 127);
        assert_eq!(update, Some((ColorComponent::Red, 255)));
    }

    #[test]
    fn test_translate_cc_all_controllers() {
        assert_eq!(
            ControlMapping::translate_cc(33, 0),
            Some((ColorComponent::Green, 0))
        );
        assert_eq!(
            ControlMapping::translate_cc(21, 64),
            Some((ColorComponent::Blue, 129))
        );
    }

    #[test]
    fn test_unmapped_controller_ignored() {
        assert_eq!(ControlMapping::translate_cc(99, 127), None);
        assert_eq!(ControlMapping::translate_cc(0, 127), None);
    }

    #[test]
    fn test_color_to_messages() {
        let color = Color::new(255, 0, 64);
        let messages =
            ControlMapping::color_to_messages(&color, ControlMapping::OUTPUT_CHANNEL);
        assert_eq!(
            messages,
            [[0xB4, 1, 127], [0xB4, 33, 0], [0xB4, 21, 32]]
        );
    }

    #[test]
    fn test_triple_from_color() {
        let triple = MidiTriple::from_color(&Color::new(255, 128, 0));
        assert_eq!(
            triple,
            MidiTriple {
                mix: 127,
                decay: 64,
                modulation: 0
            }
        );
    }
}
