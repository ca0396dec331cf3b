//! Conversion between 8-bit color channels and 7-bit MIDI values.
//!
//! The ratio 127/255 is not representable in fixed point, so round-trips
//! can drift by ±1 at intermediate values. The endpoints are exact:
//! 0 ↔ 0 and 255 ↔ 127. Halves round away from zero.

/// Scale an 8-bit color channel (0-255) down to a 7-bit MIDI value (0-127).
pub fn channel_to_midi(channel: u8) -> u8 {
    (channel as f64 * (127.0 / 255.0)).round() as u8
}

/// Scale a 7-bit MIDI value (0-127) up to an 8-bit color channel (0-255).
///
/// Values above 127 from a non-conformant device are clamped, not trusted.
pub fn midi_to_channel(midi: u8) -> u8 {
    (midi.min(127) as f64 * (255.0 / 127.0)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_exact() {
        assert_eq!(channel_to_midi(0), 0);
        assert_eq!(channel_to_midi(255), 127);
        assert_eq!(midi_to_channel(0), 0);
        assert_eq!(midi_to_channel(127), 255);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        // 128 * 127/255 = 63.74..., must not land on 63 via truncation
        assert_eq!(channel_to_midi(128), 64);
    }

    #[test]
    fn test_midi_round_trip_within_one() {
        for m in 0..=127u8 {
            let back = channel_to_midi(midi_to_channel(m));
            assert!(
                (back as i16 - m as i16).abs() <= 1,
                "midi {} round-tripped to {}",
                m,
                back
            );
        }
    }

    #[test]
    fn test_channel_round_trip_within_one() {
        for c in 0..=255u8 {
            let back = midi_to_channel(channel_to_midi(c));
            assert!(
                (back as i16 - c as i16).abs() <= 1,
                "channel {} round-tripped to {}",
                c,
                back
            );
        }
    }

    #[test]
    fn test_out_of_range_midi_clamped() {
        assert_eq!(midi_to_channel(200), 255);
    }
}
