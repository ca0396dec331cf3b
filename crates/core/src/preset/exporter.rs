//! PNG preset export.
//!
//! A preset is a uniform swatch of the current color; the filename carries
//! the three MIDI values, so a shared image doubles as a readable preset
//! (`preset-mix64-decay32-mod127.png`). Re-sampling an exported swatch
//! recovers the color exactly.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use thiserror::Error;

use crate::color::Color;
use crate::midi::MidiTriple;

/// Edge length of the exported swatch in pixels.
pub const SWATCH_SIZE: u32 = 240;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to encode preset image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write preset image: {0}")]
    Io(#[from] std::io::Error),
}

/// The export filename for a color, derived from its MIDI triple.
pub fn preset_filename(color: &Color) -> String {
    let triple = MidiTriple::from_color(color);
    format!(
        "preset-mix{}-decay{}-mod{}.png",
        triple.mix, triple.decay, triple.modulation
    )
}

/// Write a swatch of `color` into `dir`, returning the full path.
///
/// The swatch keeps the alpha channel when the color carries one.
pub fn save_preset(color: &Color, dir: &Path, swatch_size: u32) -> Result<PathBuf, PresetError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(preset_filename(color));

    match color.a {
        Some(a) => {
            let swatch = RgbaImage::from_pixel(
                swatch_size,
                swatch_size,
                Rgba([color.r, color.g, color.b, a]),
            );
            swatch.save(&path)?;
        }
        None => {
            let swatch =
                RgbImage::from_pixel(swatch_size, swatch_size, Rgb([color.r, color.g, color.b]));
            swatch.save(&path)?;
        }
    }

    log::info!("Preset saved to {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sampler::sample_file;

    #[test]
    fn test_filename_encodes_midi_values() {
        assert_eq!(
            preset_filename(&Color::new(255, 0, 64)),
            "preset-mix127-decay0-mod32.png"
        );
    }

    #[test]
    fn test_save_and_resample_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let color = Color::new(200, 100, 50);

        let path = save_preset(&color, temp_dir.path(), 16).unwrap();
        assert!(path.ends_with("preset-mix100-decay50-mod25.png"));

        let sampled = sample_file(&path).unwrap();
        assert_eq!(sampled, color);
    }

    #[test]
    fn test_save_preserves_alpha_channel() {
        let temp_dir = TempDir::new().unwrap();
        let color = Color::with_alpha(10, 20, 30, 128);

        let path = save_preset(&color, temp_dir.path(), 4).unwrap();
        let sampled = sample_file(&path).unwrap();
        assert_eq!(sampled, color);
    }
}
