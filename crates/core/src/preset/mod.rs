pub mod exporter;

pub use exporter::{preset_filename, save_preset, PresetError, SWATCH_SIZE};
