pub use bridge::ColorBridge;
pub use color::codec::{channel_to_midi, midi_to_channel};
pub use color::color::{Color, ColorComponent};
pub use config::{ConfigError, ConfigManager, ConfigSchema};
pub use messages::{BridgeCommand, BridgeEvent, Settings};
pub use midi::mapping::{ControlMapping, MidiTriple};
pub use midi::message::{encode_control_change, MidiMessage};
pub use midi::session::{AccessError, DeviceDescriptor, MidiSession, SendError};
pub use preset::exporter::{preset_filename, save_preset, PresetError, SWATCH_SIZE};
pub use sampler::sampler::{sample, sample_file, SampleError};

mod bridge;
mod color;
mod config;
pub mod messages;
mod midi;
mod preset;
mod sampler;
