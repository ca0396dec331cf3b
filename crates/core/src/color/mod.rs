pub mod codec;
pub mod color;

// Re-export for convenience
pub use codec::{channel_to_midi, midi_to_channel};
pub use color::{Color, ColorComponent};
