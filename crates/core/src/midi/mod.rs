pub mod mapping;
pub mod message;
pub mod session;

// Re-export for convenience
pub use mapping::{ControlMapping, MidiTriple};
pub use message::{encode_control_change, MidiMessage};
pub use session::{AccessError, DeviceDescriptor, MidiSession, SendError};
