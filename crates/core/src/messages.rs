use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorComponent};
use crate::midi::{ControlMapping, MidiMessage, MidiTriple};
use crate::preset::SWATCH_SIZE;

/// Commands sent from the caller to the bridge.
#[derive(Debug, Clone)]
pub enum BridgeCommand {
    // Color state
    LoadImage {
        path: PathBuf,
    },
    SetColor {
        color: Color,
    },
    SetComponent {
        component: ColorComponent,
        value: u8,
    },

    // Device
    SendPreset,

    // Export
    SavePreset {
        /// Target directory; falls back to the configured preset dir.
        dir: Option<PathBuf>,
    },

    // System
    Shutdown,
}

/// Events sent from the bridge back to the caller.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    Initialized,
    ColorChanged {
        color: Color,
        triple: MidiTriple,
    },
    MidiMessageReceived {
        message: MidiMessage,
    },
    PresetSent {
        triple: MidiTriple,
    },
    PresetSaved {
        path: PathBuf,
    },
    Error {
        message: String,
    },
    ShutdownComplete,
}

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // MIDI settings
    pub midi_enabled: bool,
    pub midi_device: String,
    pub midi_channel: u8,

    // Preset export settings
    pub preset_dir: String,
    pub swatch_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            midi_enabled: false,
            midi_device: "None".to_string(),
            midi_channel: ControlMapping::OUTPUT_CHANNEL,
            preset_dir: ".".to_string(),
            swatch_size: SWATCH_SIZE,
        }
    }
}
