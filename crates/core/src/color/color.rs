use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGB color sample, with an optional alpha channel.
///
/// Alpha is only present when the source image carried one; inbound MIDI
/// never touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
}

/// One of the three MIDI-addressable color components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorComponent {
    Red,
    Green,
    Blue,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Read a single component.
    pub fn get(&self, component: ColorComponent) -> u8 {
        match component {
            ColorComponent::Red => self.r,
            ColorComponent::Green => self.g,
            ColorComponent::Blue => self.b,
        }
    }

    /// Replace a single component, leaving the others (and alpha) intact.
    pub fn set(&mut self, component: ColorComponent, value: u8) {
        match component {
            ColorComponent::Red => self.r = value,
            ColorComponent::Green => self.g = value,
            ColorComponent::Blue => self.b = value,
        }
    }

    /// CSS-style hex rendering, e.g. `#1aa17f`. Alpha is not included.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    /// The swatch shown before any image has been sampled.
    fn default() -> Self {
        Self::new(26, 161, 127)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.a {
            Some(a) => write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, a),
            None => write!(f, "rgb({}, {}, {})", self.r, self.g, self.b),
        }
    }
}
