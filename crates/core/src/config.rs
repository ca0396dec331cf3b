use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Settings;

/// Configuration manager for chroma settings
/// Provides a layered configuration system that separates schema, available options, and persisted
/// values Configuration is stored in config.json in the repository root by default
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

/// Available configuration options with validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    pub midi: MidiConfigSchema,
    pub preset: PresetConfigSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidiConfigSchema {
    pub midi_enabled: ConfigOption<bool>,
    pub midi_device: ConfigOption<String>,
    pub midi_channel: ConfigOption<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfigSchema {
    pub preset_dir: ConfigOption<String>,
    pub swatch_size: ConfigOption<u32>,
}

/// Configuration option with validation and available choices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOption<T> {
    pub default: T,
    pub valid_range: Option<(T, T)>,
    pub description: String,
    pub requires_restart: bool,
}

/// Persisted configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub settings: Settings,
    pub created_at: String,
    pub modified_at: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    /// If no path is provided, defaults to 'config.json' in the current working directory
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("config.json"));

        Self {
            config_path,
            settings: Settings::default(),
        }
    }

    /// Load settings from configuration file
    /// Returns default settings if file doesn't exist or is invalid
    pub fn load(&mut self) -> Result<Settings, ConfigError> {
        if !self.config_path.exists() {
            // Create default config file
            self.save()?;
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config_file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Validate version compatibility
        if config_file.version != env!("CARGO_PKG_VERSION") {
            eprintln!(
                "Warning: Config file version {} doesn't match application version {}. Using defaults for new settings.",
                config_file.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        self.settings = config_file.settings;
        Ok(self.settings.clone())
    }

    /// Save current settings to configuration file
    pub fn save(&self) -> Result<(), ConfigError> {
        // Ensure config directory exists (if config is in a subdirectory)
        if let Some(parent) = self.config_path.parent() {
            if parent != Path::new("") && parent != Path::new(".") {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }

        let config_file = ConfigFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            settings: self.settings.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            modified_at: chrono::Utc::now().to_rfc3339(),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Update settings and save to file
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        self.settings = settings;
        self.save()
    }

    /// Get current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get configuration schema with available options
    pub fn schema() -> ConfigSchema {
        ConfigSchema {
            midi: MidiConfigSchema {
                midi_enabled: ConfigOption {
                    default: false,
                    valid_range: None,
                    description: "Enable MIDI device access".to_string(),
                    requires_restart: true,
                },
                midi_device: ConfigOption {
                    default: "None".to_string(),
                    valid_range: None,
                    description: "MIDI device name filter for input and output".to_string(),
                    requires_restart: true,
                },
                midi_channel: ConfigOption {
                    default: 4,
                    valid_range: Some((0, 15)),
                    description: "MIDI channel for outgoing messages (0-indexed)".to_string(),
                    requires_restart: false,
                },
            },
            preset: PresetConfigSchema {
                preset_dir: ConfigOption {
                    default: ".".to_string(),
                    valid_range: None,
                    description: "Directory preset swatches are exported into".to_string(),
                    requires_restart: false,
                },
                swatch_size: ConfigOption {
                    default: 240,
                    valid_range: Some((16, 2048)),
                    description: "Edge length of exported preset swatches in pixels".to_string(),
                    requires_restart: false,
                },
            },
        }
    }

    /// Validate settings against schema
    pub fn validate_settings(settings: &Settings) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let schema = Self::schema();

        if let Some((min, max)) = schema.midi.midi_channel.valid_range {
            if settings.midi_channel < min || settings.midi_channel > max {
                errors.push(format!("midi_channel must be between {} and {}", min, max));
            }
        }

        if let Some((min, max)) = schema.preset.swatch_size.valid_range {
            if settings.swatch_size < min || settings.swatch_size > max {
                errors.push(format!("swatch_size must be between {} and {}", min, max));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Reset settings to defaults
    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.settings = Settings::default();
        self.save()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    ReadError(String),
    WriteError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(msg) => write!(f, "Failed to read config file: {}", msg),
            ConfigError::WriteError(msg) => write!(f, "Failed to write config file: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config file: {}", msg),
            ConfigError::SerializeError(msg) => write!(f, "Failed to serialize config: {}", msg),
            ConfigError::ValidationError(errors) => {
                write!(f, "Config validation errors: {}", errors.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_manager_new() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.json");

        let manager = ConfigManager::new(Some(config_path.clone()));
        assert_eq!(manager.config_path(), config_path);
        assert_eq!(manager.settings(), &Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));

        // Modify settings
        let mut settings = Settings::default();
        settings.midi_enabled = true;
        settings.midi_device = "Test Device".to_string();

        // Save settings
        manager.update_settings(settings.clone()).unwrap();

        // Load into new manager
        let mut manager2 = ConfigManager::new(Some(config_path));
        let loaded_settings = manager2.load().unwrap();

        assert_eq!(loaded_settings.midi_enabled, true);
        assert_eq!(loaded_settings.midi_device, "Test Device");
    }

    #[test]
    fn test_load_missing_file_creates_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("fresh_config.json");

        let mut manager = ConfigManager::new(Some(config_path.clone()));
        let settings = manager.load().unwrap();

        assert_eq!(settings, Settings::default());
        assert!(config_path.exists());
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();

        // Valid settings should pass
        assert!(ConfigManager::validate_settings(&settings).is_ok());

        // Invalid settings should fail
        settings.midi_channel = 20; // Outside valid range
        assert!(ConfigManager::validate_settings(&settings).is_err());

        settings.midi_channel = 4; // Back to valid
        settings.swatch_size = 4; // Outside valid range
        assert!(ConfigManager::validate_settings(&settings).is_err());
    }

    #[test]
    fn test_schema_completeness() {
        let schema = ConfigManager::schema();

        assert!(!schema.midi.midi_device.description.is_empty());
        assert!(schema.midi.midi_channel.valid_range.is_some());
        assert!(schema.preset.swatch_size.valid_range.is_some());
    }
}
