//! Configuration parsing and management for the character creator

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::customize::AttachmentKind;
use crate::error::{ConfigError, CreatorError};
use crate::scene::LayerMask;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rotation: RotationConfig,
    pub outfits: Vec<OutfitConfig>,
    pub attachments: Vec<AttachmentConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CreatorError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, CreatorError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, CreatorError> {
        let paths = [
            PathBuf::from("character.toml"),
            PathBuf::from("config/character.toml"),
            dirs_path().join("character.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CreatorError> {
        self.rotation.validate()?;

        for (i, outfit) in self.outfits.iter().enumerate() {
            if outfit.renderer.is_empty() {
                return Err(ConfigError::MissingField(format!("outfits[{}].renderer", i)).into());
            }
            if outfit.meshes.is_empty() {
                tracing::warn!("Outfit '{}' has no meshes, cycling it is a no-op", outfit.renderer);
            }
        }
        if self.outfits.len() > 1 {
            tracing::warn!(
                "{} outfits configured, only the first one is cycled",
                self.outfits.len()
            );
        }

        let mut seen = HashSet::new();
        for (i, attachment) in self.attachments.iter().enumerate() {
            if !seen.insert(attachment.kind) {
                tracing::warn!(
                    "Attachment kind '{}' configured more than once, the last entry wins",
                    attachment.kind
                );
            }
            if !attachment.variants.is_empty()
                && attachment.start_index >= attachment.variants.len()
            {
                return Err(ConfigError::InvalidValue {
                    field: format!("attachments[{}].start_index", i),
                    message: format!(
                        "Start index {} is out of range for {} variants",
                        attachment.start_index,
                        attachment.variants.len()
                    ),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Drag and auto rotation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Manual rotation speed multiplier (0 - 20)
    pub manual_speed: f32,
    /// Rotate automatically while the character is not being dragged
    pub auto_enabled: bool,
    /// Auto rotation speed in degrees per second (0 - 50)
    pub auto_speed: f32,
    /// Auto rotation direction, positive = clockwise (-1 - 1)
    pub auto_direction: f32,
    /// Idle seconds after a drag before auto rotation resumes (0 - 1)
    pub resume_delay: f32,
    /// Collision layers considered when hit testing the character
    pub character_layers: LayerMask,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            manual_speed: 10.0,
            auto_enabled: true,
            auto_speed: 30.0,
            auto_direction: 1.0,
            resume_delay: 0.5,
            character_layers: LayerMask::ALL,
        }
    }
}

impl RotationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("rotation.manual_speed", self.manual_speed, 0.0, 20.0)?;
        check_range("rotation.auto_speed", self.auto_speed, 0.0, 50.0)?;
        check_range("rotation.auto_direction", self.auto_direction, -1.0, 1.0)?;
        check_range("rotation.resume_delay", self.resume_delay, 0.0, 1.0)?;
        Ok(())
    }
}

fn check_range(field: &str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be between {} and {}", min, max),
        })
    }
}

/// An outfit: one renderer and the meshes it can show
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutfitConfig {
    /// Name of the skinned mesh renderer
    pub renderer: String,
    /// Ordered mesh names
    pub meshes: Vec<String>,
    /// Mesh assigned at startup (defaults to the first mesh)
    pub initial_mesh: Option<String>,
}

/// One attachment category and its variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentConfig {
    pub kind: AttachmentKind,
    /// Ordered variant object names
    #[serde(default)]
    pub variants: Vec<String>,
    /// Index of the variant that is active in the authored scene
    #[serde(default)]
    pub start_index: usize,
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("character-creator");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/character-creator");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/character-creator");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("character-creator");
        }
    }

    PathBuf::from(".")
}
