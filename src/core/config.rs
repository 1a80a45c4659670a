//! Navigation configuration
//!
//! Loaded from RON or JSON. Missing fields fall back to their defaults, so a
//! file only needs to name what it changes.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ai::PathOptions;

/// Pathfinder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Grid width in tiles
    pub width: usize,
    /// Grid height in tiles
    pub height: usize,
    /// Tile size in world units
    pub tile_size: f32,
    /// World position of the grid's (0, 0) corner
    pub origin: Vec2,
    /// Allow diagonal movement by default
    pub allow_diagonal: bool,
    /// Smooth paths by default
    pub smooth: bool,
    /// Expansion cap per search (None for unbounded)
    pub max_expansions: Option<usize>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            tile_size: 32.0,
            origin: Vec2::ZERO,
            allow_diagonal: true,
            smooth: true,
            max_expansions: None,
        }
    }
}

impl NavConfig {
    /// Set grid dimensions
    #[must_use]
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set tile size
    #[must_use]
    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the grid origin
    #[must_use]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Enable or disable diagonal movement
    #[must_use]
    pub fn with_diagonal(mut self, allow_diagonal: bool) -> Self {
        self.allow_diagonal = allow_diagonal;
        self
    }

    /// Enable or disable smoothing
    #[must_use]
    pub fn with_smoothing(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Cap node expansions per search
    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Default search options described by this config
    #[must_use]
    pub fn path_options(&self) -> PathOptions {
        PathOptions {
            allow_diagonal: self.allow_diagonal,
            smooth: self.smooth,
            max_expansions: self.max_expansions,
        }
    }

    /// Check the values describe a usable grid
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or a non-positive / non-finite tile size
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            log::warn!("Rejecting nav config with size {}x{}", self.width, self.height);
            return Err(ConfigError::Invalid(format!(
                "grid size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            log::warn!("Rejecting nav config with tile size {}", self.tile_size);
            return Err(ConfigError::Invalid(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        Ok(())
    }

    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load the config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load the config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }
}

/// Errors that can occur while loading or validating a config
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// File system error
    IoError(String),
    /// Error serializing data
    SerializeError(String),
    /// Error deserializing data
    DeserializeError(String),
    /// Values that cannot describe a grid
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialize error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
