//! Engine configuration
//!
//! Palette names and static defaults used when the engine has to create a
//! visual frame from scratch.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::encoding::palettes;
use crate::{ChartError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Palette seeding categorical color frames
    pub categorical_palette: String,
    /// Ramp whose end points seed linear color frames (contour included)
    pub sequential_palette: String,
    pub static_color: String,
    pub static_shape: String,
    pub static_texture: String,
    pub static_line: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            categorical_palette: "tableau10".to_string(),
            sequential_palette: "blues".to_string(),
            static_color: "#4e79a7".to_string(),
            static_shape: "circle".to_string(),
            static_texture: "solid".to_string(),
            static_line: "solid".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, name) in [
            ("categorical_palette", &self.categorical_palette),
            ("sequential_palette", &self.sequential_palette),
        ] {
            if palettes::get_color_palette(name).is_none() {
                return Err(ChartError::ConfigError(format!(
                    "Unknown palette '{}' for {}",
                    name, key
                )));
            }
        }

        palettes::color_to_hex(&self.static_color).map_err(ChartError::ConfigError)?;

        let symbol_checks = [
            ("static_shape", &self.static_shape, palettes::SHAPES),
            ("static_texture", &self.static_texture, palettes::TEXTURES),
            ("static_line", &self.static_line, palettes::LINE_DASHES),
        ];
        for (key, value, allowed) in symbol_checks {
            if !allowed.contains(&value.as_str()) {
                return Err(ChartError::ConfigError(format!(
                    "Invalid {} '{}'. Valid values: {}",
                    key,
                    value,
                    allowed.join(", ")
                )));
            }
        }

        Ok(())
    }
}
