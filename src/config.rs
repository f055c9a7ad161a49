//! Renderer options.
//!
//! Stored as RON; every field has a default so a config file only needs to
//! name what it changes.

use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

use crate::renderer::Rgba;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// DDA step limit; also the depth-buffer value of columns without a wall.
    pub max_depth: u32,
    /// Clear colour. Columns whose ray hits nothing and rows without a
    /// floor/ceiling texture keep it.
    pub background: Rgba,
    /// Colour the floor and ceiling fade into at the horizon.
    pub fog_color: Rgba,
    /// Height of the fog band as a fraction of half the screen.
    pub fog_height: f32,
    /// Darkening applied to the farthest walls and tinted sprites.
    pub wall_tint: f32,
    /// Pixels added to every projected sprite size.
    pub sprite_padding: f32,
    /// Outline sprite rectangles (unclipped and clipped).
    pub debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 50,
            background: 0xFF_20_20_20,
            fog_color: 0xFF_00_00_00,
            fog_height: 0.35,
            wall_tint: 0.75,
            sprite_padding: 1.0,
            debug: false,
        }
    }
}

impl RenderConfig {
    pub fn from_ron_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: Self = ron::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = Self::from_ron_str(&fs::read_to_string(path)?)?;
        log::info!("render config loaded from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_depth",
                reason: "must be at least 1".into(),
            });
        }
        for (field, v) in [("fog_height", self.fog_height), ("wall_tint", self.wall_tint)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{v} is outside 0..=1"),
                });
            }
        }
        if !(self.sprite_padding.is_finite() && self.sprite_padding >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "sprite_padding",
                reason: format!("{} is not a non-negative number", self.sprite_padding),
            });
        }
        Ok(())
    }

    /// Depth-buffer sentinel for columns without a wall.
    #[inline]
    pub fn depth_sentinel(&self) -> f32 {
        self.max_depth as f32
    }
}
