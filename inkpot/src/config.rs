//! Renderer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ATLAS_HEIGHT, DEFAULT_ATLAS_WIDTH, MAX_ATLAS_SIZE};
use crate::error::RenderResult;
use crate::source::SdfParams;

/// What the atlas does when a glyph no longer fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Report [`RenderError::AtlasFull`](crate::RenderError::AtlasFull).
    #[default]
    Fail,
    /// Double the atlas up to the given bounds, keeping every placement.
    Grow { max_width: usize, max_height: usize },
}

impl OverflowPolicy {
    /// Grow up to the default maximum atlas size.
    pub fn grow() -> Self {
        OverflowPolicy::Grow {
            max_width: MAX_ATLAS_SIZE,
            max_height: MAX_ATLAS_SIZE,
        }
    }
}

/// Configuration for a [`TextRenderer`](crate::TextRenderer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Initial atlas width for each font size.
    pub atlas_width: usize,
    /// Initial atlas height for each font size.
    pub atlas_height: usize,
    /// SDF rasterization parameters.
    pub sdf: SdfParams,
    pub overflow: OverflowPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            atlas_width: DEFAULT_ATLAS_WIDTH,
            atlas_height: DEFAULT_ATLAS_HEIGHT,
            sdf: SdfParams::default(),
            overflow: OverflowPolicy::Fail,
        }
    }
}

impl RendererConfig {
    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = RendererConfig::from_json("{}").unwrap();
        assert_eq!(config, RendererConfig::default());
        assert_eq!(config.atlas_width, 512);
        assert_eq!(config.overflow, OverflowPolicy::Fail);
    }

    #[test]
    fn test_partial_json() {
        let config = RendererConfig::from_json(
            r#"{
                "atlas_width": 256,
                "sdf": { "padding": 3 },
                "overflow": { "mode": "grow", "max_width": 1024, "max_height": 2048 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.atlas_width, 256);
        assert_eq!(config.atlas_height, 512);
        assert_eq!(config.sdf.padding, 3);
        assert_eq!(config.sdf.on_edge_value, 255);
        assert_eq!(
            config.overflow,
            OverflowPolicy::Grow {
                max_width: 1024,
                max_height: 2048
            }
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inkpot.json");
        std::fs::write(&path, r#"{ "atlas_height": 128 }"#).unwrap();
        assert_eq!(RendererConfig::load(&path).unwrap().atlas_height, 128);

        assert!(matches!(
            RendererConfig::load(dir.path().join("missing.json")),
            Err(RenderError::Io(_))
        ));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(RendererConfig::load(&path), Err(RenderError::Config(_))));
    }
}
