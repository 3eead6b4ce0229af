//! Page configuration (`motiontask.toml`)
//!
//! ```toml
//! [page]
//! reduced_motion = false
//! viewport_height = 900.0
//! section_top = 0.0
//! section_height = 2400.0
//!
//! [engine]
//! target_fps = 120
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PageError, PageResult};

/// Default config file name
pub const CONFIG_FILE: &str = "motiontask.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PageConfig {
    #[serde(default)]
    pub page: PageSettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Layout and environment settings for the page
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageSettings {
    /// Overrides the environment's reduced-motion signal when set
    #[serde(default)]
    pub reduced_motion: Option<bool>,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// Document offset of the page section (the scroll trigger element)
    #[serde(default)]
    pub section_top: f32,
    #[serde(default = "default_section_height")]
    pub section_height: f32,
}

fn default_viewport_height() -> f32 {
    900.0
}

fn default_section_height() -> f32 {
    2400.0
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            reduced_motion: None,
            viewport_height: default_viewport_height(),
            section_top: 0.0,
            section_height: default_section_height(),
        }
    }
}

/// Animation engine settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_target_fps() -> u32 {
    120
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
        }
    }
}

impl PageConfig {
    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a file
    pub fn load(path: &Path) -> PageResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|source| PageError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from `dir/motiontask.toml`, or defaults if it is absent
    pub fn load_or_default(dir: &Path) -> PageResult<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
