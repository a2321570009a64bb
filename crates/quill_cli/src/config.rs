//! `quill.toml` handling
//!
//! ```toml
//! [atlas]
//! point_size = 32.0
//! atlas_size = 512
//! hinting = "none"
//! ```
//!
//! Every key is optional; command-line flags override file values.

use anyhow::{Context, Result};
use quill_text::AtlasConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "quill.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub atlas: AtlasConfig,
}

impl QuillConfig {
    /// Load `path`, or `quill.toml` from the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: QuillConfig = toml::from_str(content)?;
        config.atlas.validate()?;
        Ok(config)
    }
}
