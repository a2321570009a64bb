//! Atlas build configuration
//!
//! Settings can be constructed in code or read from the `[atlas]` table of a
//! TOML file:
//!
//! ```toml
//! point_size = 32.0
//! low = " "
//! high = "~"
//! atlas_size = 512
//! ```

use crate::{Result, TextError};
use serde::{Deserialize, Serialize};

/// Lowest code point of the default printable ASCII range
pub const DEFAULT_LOW: char = ' ';
/// Highest code point of the default printable ASCII range
pub const DEFAULT_HIGH: char = '~';

/// Largest accepted point size: one em in 26.6 units stays within half the
/// `i32` range
pub const MAX_POINT_SIZE: f32 = (i32::MAX / 2 / 64) as f32;

/// Direction in which strings should be laid out
///
/// Only [`Direction::LeftToRight`] is laid out; the others are accepted and
/// fall back to left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// E.g. Latin
    #[default]
    LeftToRight,
    /// E.g. Arabic
    RightToLeft,
    /// E.g. Chinese
    TopToBottom,
}

/// Glyph hinting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hinting {
    /// Unhinted outlines, fractional bounds
    None,
    /// Bounds rounded out to whole pixels, advances rounded to whole pixels
    #[default]
    Full,
}

/// Configuration for building a glyph atlas
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Font size in points (72 DPI, so points equal pixels)
    pub point_size: f32,
    /// First code point rasterized into the atlas
    pub low: char,
    /// Last code point rasterized into the atlas (inclusive)
    pub high: char,
    /// Width and height of the square atlas surface in pixels
    pub atlas_size: u32,
    /// Pixels left between neighbouring glyph cells
    pub margin: u32,
    pub hinting: Hinting,
    pub direction: Direction,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            point_size: 48.0,
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
            atlas_size: 1024,
            margin: 2,
            hinting: Hinting::Full,
            direction: Direction::LeftToRight,
        }
    }
}

impl AtlasConfig {
    /// Parse a configuration from TOML, filling missing fields with defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: AtlasConfig =
            toml::from_str(source).map_err(|e| TextError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_point_size(mut self, point_size: f32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_range(mut self, low: char, high: char) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_atlas_size(mut self, atlas_size: u32) -> Self {
        self.atlas_size = atlas_size;
        self
    }

    pub fn with_hinting(mut self, hinting: Hinting) -> Self {
        self.hinting = hinting;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Number of code points in `[low, high]`
    pub fn glyph_count(&self) -> usize {
        (self.high as u32).saturating_sub(self.low as u32) as usize + 1
    }

    /// Check that the configuration describes a buildable atlas
    pub fn validate(&self) -> Result<()> {
        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(TextError::InvalidConfig(format!(
                "point size must be positive, got {}",
                self.point_size
            )));
        }
        if self.point_size > MAX_POINT_SIZE {
            return Err(TextError::InvalidConfig(format!(
                "point size {} exceeds the maximum of {}",
                self.point_size, MAX_POINT_SIZE
            )));
        }
        if self.low > self.high {
            return Err(TextError::InvalidConfig(format!(
                "empty code point range {:?}..={:?}",
                self.low, self.high
            )));
        }
        if self.atlas_size == 0 {
            return Err(TextError::InvalidConfig("atlas size must be non-zero".into()));
        }
        if self.margin >= self.atlas_size {
            return Err(TextError::InvalidConfig(format!(
                "margin {} leaves no room in a {}px atlas",
                self.margin, self.atlas_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_printable_ascii() {
        let config = AtlasConfig::default();
        assert_eq!(config.glyph_count(), 95);
        assert_eq!(config.atlas_size, 1024);
        assert_eq!(config.margin, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = AtlasConfig::from_toml_str(
            r#"
            point_size = 24.0
            high = "Z"
            direction = "right-to-left"
            hinting = "none"
            "#,
        )
        .unwrap();

        assert_eq!(config.point_size, 24.0);
        assert_eq!(config.low, ' ');
        assert_eq!(config.high, 'Z');
        assert_eq!(config.direction, Direction::RightToLeft);
        assert_eq!(config.hinting, Hinting::None);
        assert_eq!(config.atlas_size, 1024);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let reversed = AtlasConfig::default().with_range('z', 'a');
        assert!(matches!(reversed.validate(), Err(TextError::InvalidConfig(_))));

        let zero_size = AtlasConfig::default().with_point_size(0.0);
        assert!(matches!(zero_size.validate(), Err(TextError::InvalidConfig(_))));

        let no_atlas = AtlasConfig::default().with_atlas_size(0);
        assert!(matches!(no_atlas.validate(), Err(TextError::InvalidConfig(_))));

        assert!(AtlasConfig::from_toml_str("point_size = \"big\"").is_err());
    }

    #[test]
    fn test_margin_must_fit_in_atlas() {
        let mut config = AtlasConfig::default();
        config.margin = u32::MAX;
        assert!(matches!(config.validate(), Err(TextError::InvalidConfig(_))));

        config.margin = config.atlas_size;
        assert!(matches!(config.validate(), Err(TextError::InvalidConfig(_))));

        assert!(AtlasConfig::from_toml_str("margin = 4294967295").is_err());

        config.margin = config.atlas_size - 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_point_size_upper_bound() {
        let huge = AtlasConfig::default().with_point_size(1.0e8);
        assert!(matches!(huge.validate(), Err(TextError::InvalidConfig(_))));

        let largest = AtlasConfig::default().with_point_size(MAX_POINT_SIZE);
        assert!(largest.validate().is_ok());
    }
}
