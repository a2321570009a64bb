//! Glyph table export

use quill_text::{Font, Glyph};
use serde::Serialize;

/// Everything needed to draw with a saved atlas PNG
#[derive(Debug, Serialize)]
pub struct AtlasMetrics {
    pub point_size: f32,
    pub line_height: u32,
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub glyphs: Vec<GlyphMetrics>,
}

#[derive(Debug, Serialize)]
pub struct GlyphMetrics {
    pub code_point: u32,
    pub character: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// 26.6 fixed point
    pub advance: i32,
    pub bearing_h: i32,
    pub bearing_v: i32,
}

impl From<&Glyph> for GlyphMetrics {
    fn from(glyph: &Glyph) -> Self {
        Self {
            code_point: glyph.code_point as u32,
            character: glyph.code_point.to_string(),
            x: glyph.atlas_x,
            y: glyph.atlas_y,
            width: glyph.width,
            height: glyph.height,
            advance: glyph.advance.0,
            bearing_h: glyph.bearing_h,
            bearing_v: glyph.bearing_v,
        }
    }
}

impl AtlasMetrics {
    pub fn from_font(font: &Font) -> Self {
        let (atlas_width, atlas_height) = font.atlas_dimensions();
        Self {
            point_size: font.point_size(),
            line_height: font.line_height(),
            atlas_width,
            atlas_height,
            glyphs: font.glyphs().iter().map(GlyphMetrics::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_text::{build, testing, AtlasConfig};

    #[test]
    fn test_metrics_cover_every_glyph() {
        let font = build(testing::font_bytes(), &AtlasConfig::default()).unwrap();
        let metrics = AtlasMetrics::from_font(&font);

        assert_eq!(metrics.glyphs.len(), 95);
        assert_eq!(metrics.line_height, 45);

        let a = metrics.glyphs.iter().find(|g| g.character == "A").unwrap();
        assert_eq!(a.code_point, 0x41);
        assert_eq!(a.width, 28);
        assert_eq!(a.advance, 1920);

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["atlas_width"], 1024);
        assert_eq!(json["glyphs"][0]["character"], " ");
    }
}
