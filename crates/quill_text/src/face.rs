//! Font face parsing
//!
//! Wraps ttf-parser and reports glyph bounds and advances in 26.6 pixel
//! units at a given point size (72 DPI).

use crate::config::Hinting;
use crate::fixed::{Fixed, FixedRect};
use crate::{Result, TextError};
use std::sync::Arc;

/// Font metrics in font units (typically 1000 or 2048 units per em)
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    /// Units per em (typically 1000 or 2048)
    pub units_per_em: u16,
    /// Ascender (distance from baseline to top of tallest glyph)
    pub ascender: i16,
    /// Descender (distance from baseline to bottom, typically negative)
    pub descender: i16,
    /// Line gap (additional spacing between lines)
    pub line_gap: i16,
}

impl FontMetrics {
    /// Pixels per font unit at the given point size
    pub fn scale(&self, point_size: f32) -> f32 {
        point_size / self.units_per_em as f32
    }
}

/// A parsed font face
pub struct FontFace {
    /// Raw font data (kept alive for ttf-parser and swash)
    data: Arc<Vec<u8>>,
    /// Face index within the font file (for TTC files)
    face_index: u32,
    metrics: FontMetrics,
    glyph_count: u16,
    /// Font-wide bounding box in font units
    global_bounds: ttf_parser::Rect,
}

impl FontFace {
    /// Load a font from raw TTF/OTF data (uses face index 0)
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Load a font from raw TTF/OTF data with a specific face index
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let data = Arc::new(data);

        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParseError(format!("{:?}", e)))?;

        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        };
        let glyph_count = face.number_of_glyphs();
        let global_bounds = face.global_bounding_box();

        Ok(Self {
            data,
            face_index,
            metrics,
            glyph_count,
            global_bounds,
        })
    }

    /// Load a font from a file path
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            TextError::FontLoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_data(data)
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// Get raw font data for rasterization
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get face index within the font file
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    fn as_ttf_face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index).ok()
    }

    /// Glyph ID for a character; unmapped characters use `.notdef`
    pub fn glyph_id(&self, c: char) -> u16 {
        self.as_ttf_face()
            .and_then(|face| face.glyph_index(c))
            .map(|id| id.0)
            .unwrap_or(0)
    }

    /// Bounds and advance of a glyph at `point_size`.
    ///
    /// Returns `None` when the font has no horizontal metrics for the glyph.
    /// Glyphs without an outline (e.g. space) report empty bounds.
    pub fn glyph_bounds(
        &self,
        c: char,
        point_size: f32,
        hinting: Hinting,
    ) -> Option<(FixedRect, Fixed)> {
        let face = self.as_ttf_face()?;
        let glyph_id = face.glyph_index(c).unwrap_or(ttf_parser::GlyphId(0));
        let advance = face.glyph_hor_advance(glyph_id)?;

        let scale = self.metrics.scale(point_size);
        let bounds = face
            .glyph_bounding_box(glyph_id)
            .map(|rect| FixedRect::from_font_units(rect, scale, hinting))
            .unwrap_or_default();
        let advance = Fixed::from_f32(advance as f32 * scale).hinted(hinting);

        Some((bounds, advance))
    }

    /// The font-wide bounding box at `point_size`
    pub fn font_bounds(&self, point_size: f32, hinting: Hinting) -> FixedRect {
        FixedRect::from_font_units(self.global_bounds, self.metrics.scale(point_size), hinting)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.metrics.units_per_em)
            .field("glyph_count", &self.glyph_count)
            .finish()
    }
}
