//! Glyph rasterization using swash
//!
//! Renders a glyph's alpha mask and blits it into its atlas cell. The mask is
//! positioned relative to a pen "dot" on the glyph's baseline so every glyph
//! shares the same baseline alignment inside its cell.

use crate::atlas::{AtlasRegion, AtlasSurface};
use crate::config::Hinting;
use crate::face::FontFace;
use crate::{Result, TextError};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

/// Glyph rasterizer using swash
pub struct GlyphRasterizer {
    /// Swash scale context (caches scaling state)
    scale_context: ScaleContext,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        Self {
            scale_context: ScaleContext::new(),
        }
    }

    /// Rasterize `code_point` into `cell` of `surface`.
    ///
    /// `dot` is the pen position on the baseline, in surface pixels. Mask
    /// pixels falling outside `cell` are clipped. Returns the number of
    /// pixels written.
    pub fn rasterize_into(
        &mut self,
        font: &FontFace,
        code_point: char,
        point_size: f32,
        hinting: Hinting,
        surface: &mut AtlasSurface,
        cell: AtlasRegion,
        dot: (i32, i32),
    ) -> Result<usize> {
        let swash_font = swash::FontRef::from_index(font.data(), font.face_index() as usize)
            .ok_or_else(|| TextError::FontParseError("swash rejected font data".to_string()))?;

        let mut scaler = self
            .scale_context
            .builder(swash_font)
            .size(point_size)
            .hint(hinting == Hinting::Full)
            .build();

        let mut render = Render::new(&[Source::Outline, Source::Bitmap(StrikeWith::BestFit)]);
        render.format(Format::Alpha);
        let image = render.render(&mut scaler, font.glyph_id(code_point));

        // Empty glyph (like space) - nothing to draw
        let Some(image) = image else {
            return Ok(0);
        };

        let placement = image.placement;
        let origin_x = dot.0 + placement.left;
        let origin_y = dot.1 - placement.top;
        let mut written = 0;

        for row in 0..placement.height {
            for col in 0..placement.width {
                let x = origin_x + col as i32;
                let y = origin_y + row as i32;
                if x < 0 || y < 0 || !cell.contains(x as u32, y as u32) {
                    continue;
                }

                let index = (row * placement.width + col) as usize;
                let coverage = image.data.get(index).copied().unwrap_or(0);
                if coverage > 0 {
                    surface.set_coverage(x as u32, y as u32, coverage);
                    written += 1;
                }
            }
        }

        Ok(written)
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_box_glyph_fills_its_cell() {
        let face = FontFace::from_data(testing::font_bytes()).unwrap();
        let mut surface = AtlasSurface::new(64);
        let mut rasterizer = GlyphRasterizer::new();

        // 'A' at 48pt: 28x35, left bearing 1, ascent 35
        let cell = AtlasRegion {
            x: 4,
            y: 4,
            width: 28,
            height: 35,
        };
        let written = rasterizer
            .rasterize_into(
                &face,
                'A',
                48.0,
                Hinting::Full,
                &mut surface,
                cell,
                (4 - 1, 4 + 35),
            )
            .unwrap();

        assert!(written > 0);
        assert!(surface.coverage(4 + 14, 4 + 17).unwrap() > 200);
        // Nothing outside the cell
        assert_eq!(surface.coverage(2, 2), Some(0));
        assert_eq!(surface.coverage(40, 20), Some(0));
        assert_eq!(surface.coverage(18, 45), Some(0));
    }

    #[test]
    fn test_space_writes_nothing() {
        let face = FontFace::from_data(testing::font_bytes()).unwrap();
        let mut surface = AtlasSurface::new(64);
        let cell = AtlasRegion {
            x: 2,
            y: 2,
            width: 30,
            height: 45,
        };
        let written = GlyphRasterizer::default()
            .rasterize_into(&face, ' ', 48.0, Hinting::Full, &mut surface, cell, (2, 38))
            .unwrap();
        assert_eq!(written, 0);
        assert!(surface.as_raw().chunks(4).all(|p| p == [0, 0, 0, 255]));
    }
}
