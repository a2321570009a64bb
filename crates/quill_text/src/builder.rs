//! Atlas build pass
//!
//! Turns a font and a code point range into a [`Font`]: one populated
//! [`AtlasSurface`] plus the ordered glyph table. The build is all or
//! nothing; any failure aborts it and no partial atlas is returned.

use crate::atlas::{AtlasSurface, RowPacker};
use crate::config::{AtlasConfig, Direction};
use crate::face::FontFace;
use crate::fixed::{Fixed, FixedRect};
use crate::font::Font;
use crate::glyph::{Glyph, GlyphTable};
use crate::rasterizer::GlyphRasterizer;
use crate::{Result, TextError};

/// Metrics for one code point, before it has a cell
struct Measured {
    code_point: char,
    bounds: FixedRect,
    advance: Fixed,
    width: u32,
    height: u32,
}

/// Build a font from raw TTF/OTF bytes
pub fn build(font_bytes: Vec<u8>, config: &AtlasConfig) -> Result<Font> {
    let face = FontFace::from_data(font_bytes)?;
    build_face(&face, config)
}

/// Build a font from an already parsed face
pub fn build_face(face: &FontFace, config: &AtlasConfig) -> Result<Font> {
    config.validate()?;

    if config.direction != Direction::LeftToRight {
        tracing::warn!(
            "{:?} layout is not supported, text will be laid out left to right",
            config.direction
        );
    }

    // Measure the whole range first: the row pitch depends on the tallest
    // cell, and a missing glyph must fail before anything is drawn.
    let measured = (config.low..=config.high)
        .map(|c| measure_glyph(face, c, config))
        .collect::<Result<Vec<_>>>()?;

    let line_height = measured.iter().map(|m| m.height).max().unwrap_or(0);

    let mut surface = AtlasSurface::new(config.atlas_size);
    let mut packer = RowPacker::new(
        config.atlas_size,
        config.atlas_size,
        config.margin,
        line_height,
    );
    let mut rasterizer = GlyphRasterizer::new();
    let mut glyphs = Vec::with_capacity(measured.len());

    for m in &measured {
        let cell = packer.place(m.code_point, m.width, m.height)?;

        // Pen position: the cell's top-left shifted so the glyph's left
        // bearing and ascent land on the cell edges.
        let dot = (
            cell.x as i32 - m.bounds.left_px(),
            cell.y as i32 + m.bounds.ascent_px(),
        );
        let written = rasterizer.rasterize_into(
            face,
            m.code_point,
            config.point_size,
            config.hinting,
            &mut surface,
            cell,
            dot,
        )?;

        tracing::trace!(
            "placed {:?} at ({}, {}) {}x{}, {} pixels",
            m.code_point,
            cell.x,
            cell.y,
            cell.width,
            cell.height,
            written
        );

        glyphs.push(Glyph {
            code_point: m.code_point,
            atlas_x: cell.x,
            atlas_y: cell.y,
            width: m.width,
            height: m.height,
            advance: m.advance,
            bearing_h: m.bounds.left_px(),
            bearing_v: m.bounds.descent_px(),
        });
    }

    tracing::debug!(
        "Built glyph atlas: {} glyphs, line height {}px, {} rows, {:.1}% of {}px atlas",
        glyphs.len(),
        line_height,
        packer.rows(),
        packer.utilization() * 100.0,
        config.atlas_size
    );

    Ok(Font::new(
        GlyphTable::new(config.low, glyphs),
        surface,
        config.point_size,
        line_height,
        config.direction,
    ))
}

/// Bounds, advance and cell size for one code point, including the
/// zero-size fallback
fn measure_glyph(face: &FontFace, code_point: char, config: &AtlasConfig) -> Result<Measured> {
    let (mut bounds, advance) = face
        .glyph_bounds(code_point, config.point_size, config.hinting)
        .ok_or(TextError::GlyphBoundsError(code_point))?;

    let mut width = bounds.width_px();
    let mut height = bounds.height_px();

    // Glyphs without an area (e.g. space) borrow the font's bounding box so
    // every glyph owns a non-empty cell.
    if width == 0 || height == 0 {
        bounds = face.font_bounds(config.point_size, config.hinting);
        width = bounds.width_px();
        height = bounds.height_px();

        // Still empty for very small sizes; one pixel is the minimum
        if width == 0 || height == 0 {
            width = 1;
            height = 1;
        }

        tracing::debug!(
            "{:?} has no area, using {}x{} font bounds",
            code_point,
            width,
            height
        );
    }

    Ok(Measured {
        code_point,
        bounds,
        advance,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Hinting;
    use crate::testing;

    fn build_default() -> Font {
        build(testing::font_bytes(), &AtlasConfig::default()).unwrap()
    }

    #[test]
    fn test_builds_printable_ascii() {
        let font = build_default();
        assert_eq!(font.glyphs().len(), 95);
        assert_eq!(font.atlas_dimensions(), (1024, 1024));

        let codes: Vec<char> = font.glyphs().iter().map(|g| g.code_point).collect();
        let expected: Vec<char> = (' '..='~').collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_glyph_metrics() {
        let font = build_default();

        let a = font.glyph('A').unwrap();
        assert_eq!((a.width, a.height), (28, 35));
        assert_eq!(a.advance, Fixed(1920));
        assert_eq!(a.bearing_h, 1);
        assert_eq!(a.bearing_v, 0);

        let b = font.glyph('B').unwrap();
        assert_eq!(b.advance, Fixed(1728));

        let g = font.glyph('g').unwrap();
        assert_eq!((g.width, g.height), (22, 35));
        assert_eq!(g.bearing_v, 9);
    }

    #[test]
    fn test_first_glyph_sits_at_margin() {
        let font = build_default();
        let space = font.glyph(' ').unwrap();
        assert_eq!((space.atlas_x, space.atlas_y), (2, 2));
    }

    #[test]
    fn test_space_uses_font_bounds() {
        let font = build_default();
        let space = font.glyph(' ').unwrap();
        assert_eq!((space.width, space.height), (30, 45));
        assert_eq!(space.advance_px(), 12);
        assert_eq!(font.line_height(), 45);
    }

    #[test]
    fn test_tiny_unhinted_glyphs_clamp_to_one_pixel() {
        let config = AtlasConfig::default()
            .with_point_size(1.0)
            .with_hinting(Hinting::None);
        let font = build(testing::font_bytes(), &config).unwrap();

        let space = font.glyph(' ').unwrap();
        assert_eq!((space.width, space.height), (1, 1));
        assert!(font.glyphs().iter().all(|g| g.width > 0 && g.height > 0));
    }

    #[test]
    fn test_no_zero_area_cells() {
        for size in [6.0, 12.0, 48.0, 72.0] {
            let config = AtlasConfig::default().with_point_size(size);
            let font = build(testing::font_bytes(), &config).unwrap();
            assert!(
                font.glyphs().iter().all(|g| g.width > 0 && g.height > 0),
                "zero-area glyph at {}pt",
                size
            );
        }
    }

    #[test]
    fn test_cells_are_disjoint_and_inside_the_atlas() {
        for size in [12.0, 48.0, 96.0] {
            let config = AtlasConfig::default().with_point_size(size);
            let font = build(testing::font_bytes(), &config).unwrap();
            let (w, h) = font.atlas_dimensions();
            let regions: Vec<_> = font.glyphs().iter().map(|g| g.region()).collect();

            for (i, a) in regions.iter().enumerate() {
                assert!(a.right() <= w && a.bottom() <= h, "{:?} outside atlas", a);
                for b in &regions[i + 1..] {
                    assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_glyph_pixels_stay_in_their_cells() {
        let font = build_default();
        let atlas = font.atlas();
        let (w, h) = atlas.dimensions();
        let regions: Vec<_> = font.glyphs().iter().map(|g| g.region()).collect();

        for y in 0..h {
            for x in 0..w {
                if atlas.coverage(x, y) != Some(0) {
                    assert!(
                        regions.iter().any(|r| r.contains(x, y)),
                        "stray pixel at ({}, {})",
                        x,
                        y
                    );
                }
            }
        }

        let a = font.glyph('A').unwrap();
        let center = atlas.coverage(a.atlas_x + a.width / 2, a.atlas_y + a.height / 2);
        assert!(center.unwrap() > 200);
    }

    #[test]
    fn test_rows_wrap() {
        let font = build_default();
        let rows: std::collections::BTreeSet<u32> =
            font.glyphs().iter().map(|g| g.atlas_y).collect();
        // 95 cells of ~24px do not fit in one 1024px row
        assert!(rows.len() > 1);
        let pitch = font.line_height() + 2;
        assert!(rows.iter().all(|y| (y - 2) % pitch == 0));
    }

    #[test]
    fn test_overflow_fails_the_build() {
        let config = AtlasConfig::default().with_atlas_size(128);
        let err = build(testing::font_bytes(), &config).unwrap_err();
        assert!(matches!(err, TextError::AtlasFull { .. }));
    }

    #[test]
    fn test_invalid_font_fails() {
        let err = build(vec![0; 64], &AtlasConfig::default()).unwrap_err();
        assert!(matches!(err, TextError::FontParseError(_)));
    }

    #[test]
    fn test_missing_metrics_fail_the_whole_build() {
        let err = build(testing::font_bytes_without_hmtx(), &AtlasConfig::default()).unwrap_err();
        assert!(matches!(err, TextError::GlyphBoundsError(' ')));
    }

    #[test]
    fn test_unsupported_direction_still_builds() {
        let config = AtlasConfig::default().with_direction(Direction::TopToBottom);
        let font = build(testing::font_bytes(), &config).unwrap();
        assert_eq!(font.direction(), Direction::TopToBottom);
        assert_eq!(font.measure(1.0, "AB"), 57.0);
    }

    #[test]
    fn test_sub_range() {
        let config = AtlasConfig::default().with_range('A', 'C');
        let font = build(testing::font_bytes(), &config).unwrap();
        assert_eq!(font.glyphs().len(), 3);
        assert!(font.glyph('@').is_none());
        assert!(font.glyph('D').is_none());
        assert_eq!(font.measure(1.0, "ABCD"), 30.0 + 27.0 + 24.0);
    }

    #[test]
    fn test_out_of_range_settings_fail_without_panicking() {
        let mut config = AtlasConfig::default();
        config.margin = u32::MAX;
        let err = build(testing::font_bytes(), &config).unwrap_err();
        assert!(matches!(err, TextError::InvalidConfig(_)));

        let config = AtlasConfig::default().with_point_size(1.0e8);
        let err = build(testing::font_bytes(), &config).unwrap_err();
        assert!(matches!(err, TextError::InvalidConfig(_)));

        // Accepted, but no glyph fits the atlas
        let config = AtlasConfig::default().with_point_size(crate::config::MAX_POINT_SIZE);
        let err = build(testing::font_bytes(), &config).unwrap_err();
        assert!(matches!(err, TextError::AtlasFull { code_point: ' ', .. }));
    }
}
