//! Per-glyph atlas placement and metrics

use crate::atlas::AtlasRegion;
use crate::fixed::Fixed;

/// One rasterized character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Character this glyph represents
    pub code_point: char,
    /// Left edge of the glyph's cell in the atlas (pixels)
    pub atlas_x: u32,
    /// Top edge of the glyph's cell in the atlas (pixels)
    pub atlas_y: u32,
    /// Cell width in pixels
    pub width: u32,
    /// Cell height in pixels
    pub height: u32,
    /// Horizontal pen advance in 1/64 pixels
    pub advance: Fixed,
    /// Offset from the pen position to the glyph's left edge (pixels)
    pub bearing_h: i32,
    /// Offset from the glyph's bottom edge up to the baseline (pixels)
    pub bearing_v: i32,
}

impl Glyph {
    /// The glyph's cell in the atlas
    pub fn region(&self) -> AtlasRegion {
        AtlasRegion {
            x: self.atlas_x,
            y: self.atlas_y,
            width: self.width,
            height: self.height,
        }
    }

    /// Advance in whole pixels (the 26.6 advance shifted down by 6)
    pub fn advance_px(&self) -> i32 {
        self.advance.to_pixels()
    }
}

/// Glyphs for a contiguous code point range, indexed by `code_point - first`
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    first: u32,
    glyphs: Vec<Glyph>,
}

impl GlyphTable {
    pub fn new(first: char, glyphs: Vec<Glyph>) -> Self {
        Self {
            first: first as u32,
            glyphs,
        }
    }

    /// Look up a code point; anything outside `[first, first + len)` is `None`
    pub fn get(&self, c: char) -> Option<&Glyph> {
        let index = (c as u32).checked_sub(self.first)?;
        self.glyphs.get(index as usize)
    }

    /// First code point in the table
    pub fn first(&self) -> char {
        char::from_u32(self.first).unwrap_or('\0')
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Glyph> {
        self.glyphs.iter()
    }

    pub fn as_slice(&self) -> &[Glyph] {
        &self.glyphs
    }
}

impl<'a> IntoIterator for &'a GlyphTable {
    type Item = &'a Glyph;
    type IntoIter = std::slice::Iter<'a, Glyph>;

    fn into_iter(self) -> Self::IntoIter {
        self.glyphs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(code_point: char) -> Glyph {
        Glyph {
            code_point,
            atlas_x: 2,
            atlas_y: 2,
            width: 10,
            height: 12,
            advance: Fixed::from_pixels(11),
            bearing_h: 0,
            bearing_v: 2,
        }
    }

    #[test]
    fn test_lookup_bounds() {
        let table = GlyphTable::new(' ', vec![glyph(' '), glyph('!'), glyph('"')]);

        assert_eq!(table.get(' ').map(|g| g.code_point), Some(' '));
        assert_eq!(table.get('"').map(|g| g.code_point), Some('"'));
        // One past the end
        assert!(table.get('#').is_none());
        assert!(table.get('\n').is_none());
        assert!(table.get('\u{263A}').is_none());
    }

    #[test]
    fn test_advance_px_truncates() {
        let mut g = glyph('a');
        g.advance = Fixed(1727);
        assert_eq!(g.advance_px(), 26);
    }
}
