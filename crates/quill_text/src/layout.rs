//! Text layout into textured quads
//!
//! Single-line, left-to-right layout: each glyph becomes one quad (two
//! triangles, six vertices) and the pen moves right by the glyph's whole-pixel
//! advance times the scale. Code points missing from the glyph table are
//! skipped without emitting geometry or advancing the pen.
//!
//! Screen coordinates have y pointing down; `origin_y` is the baseline.

use crate::glyph::{Glyph, GlyphTable};

/// One vertex as uploaded to the GPU: position then atlas UV, 16 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

/// Two triangles covering one glyph
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quad {
    pub vertices: [Vertex; 6],
}

impl Quad {
    /// Left edge, top edge, right edge, bottom edge
    pub fn bounds(&self) -> [f32; 4] {
        let [top_left, .., bottom_right] = self.vertices;
        [
            top_left.position[0],
            top_left.position[1],
            bottom_right.position[0],
            bottom_right.position[1],
        ]
    }
}

/// Result of laying out a string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextQuads {
    /// One quad per drawn glyph, in input order
    pub quads: Vec<Quad>,
    /// Total pen displacement in pixels
    pub advance: f32,
}

impl TextQuads {
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Vertices in draw order, six per quad
    pub fn vertices(&self) -> &[Vertex] {
        bytemuck::cast_slice(&self.quads)
    }

    pub fn vertex_count(&self) -> usize {
        self.quads.len() * 6
    }
}

/// Glyphs that will be drawn for `text`, paired with the pen offset (pixels,
/// relative to the origin) at which each starts. Once exhausted, `pen` holds
/// the total advance.
fn pen_positions<'a, I>(table: &'a GlyphTable, text: I, scale: f32) -> PenWalk<'a, I::IntoIter>
where
    I: IntoIterator<Item = char>,
{
    PenWalk {
        table,
        chars: text.into_iter(),
        scale,
        pen: 0.0,
    }
}

struct PenWalk<'a, I> {
    table: &'a GlyphTable,
    chars: I,
    scale: f32,
    pen: f32,
}

impl<'a, I: Iterator<Item = char>> Iterator for PenWalk<'a, I> {
    type Item = (&'a Glyph, f32);

    fn next(&mut self) -> Option<Self::Item> {
        for c in self.chars.by_ref() {
            if let Some(glyph) = self.table.get(c) {
                let start = self.pen;
                // advance is in 1/64 pixels
                self.pen += glyph.advance_px() as f32 * self.scale;
                return Some((glyph, start));
            }
        }
        None
    }
}

/// Lay out `text` with its baseline starting at `(origin_x, origin_y)`.
///
/// UVs always map the glyph's full, unscaled atlas cell; only the on-screen
/// quad is scaled.
pub fn layout<I>(
    table: &GlyphTable,
    atlas_dimensions: (u32, u32),
    text: I,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
) -> TextQuads
where
    I: IntoIterator<Item = char>,
{
    let (atlas_width, atlas_height) = atlas_dimensions;
    let mut walk = pen_positions(table, text, scale);
    let mut quads = Vec::new();

    for (glyph, pen) in walk.by_ref() {
        let x = origin_x + pen;
        quads.push(glyph_quad(glyph, x, origin_y, scale, atlas_width, atlas_height));
    }

    TextQuads {
        quads,
        advance: walk.pen,
    }
}

/// Total advance of `text` in pixels, without building geometry.
///
/// Always equal to the `advance` [`layout`] reports for the same input.
pub fn measure<I>(table: &GlyphTable, text: I, scale: f32) -> f32
where
    I: IntoIterator<Item = char>,
{
    let mut walk = pen_positions(table, text, scale);
    for _ in walk.by_ref() {}
    walk.pen
}

fn glyph_quad(
    glyph: &Glyph,
    pen_x: f32,
    baseline: f32,
    scale: f32,
    atlas_width: u32,
    atlas_height: u32,
) -> Quad {
    let x1 = pen_x + glyph.bearing_h as f32 * scale;
    let y1 = baseline - (glyph.height as i32 - glyph.bearing_v) as f32 * scale;
    let x2 = x1 + glyph.width as f32 * scale;
    let y2 = y1 + glyph.height as f32 * scale;

    let [u1, v1, u2, v2] = glyph.region().uv_bounds(atlas_width, atlas_height);

    Quad {
        vertices: [
            Vertex::new(x1, y1, u1, v1),
            Vertex::new(x2, y1, u2, v1),
            Vertex::new(x1, y2, u1, v2),
            Vertex::new(x2, y1, u2, v1),
            Vertex::new(x1, y2, u1, v2),
            Vertex::new(x2, y2, u2, v2),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed;

    fn glyph(code_point: char, atlas_x: u32, advance: i32) -> Glyph {
        Glyph {
            code_point,
            atlas_x,
            atlas_y: 2,
            width: 20,
            height: 30,
            advance: Fixed(advance),
            bearing_h: 1,
            bearing_v: 6,
        }
    }

    /// ' ', '!', '"' with advances of 10, 20 and 30 pixels
    fn table() -> GlyphTable {
        GlyphTable::new(
            ' ',
            vec![
                glyph(' ', 2, 640),
                glyph('!', 24, 1280),
                glyph('"', 46, 1920 + 63),
            ],
        )
    }

    #[test]
    fn test_vertex_layout_is_four_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        assert_eq!(std::mem::size_of::<Quad>(), 96);

        let quads = [Quad::default(); 2];
        let floats: &[f32] = bytemuck::cast_slice(&quads);
        assert_eq!(floats.len(), 2 * 6 * 4);
    }

    #[test]
    fn test_empty_text() {
        let out = layout(&table(), (128, 128), "".chars(), 0.0, 0.0, 1.0);
        assert!(out.is_empty());
        assert_eq!(out.advance, 0.0);
        assert_eq!(measure(&table(), "".chars(), 1.0), 0.0);
    }

    #[test]
    fn test_quad_geometry() {
        let out = layout(&table(), (128, 64), "!".chars(), 100.0, 50.0, 2.0);
        assert_eq!(out.len(), 1);

        let quad = out.quads[0];
        // x = 100 + 1 * 2, y = 50 - (30 - 6) * 2
        assert_eq!(quad.bounds(), [102.0, 2.0, 142.0, 62.0]);

        let v = quad.vertices;
        assert_eq!(v[0], Vertex::new(102.0, 2.0, 24.0 / 128.0, 2.0 / 64.0));
        assert_eq!(v[1], Vertex::new(142.0, 2.0, 44.0 / 128.0, 2.0 / 64.0));
        assert_eq!(v[2], Vertex::new(102.0, 62.0, 24.0 / 128.0, 32.0 / 64.0));
        assert_eq!(v[3], v[1]);
        assert_eq!(v[4], v[2]);
        assert_eq!(v[5], Vertex::new(142.0, 62.0, 44.0 / 128.0, 32.0 / 64.0));
    }

    #[test]
    fn test_pen_advances_by_whole_pixels() {
        let out = layout(&table(), (128, 128), " !\"".chars(), 5.0, 0.0, 1.0);
        let lefts: Vec<f32> = out.quads.iter().map(|q| q.bounds()[0]).collect();
        // bearing 1, advances 10 then 20
        assert_eq!(lefts, vec![6.0, 16.0, 36.0]);
        // 1983/64 truncates to 30
        assert_eq!(out.advance, 60.0);
    }

    #[test]
    fn test_out_of_range_code_points_are_skipped() {
        let text = "\n!\u{7}#\u{1F600}!";
        let out = layout(&table(), (128, 128), text.chars(), 0.0, 0.0, 1.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out.advance, 40.0);
        assert_eq!(measure(&table(), text.chars(), 1.0), 40.0);
    }

    #[test]
    fn test_measure_matches_layout() {
        let table = table();
        for scale in [0.1, 0.5, 1.0, 1.3, 3.7] {
            for text in ["", " ", "!\"! ", "\"\"\"\"\"\"\"", "x!y\"z"] {
                let laid_out = layout(&table, (64, 64), text.chars(), 13.7, 4.2, scale);
                assert_eq!(laid_out.advance, measure(&table, text.chars(), scale));
            }
        }
    }

    #[test]
    fn test_measure_is_pure() {
        let table = table();
        let first = measure(&table, " !\"".chars(), 1.5);
        let second = measure(&table, " !\"".chars(), 1.5);
        assert_eq!(first, second);
        assert_eq!(first, 90.0);
    }

    #[test]
    fn test_vertices_view() {
        let out = layout(&table(), (128, 128), "!!".chars(), 0.0, 0.0, 1.0);
        assert_eq!(out.vertex_count(), 12);
        assert_eq!(out.vertices().len(), 12);
        assert_eq!(out.vertices()[6], out.quads[1].vertices[0]);
    }
}
