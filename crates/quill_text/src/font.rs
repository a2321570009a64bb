//! The built font handle
//!
//! A [`Font`] owns the glyph table and atlas produced by the build pass and
//! the current draw color. The table and atlas never change after the build,
//! so layout and measurement only need `&self`; changing the color takes
//! `&mut self`, and sharing a font across threads while recoloring it needs
//! external synchronization.

use crate::atlas::AtlasSurface;
use crate::color::Color;
use crate::config::{AtlasConfig, Direction};
use crate::face::FontFace;
use crate::glyph::{Glyph, GlyphTable};
use crate::layout::{self, Quad, TextQuads};
use crate::Result;
use std::fmt::Write;

/// Receives glyph quads for drawing
///
/// Implemented by rendering backends. A backend binds the font's atlas
/// texture and its text shader, sets `color` as the text color uniform,
/// uploads the quads (4 floats per vertex: position then UV, 6 vertices per
/// quad) and issues one triangle draw covering all of them.
pub trait QuadSink {
    fn draw_quads(&mut self, color: Color, quads: &[Quad]);
}

impl<S: QuadSink + ?Sized> QuadSink for &mut S {
    fn draw_quads(&mut self, color: Color, quads: &[Quad]) {
        (**self).draw_quads(color, quads)
    }
}

/// A font rasterized into a glyph atlas
pub struct Font {
    glyphs: GlyphTable,
    atlas: AtlasSurface,
    color: Color,
    point_size: f32,
    line_height: u32,
    direction: Direction,
}

impl Font {
    pub(crate) fn new(
        glyphs: GlyphTable,
        atlas: AtlasSurface,
        point_size: f32,
        line_height: u32,
        direction: Direction,
    ) -> Self {
        Self {
            glyphs,
            atlas,
            color: Color::WHITE,
            point_size,
            line_height,
            direction,
        }
    }

    /// Read a font file and build its atlas
    pub fn load(path: &std::path::Path, config: &AtlasConfig) -> Result<Self> {
        let face = FontFace::from_file(path)?;
        crate::builder::build_face(&face, config)
    }

    /// Set the color used by subsequent draws
    pub fn set_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.color = Color::rgba(red, green, blue, alpha);
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(c)
    }

    pub fn atlas(&self) -> &AtlasSurface {
        &self.atlas
    }

    pub fn atlas_dimensions(&self) -> (u32, u32) {
        self.atlas.dimensions()
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Height of the tallest glyph cell, in pixels
    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Width of `text` in pixels at `scale`
    pub fn measure(&self, scale: f32, text: &str) -> f32 {
        layout::measure(&self.glyphs, text.chars(), scale)
    }

    /// Width of formatted text, e.g. `font.measure_fmt(1.0, format_args!("{} fps", fps))`
    pub fn measure_fmt(&self, scale: f32, args: std::fmt::Arguments<'_>) -> Result<f32> {
        let text = format_text(args)?;
        Ok(self.measure(scale, &text))
    }

    /// Quads for `text` with its baseline starting at `(x, y)`
    pub fn layout(&self, x: f32, y: f32, scale: f32, text: &str) -> TextQuads {
        layout::layout(
            &self.glyphs,
            self.atlas.dimensions(),
            text.chars(),
            x,
            y,
            scale,
        )
    }

    /// Lay out `text` and hand the quads to `sink` in the current color.
    ///
    /// Returns the number of glyphs drawn. Nothing reaches the sink when no
    /// glyph is drawn.
    pub fn draw<S: QuadSink>(&self, sink: &mut S, x: f32, y: f32, scale: f32, text: &str) -> usize {
        let laid_out = self.layout(x, y, scale, text);
        if laid_out.is_empty() {
            return 0;
        }

        sink.draw_quads(self.color, &laid_out.quads);
        laid_out.len()
    }

    /// [`Font::draw`] for formatted text, e.g.
    /// `font.draw_fmt(&mut sink, 10.0, 30.0, 1.0, format_args!("score: {}", score))`
    pub fn draw_fmt<S: QuadSink>(
        &self,
        sink: &mut S,
        x: f32,
        y: f32,
        scale: f32,
        args: std::fmt::Arguments<'_>,
    ) -> Result<usize> {
        let text = format_text(args)?;
        Ok(self.draw(sink, x, y, scale, &text))
    }
}

fn format_text(args: std::fmt::Arguments<'_>) -> Result<String> {
    let mut text = String::new();
    text.write_fmt(args)?;
    Ok(text)
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("glyphs", &self.glyphs.len())
            .field("first", &self.glyphs.first())
            .field("atlas", &self.atlas)
            .field("point_size", &self.point_size)
            .field("color", &self.color)
            .finish()
    }
}
