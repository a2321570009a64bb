//! Glyph atlas building and text layout for lightweight GPU text
//!
//! This crate provides:
//! - Font parsing and 26.6 fixed-point glyph metrics (via ttf-parser)
//! - Glyph rasterization (via swash)
//! - A single-texture glyph atlas with row-based bin packing
//! - Text layout into textured quads, plus measurement
//!
//! GPU upload and draw submission live behind [`QuadSink`]; see the
//! `quill_gpu` crate for the wgpu implementation.

pub mod atlas;
pub mod builder;
pub mod color;
pub mod config;
pub mod face;
pub mod fixed;
pub mod font;
pub mod glyph;
pub mod layout;
pub mod rasterizer;

#[cfg(any(test, feature = "test-font"))]
pub mod testing;

pub use atlas::{AtlasRegion, AtlasSurface, RowPacker};
pub use builder::{build, build_face};
pub use color::Color;
pub use config::{AtlasConfig, Direction, Hinting};
pub use face::{FontFace, FontMetrics};
pub use fixed::{Fixed, FixedPoint, FixedRect};
pub use font::{Font, QuadSink};
pub use glyph::{Glyph, GlyphTable};
pub use layout::{layout, measure, Quad, TextQuads, Vertex};
pub use rasterizer::GlyphRasterizer;

use thiserror::Error;

/// Text rendering errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Font cannot report glyph bounds for codepoint: {0:?}")]
    GlyphBoundsError(char),

    #[error("Atlas is full, cannot place {width}x{height} glyph for {code_point:?}")]
    AtlasFull {
        code_point: char,
        width: u32,
        height: u32,
    },

    #[error("Invalid atlas configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to format text: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
