//! Glyph atlas surface and packing
//!
//! All glyphs of a font share one square RGBA surface. Cells are assigned by
//! a row packer: left to right, top to bottom, with a fixed margin between
//! cells and a fixed row pitch.

use crate::{Result, TextError};
use image::{Rgba, RgbaImage};

/// Region in the atlas texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasRegion {
    /// X position in atlas (pixels)
    pub x: u32,
    /// Y position in atlas (pixels)
    pub y: u32,
    /// Width in atlas (pixels)
    pub width: u32,
    /// Height in atlas (pixels)
    pub height: u32,
}

impl AtlasRegion {
    /// Get UV coordinates for this region given atlas dimensions
    pub fn uv_bounds(&self, atlas_width: u32, atlas_height: u32) -> [f32; 4] {
        let u_min = self.x as f32 / atlas_width as f32;
        let v_min = self.y as f32 / atlas_height as f32;
        let u_max = (self.x + self.width) as f32 / atlas_width as f32;
        let v_max = (self.y + self.height) as f32 / atlas_height as f32;
        [u_min, v_min, u_max, v_max]
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &AtlasRegion) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// The bitmap every glyph is rasterized into
///
/// Starts opaque black; glyph coverage is written as grey `(c, c, c, 255)`,
/// which is the layout a texture upload expects (8 bits per channel RGBA).
pub struct AtlasSurface {
    image: RgbaImage,
}

impl AtlasSurface {
    /// Create a square surface
    pub fn new(size: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Tightly packed RGBA rows, ready for texture upload
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Coverage at a pixel, or `None` outside the surface
    pub fn coverage(&self, x: u32, y: u32) -> Option<u8> {
        self.image.get_pixel_checked(x, y).map(|p| p.0[0])
    }

    /// Write coverage for one pixel; writes outside the surface are dropped
    pub fn set_coverage(&mut self, x: u32, y: u32, coverage: u8) {
        if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
            *pixel = Rgba([coverage, coverage, coverage, 255]);
        }
    }

    /// Save the surface as a PNG (for inspecting atlases)
    pub fn save_png(&self, path: &std::path::Path) -> image::ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }
}

impl std::fmt::Debug for AtlasSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasSurface")
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

/// Row-based cell allocator
///
/// The row pitch is fixed up front (`line_height + margin`) so that a row is
/// never taller than the tallest glyph of the range. Cells never cross the
/// right or bottom edge; a glyph that does not fit is an error rather than a
/// reason to grow the surface.
#[derive(Debug)]
pub struct RowPacker {
    width: u32,
    height: u32,
    margin: u32,
    line_height: u32,
    /// Next free position
    x: u32,
    y: u32,
    rows: u32,
}

impl RowPacker {
    pub fn new(width: u32, height: u32, margin: u32, line_height: u32) -> Self {
        Self {
            width,
            height,
            margin,
            line_height,
            x: margin,
            y: margin,
            rows: 1,
        }
    }

    /// Allocate a `width x height` cell for `code_point`
    pub fn place(&mut self, code_point: char, width: u32, height: u32) -> Result<AtlasRegion> {
        let full = || TextError::AtlasFull {
            code_point,
            width,
            height,
        };

        if !fits(self.x, width, self.width) {
            if self.x == self.margin {
                // Already at the start of a row
                return Err(full());
            }
            self.x = self.margin;
            self.y = self
                .y
                .checked_add(self.line_height)
                .and_then(|y| y.checked_add(self.margin))
                .ok_or_else(full)?;
            self.rows += 1;
        }

        if !fits(self.x, width, self.width) || !fits(self.y, height, self.height) {
            return Err(full());
        }

        let region = AtlasRegion {
            x: self.x,
            y: self.y,
            width,
            height,
        };
        self.x = self.x.saturating_add(width).saturating_add(self.margin);
        Ok(region)
    }

    /// Number of rows started so far
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Fraction of the surface height consumed by started rows (0.0 to 1.0)
    pub fn utilization(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        let used = self
            .y
            .saturating_add(self.line_height)
            .saturating_add(self.margin)
            .min(self.height);
        used as f32 / self.height as f32
    }
}

/// Whether `[start, start + len)` ends within `limit`
fn fits(start: u32, len: u32, limit: u32) -> bool {
    start.checked_add(len).is_some_and(|end| end <= limit)
}
