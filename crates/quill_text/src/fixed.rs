//! 26.6 fixed-point values
//!
//! Glyph bounds and advances are kept in 1/64 pixel units, the way hinted
//! TrueType rasterizers report them. Pixel values are obtained with an
//! arithmetic shift by 6, so negative values floor towards minus infinity.
//! Arithmetic saturates at the `i32` range instead of overflowing.

use crate::config::Hinting;

/// A 26.6 fixed-point number (1/64 pixel units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);

    /// Convert a pixel value, rounding to the nearest 1/64
    pub fn from_f32(value: f32) -> Self {
        Fixed((value * 64.0).round() as i32)
    }

    /// Whole pixels
    pub const fn from_pixels(pixels: i32) -> Self {
        Fixed(pixels << 6)
    }

    /// Whole pixels, shifted down by 6 bits
    pub const fn to_pixels(self) -> i32 {
        self.0 >> 6
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 64.0
    }

    pub const fn floor(self) -> Self {
        Fixed(self.0 & !63)
    }

    pub const fn ceil(self) -> Self {
        Fixed(self.0.saturating_add(63) & !63)
    }

    pub const fn round(self) -> Self {
        Fixed(self.0.saturating_add(32) & !63)
    }

    /// Advance widths snap to whole pixels when hinting
    pub fn hinted(self, hinting: Hinting) -> Self {
        match hinting {
            Hinting::Full => self.round(),
            Hinting::None => self,
        }
    }
}

impl std::ops::Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

/// A point in 26.6 units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedPoint {
    pub x: Fixed,
    pub y: Fixed,
}

/// A rectangle in 26.6 units, y axis pointing down
///
/// For glyph bounds `min.y` is minus the ascent and `max.y` is the descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedRect {
    pub min: FixedPoint,
    pub max: FixedPoint,
}

impl FixedRect {
    /// Scale a y-up font-unit box into pixel space.
    ///
    /// With full hinting the box is rounded outwards to whole pixels.
    pub fn from_font_units(rect: ttf_parser::Rect, scale: f32, hinting: Hinting) -> Self {
        let min = FixedPoint {
            x: Fixed::from_f32(rect.x_min as f32 * scale),
            y: Fixed::from_f32(-(rect.y_max as f32) * scale),
        };
        let max = FixedPoint {
            x: Fixed::from_f32(rect.x_max as f32 * scale),
            y: Fixed::from_f32(-(rect.y_min as f32) * scale),
        };

        match hinting {
            Hinting::Full => Self {
                min: FixedPoint {
                    x: min.x.floor(),
                    y: min.y.floor(),
                },
                max: FixedPoint {
                    x: max.x.ceil(),
                    y: max.y.ceil(),
                },
            },
            Hinting::None => Self { min, max },
        }
    }

    pub fn width_px(&self) -> u32 {
        (self.max.x - self.min.x).to_pixels().max(0) as u32
    }

    pub fn height_px(&self) -> u32 {
        (self.max.y - self.min.y).to_pixels().max(0) as u32
    }

    /// Pixels from the top of the box down to the baseline
    pub fn ascent_px(&self) -> i32 {
        (-self.min.y).to_pixels()
    }

    /// Pixels from the baseline down to the bottom of the box
    pub fn descent_px(&self) -> i32 {
        self.max.y.to_pixels()
    }

    /// Left side bearing in pixels
    pub fn left_px(&self) -> i32 {
        self.min.x.to_pixels()
    }

    pub fn is_empty(&self) -> bool {
        self.width_px() == 0 || self.height_px() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_floors_negative_values() {
        assert_eq!(Fixed(-1).to_pixels(), -1);
        assert_eq!(Fixed(-64).to_pixels(), -1);
        assert_eq!(Fixed(-65).to_pixels(), -2);
        assert_eq!(Fixed(127).to_pixels(), 1);
    }

    #[test]
    fn test_rounding() {
        let v = Fixed::from_f32(1.5);
        assert_eq!(v, Fixed(96));
        assert_eq!(v.floor(), Fixed::from_pixels(1));
        assert_eq!(v.ceil(), Fixed::from_pixels(2));
        assert_eq!(v.round(), Fixed::from_pixels(2));
        assert_eq!(Fixed::from_f32(-34.5).floor(), Fixed::from_pixels(-35));
        assert_eq!(Fixed::from_f32(1.25).hinted(Hinting::Full), Fixed::from_pixels(1));
        assert_eq!(Fixed::from_f32(1.25).hinted(Hinting::None), Fixed(80));
    }

    #[test]
    fn test_arithmetic_saturates_at_range_limits() {
        assert_eq!(Fixed::from_f32(1.0e12), Fixed(i32::MAX));
        assert_eq!(Fixed(i32::MAX).ceil(), Fixed(i32::MAX & !63));
        assert_eq!(Fixed(i32::MAX).round(), Fixed(i32::MAX & !63));
        assert_eq!(Fixed(i32::MIN) - Fixed(1), Fixed(i32::MIN));
        assert_eq!(Fixed(i32::MAX) - Fixed(i32::MIN), Fixed(i32::MAX));
        assert_eq!(-Fixed(i32::MIN), Fixed(i32::MAX));

        let huge = ttf_parser::Rect {
            x_min: -32768,
            y_min: -32768,
            x_max: 32767,
            y_max: 32767,
        };
        let bounds = FixedRect::from_font_units(huge, 1.0e6, Hinting::Full);
        assert_eq!(bounds.width_px(), (i32::MAX >> 6) as u32);
    }

    #[test]
    fn test_rect_from_font_units_flips_y() {
        let rect = ttf_parser::Rect {
            x_min: 64,
            y_min: -384,
            x_max: 960,
            y_max: 1088,
        };
        // 48pt at 2048 units per em
        let bounds = FixedRect::from_font_units(rect, 48.0 / 2048.0, Hinting::Full);

        assert_eq!(bounds.left_px(), 1);
        assert_eq!(bounds.ascent_px(), 26);
        assert_eq!(bounds.descent_px(), 9);
        assert_eq!(bounds.width_px(), 22);
        assert_eq!(bounds.height_px(), 35);
    }

    #[test]
    fn test_unhinted_tiny_rect_is_empty() {
        let rect = ttf_parser::Rect {
            x_min: 0,
            y_min: 0,
            x_max: 1280,
            y_max: 1536,
        };
        let bounds = FixedRect::from_font_units(rect, 1.0 / 2048.0, Hinting::None);
        assert!(bounds.is_empty());
    }
}
