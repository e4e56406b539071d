//! Selection mapping between pixel rectangles and normalized ranges.
//!
//! The spectrum canvas has a fixed pixel size. A selection drawn over it is
//! stored as a pixel [`Rect`] and, for downstream consumers, as a
//! [`FracRange`] whose coordinates are fractions of the canvas size.

use crate::geometry::DisplayGeometry;
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Pixel rectangle in canvas-local coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Rect {
    /// Create a rectangle
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corner points, in any order
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self::new(a.0, a.1, b.0 - a.0, b.1 - a.1).normalized()
    }

    /// Returns the same area with non-negative width and height.
    ///
    /// A negative extent means the corner was given as the far edge; the
    /// origin moves to the near edge instead. Non-finite fields become `0.0`.
    pub fn normalized(self) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        let this = Self::new(
            finite(self.x),
            finite(self.y),
            finite(self.width),
            finite(self.height),
        );
        let (x, width) = if this.width < 0.0 {
            (this.x + this.width, -this.width)
        } else {
            (this.x, this.width)
        };
        let (y, height) = if this.height < 0.0 {
            (this.y + this.height, -this.height)
        } else {
            (this.y, this.height)
        };
        Self::new(x, y, width, height)
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Normalized `[0, 1]` range over the canvas.
///
/// `x1 <= x2` and `y1 <= y2` hold for every range produced by
/// [`SelectionMapper`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FracRange {
    /// Left fraction (lowest frequency bin side)
    pub x1: f64,
    /// Right fraction
    pub x2: f64,
    /// Top fraction
    pub y1: f64,
    /// Bottom fraction
    pub y2: f64,
}

impl FracRange {
    /// Create a range
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// The full canvas
    pub fn full() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Ordered and clamped copy of this range
    pub fn normalized(self) -> Self {
        let (x1, x2) = ordered(unit(self.x1), unit(self.x2));
        let (y1, y2) = ordered(unit(self.y1), unit(self.y2));
        Self { x1, x2, y1, y2 }
    }

    /// Zero extent on either axis.
    ///
    /// Downstream consumers treat a degenerate range as "no spatial filter".
    pub fn is_degenerate(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }

    /// Whether a normalized point lies inside the range (edges inclusive)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }

    /// Indices of the spectrum bins covered horizontally, for `bins` bins
    pub fn bin_span(&self, bins: usize) -> std::ops::Range<usize> {
        if bins == 0 || self.is_degenerate() {
            return 0..0;
        }
        let start = (self.x1 * bins as f64).floor() as usize;
        let end = (self.x2 * bins as f64).ceil() as usize;
        start.min(bins)..end.min(bins)
    }
}

/// Converts between pixel rectangles and fractional ranges for one canvas size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionMapper {
    width: f64,
    height: f64,
}

impl SelectionMapper {
    /// Mapper for a `width` x `height` canvas
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(CoreError::InvalidGeometry(format!(
                "selection surface must have positive size, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Mapper for a validated display geometry
    pub fn from_geometry(geometry: &DisplayGeometry) -> Self {
        Self {
            width: geometry.width(),
            height: geometry.height(),
        }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Pixel rectangle to fractional range.
    ///
    /// Negative extents are normalized first; results are ordered and
    /// clamped to `[0, 1]`.
    pub fn to_range(&self, rect: Rect) -> FracRange {
        let rect = rect.normalized();
        FracRange {
            x1: rect.x / self.width,
            x2: rect.right() / self.width,
            y1: rect.y / self.height,
            y2: rect.bottom() / self.height,
        }
        .normalized()
    }

    /// Fractional range back to a pixel rectangle
    pub fn to_rect(&self, range: FracRange) -> Rect {
        let range = range.normalized();
        let x = range.x1 * self.width;
        let y = range.y1 * self.height;
        Rect {
            x,
            y,
            width: range.x2 * self.width - x,
            height: range.y2 * self.height - y,
        }
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn mapper() -> SelectionMapper {
        SelectionMapper::from_geometry(&DisplayGeometry::default())
    }

    fn assert_range_eq(actual: FracRange, expected: FracRange) {
        assert!((actual.x1 - expected.x1).abs() < EPS, "x1: {:?}", actual);
        assert!((actual.x2 - expected.x2).abs() < EPS, "x2: {:?}", actual);
        assert!((actual.y1 - expected.y1).abs() < EPS, "y1: {:?}", actual);
        assert!((actual.y2 - expected.y2).abs() < EPS, "y2: {:?}", actual);
    }

    #[test]
    fn test_known_selection() {
        let range = mapper().to_range(Rect::new(72.0, 20.0, 144.0, 30.0));
        assert_range_eq(range, FracRange::new(0.125, 0.375, 0.2, 0.5));
    }

    #[test]
    fn test_zero_area_selection_is_degenerate() {
        let range = mapper().to_range(Rect::default());
        assert_eq!(range, FracRange::new(0.0, 0.0, 0.0, 0.0));
        assert!(range.is_degenerate());
    }

    #[test]
    fn test_negative_extent_is_swapped() {
        let m = mapper();
        let flipped = m.to_range(Rect::new(216.0, 50.0, -144.0, -30.0));
        let upright = m.to_range(Rect::new(72.0, 20.0, 144.0, 30.0));
        assert_range_eq(flipped, upright);
    }

    #[test]
    fn test_non_finite_extent_gives_ordered_range() {
        let m = mapper();
        let range = m.to_range(Rect::new(288.0, 10.0, f64::NAN, 10.0));
        assert_range_eq(range, FracRange::new(0.5, 0.5, 0.1, 0.2));

        let range = m.to_range(Rect::new(288.0, 10.0, f64::INFINITY, f64::NEG_INFINITY));
        assert_range_eq(range, FracRange::new(0.5, 0.5, 0.1, 0.1));

        let range = m.to_range(Rect::new(f64::NEG_INFINITY, f64::NAN, 1e308, 1e308));
        assert!(range.x1 <= range.x2 && range.y1 <= range.y2);
    }

    #[test]
    fn test_normalized_zeroes_non_finite_fields() {
        let rect = Rect::new(f64::NAN, f64::INFINITY, -10.0, f64::NEG_INFINITY).normalized();
        assert_eq!(rect, Rect::new(-10.0, 0.0, 10.0, 0.0));
    }

    #[test]
    fn test_out_of_bounds_is_clamped() {
        let range = mapper().to_range(Rect::new(-50.0, 80.0, 1000.0, 100.0));
        assert_range_eq(range, FracRange::new(0.0, 1.0, 0.8, 1.0));
    }

    #[test]
    fn test_to_rect_inverts_to_range() {
        let m = mapper();
        let rect = Rect::new(9.0, 10.0, 27.0, 45.5);
        let back = m.to_rect(m.to_range(rect));
        assert!((back.x - rect.x).abs() < EPS);
        assert!((back.y - rect.y).abs() < EPS);
        assert!((back.width - rect.width).abs() < EPS);
        assert!((back.height - rect.height).abs() < EPS);
    }

    #[test]
    fn test_to_rect_orders_reversed_range() {
        let rect = mapper().to_rect(FracRange::new(0.5, 0.25, 1.0, 0.0));
        assert_eq!(rect, Rect::new(144.0, 0.0, 144.0, 100.0));
    }

    #[test]
    fn test_rejects_empty_surface() {
        assert!(SelectionMapper::new(0.0, 100.0).is_err());
        assert!(SelectionMapper::new(576.0, -1.0).is_err());
    }

    #[test]
    fn test_bin_span() {
        let range = FracRange::new(0.125, 0.375, 0.0, 1.0);
        assert_eq!(range.bin_span(64), 8..24);
        assert_eq!(FracRange::default().bin_span(64), 0..0);
        assert_eq!(FracRange::full().bin_span(64), 0..64);
    }

    #[test]
    fn test_from_corners() {
        let rect = Rect::from_corners((100.0, 80.0), (40.0, 10.0));
        assert_eq!(rect, Rect::new(40.0, 10.0, 60.0, 70.0));
    }
}
