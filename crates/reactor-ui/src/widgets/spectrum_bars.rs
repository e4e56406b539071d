//! Spectrum Bars Widget
//!
//! One vertical bar per spectrum magnitude, lowest bin leftmost, growing
//! upward from the bottom edge.

use crate::theme::colors;
use egui::{pos2, Color32, Painter, Pos2, Rect, Vec2};
use reactor_core::{DisplayGeometry, SpectrumRenderer};

/// Bar layout and colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumBarsOptions {
    pub width: f32,
    pub height: f32,
    pub bar_width: f32,
    pub bar_spacing: f32,
    pub color: Color32,
    pub background_color: Color32,
}

impl SpectrumBarsOptions {
    /// Layout matching a display geometry, default colors
    pub fn from_geometry(geometry: &DisplayGeometry) -> Self {
        Self {
            width: geometry.width() as f32,
            height: geometry.height() as f32,
            bar_width: geometry.bar_width() as f32,
            bar_spacing: geometry.bar_spacing() as f32,
            color: colors::REACTOR_PURPLE,
            background_color: colors::DARKER_GREY,
        }
    }

    /// Horizontal distance between bar starts
    pub fn bar_pitch(&self) -> f32 {
        self.bar_width + self.bar_spacing
    }

    /// Number of whole bars that fit in `width`
    pub fn capacity(&self) -> usize {
        let pitch = self.bar_pitch();
        if pitch <= 0.0 {
            return 0;
        }
        // Tolerate float error when width is an exact multiple of the pitch
        ((self.width / pitch) + 1e-3).floor().max(0.0) as usize
    }
}

impl Default for SpectrumBarsOptions {
    fn default() -> Self {
        Self::from_geometry(&DisplayGeometry::default())
    }
}

/// Spectrum renderer backed by egui painting
#[derive(Debug, Clone, Default)]
pub struct SpectrumBars {
    options: SpectrumBarsOptions,
    values: Vec<f32>,
}

impl SpectrumBars {
    pub fn new(options: SpectrumBarsOptions) -> Self {
        Self {
            options,
            values: Vec::new(),
        }
    }

    pub fn options(&self) -> &SpectrumBarsOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: SpectrumBarsOptions) {
        self.options = options;
    }

    /// Magnitudes of the last rendered frame
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.options.width, self.options.height)
    }

    /// Bar rectangles for a canvas whose top-left corner is `origin`.
    ///
    /// Values are clamped to [0, 1] of the height; bars past the canvas
    /// width are dropped.
    pub fn bar_rects(&self, origin: Pos2) -> Vec<Rect> {
        let o = &self.options;
        let bottom = origin.y + o.height;
        self.values
            .iter()
            .take(o.capacity())
            .enumerate()
            .map(|(i, &value)| {
                let magnitude = if value.is_finite() {
                    value.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let x = origin.x + i as f32 * o.bar_pitch();
                Rect::from_min_max(
                    pos2(x, bottom - magnitude * o.height),
                    pos2(x + o.bar_width, bottom),
                )
            })
            .collect()
    }

    /// Paint background and bars into `rect`
    pub fn paint(&self, painter: &Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, self.options.background_color);
        for bar in self.bar_rects(rect.min) {
            if bar.height() > 0.0 {
                painter.rect_filled(bar, 0.0, self.options.color);
            }
        }
    }
}

impl SpectrumRenderer for SpectrumBars {
    fn render(&mut self, fft: &[f32]) {
        self.values.clear();
        self.values.extend_from_slice(fft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_fits_64_bars() {
        let options = SpectrumBarsOptions::default();
        assert_eq!(options.width, 576.0);
        assert_eq!(options.capacity(), 64);
    }

    #[test]
    fn test_bar_rects() {
        let mut bars = SpectrumBars::default();
        let mut fft = vec![0.0; 64];
        fft[0] = 1.0;
        fft[2] = 0.5;
        bars.render(&fft);

        let rects = bars.bar_rects(pos2(100.0, 50.0));
        assert_eq!(rects.len(), 64);
        assert_eq!(
            rects[0],
            Rect::from_min_max(pos2(100.0, 50.0), pos2(108.0, 150.0))
        );
        assert_eq!(rects[1].height(), 0.0);
        assert_eq!(
            rects[2],
            Rect::from_min_max(pos2(118.0, 100.0), pos2(126.0, 150.0))
        );
        assert_eq!(rects[63].min.x, 100.0 + 63.0 * 9.0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut bars = SpectrumBars::default();
        bars.render(&[2.0, -1.0, f32::NAN]);
        let rects = bars.bar_rects(Pos2::ZERO);
        assert_eq!(rects[0].height(), 100.0);
        assert_eq!(rects[1].height(), 0.0);
        assert_eq!(rects[2].height(), 0.0);
    }

    #[test]
    fn test_extra_values_are_dropped() {
        let geometry = DisplayGeometry::new(4, 8.0, 1.0, 100.0).unwrap();
        let mut bars = SpectrumBars::new(SpectrumBarsOptions::from_geometry(&geometry));
        bars.render(&[0.5; 10]);
        assert_eq!(bars.values().len(), 10);
        assert_eq!(bars.bar_rects(Pos2::ZERO).len(), 4);
    }
}
