//! Level Meter Widget
//!
//! Single-bar meter showing the reactor's aggregate output level, filling
//! from one edge of its rectangle.

use crate::theme::colors;
use egui::{pos2, Color32, Painter, Rect, Sense, Stroke, Vec2, Widget};
use reactor_core::LevelRenderer;
use serde::{Deserialize, Serialize};

/// Edge the meter fills from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterOrigin {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

/// Meter appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelMeterOptions {
    pub width: f32,
    pub height: f32,
    pub color: Color32,
    pub background_color: Color32,
    pub origin: MeterOrigin,
}

impl Default for LevelMeterOptions {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 100.0,
            color: colors::REACTOR_PURPLE,
            background_color: colors::DARKER_GREY,
            origin: MeterOrigin::Bottom,
        }
    }
}

/// Level renderer backed by egui painting
#[derive(Debug, Clone, Default)]
pub struct LevelMeter {
    options: LevelMeterOptions,
    level: f32,
}

impl LevelMeter {
    pub fn new(options: LevelMeterOptions) -> Self {
        Self {
            options,
            level: 0.0,
        }
    }

    pub fn options(&self) -> &LevelMeterOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LevelMeterOptions) {
        self.options = options;
    }

    /// Last rendered level, clamped to [0, 1]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.options.width, self.options.height)
    }

    /// Filled part of `rect` for the current level
    pub fn fill_rect(&self, rect: Rect) -> Rect {
        let level = self.level;
        match self.options.origin {
            MeterOrigin::Bottom => Rect::from_min_max(
                pos2(rect.min.x, rect.max.y - rect.height() * level),
                rect.max,
            ),
            MeterOrigin::Top => Rect::from_min_max(
                rect.min,
                pos2(rect.max.x, rect.min.y + rect.height() * level),
            ),
            MeterOrigin::Left => Rect::from_min_max(
                rect.min,
                pos2(rect.min.x + rect.width() * level, rect.max.y),
            ),
            MeterOrigin::Right => Rect::from_min_max(
                pos2(rect.max.x - rect.width() * level, rect.min.y),
                rect.max,
            ),
        }
    }

    /// Paint the meter into `rect`
    pub fn paint(&self, painter: &Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, self.options.background_color);
        if self.level > 0.0 {
            painter.rect_filled(self.fill_rect(rect), 0.0, self.options.color);
        }
        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(1.0, colors::STROKE_GREY),
            egui::StrokeKind::Inside,
        );
    }
}

impl LevelRenderer for LevelMeter {
    fn render(&mut self, output: f32) {
        self.level = if output.is_finite() {
            output.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}

impl Widget for &LevelMeter {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(self.size(), Sense::hover());
        if ui.is_rect_visible(rect) {
            self.paint(ui.painter(), rect);
        }
        response
    }
}
