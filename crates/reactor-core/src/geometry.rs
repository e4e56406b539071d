//! Display geometry of the spectrum canvas.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Number of bars drawn by the spectrum display
pub const DEFAULT_BAR_COUNT: usize = 64;
/// Width of a single bar in pixels
pub const DEFAULT_BAR_WIDTH: f64 = 8.0;
/// Gap between two bars in pixels
pub const DEFAULT_BAR_SPACING: f64 = 1.0;
/// Height of the spectrum display in pixels
pub const DEFAULT_BAR_HEIGHT: f64 = 100.0;

/// Size of the spectrum canvas the selection is drawn over.
///
/// The canvas is `bar_count` bar cells wide, each cell being one bar plus
/// its spacing, and `height` pixels tall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    bar_count: usize,
    bar_width: f64,
    bar_spacing: f64,
    height: f64,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            bar_count: DEFAULT_BAR_COUNT,
            bar_width: DEFAULT_BAR_WIDTH,
            bar_spacing: DEFAULT_BAR_SPACING,
            height: DEFAULT_BAR_HEIGHT,
        }
    }
}

impl DisplayGeometry {
    /// Create a validated geometry
    pub fn new(bar_count: usize, bar_width: f64, bar_spacing: f64, height: f64) -> Result<Self> {
        if bar_count == 0 {
            return Err(CoreError::InvalidGeometry(
                "bar count must be at least 1".to_string(),
            ));
        }
        if !(bar_width.is_finite() && bar_width > 0.0) {
            return Err(CoreError::InvalidGeometry(format!(
                "bar width must be positive, got {}",
                bar_width
            )));
        }
        if !(bar_spacing.is_finite() && bar_spacing >= 0.0) {
            return Err(CoreError::InvalidGeometry(format!(
                "bar spacing must be non-negative, got {}",
                bar_spacing
            )));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(CoreError::InvalidGeometry(format!(
                "height must be positive, got {}",
                height
            )));
        }

        Ok(Self {
            bar_count,
            bar_width,
            bar_spacing,
            height,
        })
    }

    /// Number of bars (and spectrum bins) shown
    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Width of one bar
    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Gap after each bar
    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    /// Width of one bar cell (bar + spacing)
    pub fn bar_pitch(&self) -> f64 {
        self.bar_width + self.bar_spacing
    }

    /// Total canvas width
    pub fn width(&self) -> f64 {
        self.bar_count as f64 * self.bar_pitch()
    }

    /// Total canvas height
    pub fn height(&self) -> f64 {
        self.height
    }
}
