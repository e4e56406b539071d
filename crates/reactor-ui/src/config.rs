//! Panel configuration
//!
//! Read from a TOML file; every field is optional and falls back to the
//! built-in layout (64 bars, 8px wide, 1px apart, 100px tall).

use crate::theme::{self, colors};
use crate::widgets::{LevelMeterOptions, MeterOrigin, SpectrumBarsOptions};
use egui::Color32;
use reactor_core::geometry::{
    DEFAULT_BAR_COUNT, DEFAULT_BAR_HEIGHT, DEFAULT_BAR_SPACING, DEFAULT_BAR_WIDTH,
};
use reactor_core::{CoreError, DisplayGeometry, FramePacer, LogConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error(transparent)]
    Geometry(#[from] CoreError),
}

/// Color written as `#RRGGBB` in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor(pub Color32);

impl TryFrom<String> for RgbColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        theme::parse_hex(&value)
            .map(RgbColor)
            .ok_or(ConfigError::InvalidColor(value))
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        theme::to_hex_rgb(color.0)
    }
}

impl From<RgbColor> for Color32 {
    fn from(color: RgbColor) -> Self {
        color.0
    }
}

/// Layout, colors, frame rate and logging for a reactor panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Number of spectrum bars (and analysis bins)
    pub bar_count: usize,
    /// Bar width in pixels
    pub bar_width: f64,
    /// Gap between bars in pixels
    pub bar_spacing: f64,
    /// Canvas and meter height in pixels
    pub bar_height: f64,
    /// Spectrum bar color
    pub bar_color: RgbColor,
    /// Canvas background color
    pub background_color: RgbColor,
    /// Level meter color
    pub meter_color: RgbColor,
    /// Level meter width in pixels
    pub meter_width: f32,
    /// Edge the level meter fills from
    pub meter_origin: MeterOrigin,
    /// Render clock rate
    pub target_fps: f32,
    /// Logging
    pub log: LogConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            bar_count: DEFAULT_BAR_COUNT,
            bar_width: DEFAULT_BAR_WIDTH,
            bar_spacing: DEFAULT_BAR_SPACING,
            bar_height: DEFAULT_BAR_HEIGHT,
            bar_color: RgbColor(colors::REACTOR_PURPLE),
            background_color: RgbColor(colors::DARKER_GREY),
            meter_color: RgbColor(colors::REACTOR_PURPLE),
            meter_width: 20.0,
            meter_origin: MeterOrigin::Bottom,
            target_fps: FramePacer::DEFAULT_FPS,
            log: LogConfig::default(),
        }
    }
}

impl PanelConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded panel config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("No panel config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.geometry()?;
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Display geometry of the spectrum canvas
    pub fn geometry(&self) -> Result<DisplayGeometry, ConfigError> {
        Ok(DisplayGeometry::new(
            self.bar_count,
            self.bar_width,
            self.bar_spacing,
            self.bar_height,
        )?)
    }

    /// Spectrum renderer options for `geometry`
    pub fn spectrum_options(&self, geometry: &DisplayGeometry) -> SpectrumBarsOptions {
        SpectrumBarsOptions {
            color: self.bar_color.into(),
            background_color: self.background_color.into(),
            ..SpectrumBarsOptions::from_geometry(geometry)
        }
    }

    /// Level meter options for `geometry`
    pub fn meter_options(&self, geometry: &DisplayGeometry) -> LevelMeterOptions {
        LevelMeterOptions {
            width: self.meter_width,
            height: geometry.height() as f32,
            color: self.meter_color.into(),
            background_color: self.background_color.into(),
            origin: self.meter_origin,
        }
    }
}
