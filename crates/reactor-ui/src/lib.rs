//! Reactor UI - egui front end for the reactor control surface
//!
//! - Spectrum bars and level meter renderers
//! - Selection box drag handling
//! - Reactor panel (controls + canvas + meter)
//! - Panel configuration (TOML)

pub mod config;
pub mod panel;
pub mod theme;
pub mod widgets;

pub use config::{ConfigError, PanelConfig, RgbColor};
pub use panel::{PanelSurface, ReactorPanel};
pub use widgets::{
    InteractionInput, LevelMeter, LevelMeterOptions, MeterOrigin, SelectionBox, SelectionEvent,
    SpectrumBars, SpectrumBarsOptions,
};
