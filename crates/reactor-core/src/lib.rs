//! Reactor Core - State, Scheduling and Selection Mapping
//!
//! This crate contains the non-visual heart of the reactor control surface:
//! - Render clock (tick broadcast with fault isolation)
//! - Analysis parser (analysis options + latest frame snapshot)
//! - Reactor (display/interaction state and its update protocol)
//! - Selection mapping (pixel rectangle <-> normalized range)
//! - Control surface (binds clock ticks and user input to a reactor)

#![warn(missing_docs)]

use thiserror::Error;

pub mod clock;
pub mod geometry;
pub mod logging;
pub mod parser;
pub mod reactor;
pub mod selection;
pub mod surface;

// --- Re-exports grouped by category ---

// Scheduling
pub use clock::{
    FramePacer, HandlerError, OwnerId, RenderClock, Subscription, TickHandler, TickReport,
};

// Analysis
pub use parser::{
    AnalysisFrame, AnalysisParser, FrameWriter, ParameterSpec, ParserOptions, ParserUpdate,
    MAX_DECIBELS, SMOOTHING,
};

// Reactor state
pub use geometry::DisplayGeometry;
pub use reactor::{OutputMode, Reactor, ReactorUpdate, SelectionChange, SharedReactor};
pub use selection::{FracRange, Rect, SelectionMapper};

// Surface binding
pub use surface::{ControlSurface, LevelRenderer, ParameterChange, SpectrumRenderer};

// Logging
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid display geometry
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Output mode title not recognized
    #[error("Unknown output mode: {0}")]
    UnknownOutputMode(String),

    /// Parameter name not recognized
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Parameter value could not be parsed
    #[error("Invalid value {value:?} for parameter {name}")]
    InvalidParameterValue {
        /// Parameter name
        name: String,
        /// Raw value
        value: String,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
