//! Reactor - display/interaction state bound to one analysis parser.
//!
//! All mutation goes through [`Reactor::update`] (plus the geometry setter
//! used by the surface that displays it). A selection and its derived
//! normalized range are always replaced together.

use crate::geometry::DisplayGeometry;
use crate::parser::{AnalysisFrame, AnalysisParser};
use crate::selection::{FracRange, Rect, SelectionMapper};
use crate::CoreError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Playback/scan direction consumed downstream of the reactor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Scan from high to low
    Backwards,
    /// Scan from low to high
    #[default]
    Forward,
    /// Repeatedly scan from high to low
    CycleBackwards,
    /// Repeatedly scan from low to high
    CycleForward,
    /// Scan back and forth
    Cycle,
}

impl OutputMode {
    /// All modes in button-group order
    pub const ALL: [OutputMode; 5] = [
        OutputMode::Backwards,
        OutputMode::Forward,
        OutputMode::CycleBackwards,
        OutputMode::CycleForward,
        OutputMode::Cycle,
    ];

    /// Title shown on the mode button
    pub fn title(&self) -> &'static str {
        match self {
            Self::Backwards => "Backwards",
            Self::Forward => "Forward",
            Self::CycleBackwards => "Cycle Backwards",
            Self::CycleForward => "Cycle Forward",
            Self::Cycle => "Cycle",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for OutputMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.title().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownOutputMode(s.to_string()))
    }
}

/// How an update changes the selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionChange {
    /// Replace the selection with a new pixel rectangle
    Set(Rect),
    /// Remove the selection (no spatial filter)
    Clear,
}

/// Partial change of reactor state; `None` leaves a field untouched.
///
/// The range is not part of an update; it always follows the selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReactorUpdate {
    /// New output mode
    pub output_mode: Option<OutputMode>,
    /// New selection
    pub selection: Option<SelectionChange>,
}

impl ReactorUpdate {
    /// Change only the output mode
    pub fn output_mode(mode: OutputMode) -> Self {
        Self {
            output_mode: Some(mode),
            ..Self::default()
        }
    }

    /// Change only the selection
    pub fn select(rect: Rect) -> Self {
        Self {
            selection: Some(SelectionChange::Set(rect)),
            ..Self::default()
        }
    }

    /// Remove the selection
    pub fn clear_selection() -> Self {
        Self {
            selection: Some(SelectionChange::Clear),
            ..Self::default()
        }
    }
}

/// Reactor shared across threads; the mutex serializes updates
pub type SharedReactor = Arc<Mutex<Reactor>>;

/// Coordinator of one audio channel's display state and analysis parser
#[derive(Debug)]
pub struct Reactor {
    display_name: String,
    output_mode: OutputMode,
    selection: Option<Rect>,
    range: Option<FracRange>,
    geometry: DisplayGeometry,
    parser: AnalysisParser,
}

impl Reactor {
    /// Create a reactor for a channel called `display_name`
    pub fn new(display_name: impl Into<String>, geometry: DisplayGeometry) -> Self {
        Self::with_parser(
            display_name,
            geometry,
            AnalysisParser::new(geometry.bar_count()),
        )
    }

    /// Create a reactor around an existing parser
    pub fn with_parser(
        display_name: impl Into<String>,
        geometry: DisplayGeometry,
        mut parser: AnalysisParser,
    ) -> Self {
        parser.set_bin_count(geometry.bar_count());
        Self {
            display_name: display_name.into(),
            output_mode: OutputMode::default(),
            selection: None,
            range: None,
            geometry,
            parser,
        }
    }

    /// Wrap into a [`SharedReactor`]
    pub fn into_shared(self) -> SharedReactor {
        Arc::new(Mutex::new(self))
    }

    /// Merge `update` into the reactor state.
    ///
    /// A new selection derives its range from the current geometry in the
    /// same call.
    pub fn update(&mut self, update: ReactorUpdate) {
        if let Some(mode) = update.output_mode {
            if mode != self.output_mode {
                debug!(
                    "Reactor '{}' output mode: {} -> {}",
                    self.display_name, self.output_mode, mode
                );
            }
            self.output_mode = mode;
        }

        match update.selection {
            Some(SelectionChange::Set(rect)) => {
                let rect = rect.normalized();
                let range = self.mapper().to_range(rect);
                debug!(
                    "Reactor '{}' selection {:?} -> range {:?}",
                    self.display_name, rect, range
                );
                self.selection = Some(rect);
                self.range = Some(range);
            }
            Some(SelectionChange::Clear) => {
                if self.selection.is_some() {
                    debug!("Reactor '{}' selection cleared", self.display_name);
                }
                self.selection = None;
                self.range = None;
            }
            None => {}
        }
    }

    /// Replace the display geometry and re-derive the range from the selection
    pub fn set_geometry(&mut self, geometry: DisplayGeometry) {
        if geometry == self.geometry {
            return;
        }
        self.geometry = geometry;
        self.parser.set_bin_count(geometry.bar_count());
        self.range = self.selection.map(|rect| self.mapper().to_range(rect));
        debug!(
            "Reactor '{}' geometry now {}x{}, range {:?}",
            self.display_name,
            geometry.width(),
            geometry.height(),
            self.range
        );
    }

    /// Latest analysis frame, passed through from the parser unmodified
    pub fn result(&self) -> AnalysisFrame {
        self.parser.frame()
    }

    /// Channel label
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Current output mode
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Selection in display pixels, if any
    pub fn selection(&self) -> Option<Rect> {
        self.selection
    }

    /// Normalized range of the selection, if any
    pub fn range(&self) -> Option<FracRange> {
        self.range
    }

    /// Geometry the range is derived against
    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// Owned analysis parser
    pub fn parser(&self) -> &AnalysisParser {
        &self.parser
    }

    /// Owned analysis parser, mutable (attach/detach)
    pub fn parser_mut(&mut self) -> &mut AnalysisParser {
        &mut self.parser
    }

    fn mapper(&self) -> SelectionMapper {
        SelectionMapper::from_geometry(&self.geometry)
    }
}
