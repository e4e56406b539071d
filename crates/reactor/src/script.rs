//! Scripted user input for the headless monitor
//!
//! Replays the gestures a user would make on the panel (drag a selection,
//! pick an output mode, move the sliders) at fixed tick numbers.

use reactor_core::{
    ControlSurface, LevelRenderer, OutputMode, ParameterChange, Rect, SpectrumRenderer,
};
use tracing::info;

/// One input gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Select(Rect),
    ClearSelection,
    Change(ParameterChange),
}

/// Gestures keyed by the tick they fire before
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    steps: Vec<(u64, Gesture)>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gesture; steps are kept sorted by tick
    pub fn at(mut self, tick: u64, gesture: Gesture) -> Self {
        let index = self.steps.partition_point(|(t, _)| *t <= tick);
        self.steps.insert(index, (tick, gesture));
        self
    }

    /// Demo sequence for a canvas of `width` x `height` pixels
    pub fn demo(width: f64, height: f64) -> Self {
        let selection = Rect::new(width * 0.125, height * 0.2, width * 0.25, height * 0.3);
        Self::new()
            .at(30, Gesture::Select(selection))
            .at(
                60,
                Gesture::Change(ParameterChange::OutputMode(OutputMode::Cycle)),
            )
            .at(90, Gesture::Change(ParameterChange::Smoothing(0.3)))
            .at(120, Gesture::Change(ParameterChange::MaxDecibels(-10.0)))
            .at(150, Gesture::ClearSelection)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every gesture scheduled for `tick`; returns how many were applied
    pub fn apply<S, L>(&self, tick: u64, surface: &ControlSurface<S, L>) -> usize
    where
        S: SpectrumRenderer + 'static,
        L: LevelRenderer + 'static,
    {
        let mut applied = 0;
        for (_, gesture) in self.steps.iter().filter(|(t, _)| *t == tick) {
            info!("Tick {}: {:?}", tick, gesture);
            let accepted = match *gesture {
                Gesture::Select(rect) => surface.select(rect),
                Gesture::ClearSelection => surface.clear_selection(),
                Gesture::Change(change) => surface.apply(change),
            };
            if accepted {
                applied += 1;
            }
        }
        applied
    }
}
