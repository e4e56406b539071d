//! Analysis parser - analysis options plus the latest analysis frame.
//!
//! The spectrum itself is computed by an external audio pipeline. That
//! pipeline obtains a [`FrameWriter`] from [`AnalysisParser::attach`] and
//! publishes frames at its own cadence; the parser only ever reads the most
//! recent one and never waits for a fresh frame.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Describes a tunable analysis parameter for input widgets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    /// Field name used by parameter inputs
    pub name: &'static str,
    /// Human label
    pub label: &'static str,
    /// Lowest legal value
    pub min: f32,
    /// Highest legal value
    pub max: f32,
    /// Increment used by sliders and number inputs
    pub step: f32,
}

impl ParameterSpec {
    /// Clamp `value` into the legal interval
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Legal interval as an inclusive range
    pub fn range(&self) -> std::ops::RangeInclusive<f32> {
        self.min..=self.max
    }
}

/// Upper bound of the analysed decibel range
pub const MAX_DECIBELS: ParameterSpec = ParameterSpec {
    name: "maxDecibels",
    label: "Max dB",
    min: -40.0,
    max: 0.0,
    step: 1.0,
};

/// Averaging constant between consecutive analysis frames
pub const SMOOTHING: ParameterSpec = ParameterSpec {
    name: "smoothingTimeConstant",
    label: "Smoothing",
    min: 0.0,
    max: 0.99,
    step: 0.01,
};

/// Analysis options read by the audio pipeline on its next cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Upper bound of the decibel range, in `[-40, 0]`
    pub max_decibels: f32,
    /// Smoothing constant, in `[0, 0.99]`
    pub smoothing_time_constant: f32,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_decibels: -30.0,
            smoothing_time_constant: 0.8,
        }
    }
}

/// Partial change of [`ParserOptions`]; `None` leaves a field untouched
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParserUpdate {
    /// New max decibels
    pub max_decibels: Option<f32>,
    /// New smoothing constant
    pub smoothing_time_constant: Option<f32>,
}

impl ParserUpdate {
    /// Change only the max decibels
    pub fn max_decibels(value: f32) -> Self {
        Self {
            max_decibels: Some(value),
            ..Self::default()
        }
    }

    /// Change only the smoothing constant
    pub fn smoothing(value: f32) -> Self {
        Self {
            smoothing_time_constant: Some(value),
            ..Self::default()
        }
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.max_decibels.is_none() && self.smoothing_time_constant.is_none()
    }
}

/// One analysis snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisFrame {
    /// Magnitude per frequency bin, lowest bin first
    pub fft: Vec<f32>,
    /// Aggregate output level
    pub output: f32,
}

impl AnalysisFrame {
    /// All-zero frame with `bins` bins
    pub fn silent(bins: usize) -> Self {
        Self {
            fft: vec![0.0; bins],
            output: 0.0,
        }
    }

    /// Copy of this frame padded with zeros or truncated to `bins` bins
    pub fn with_bin_count(&self, bins: usize) -> Self {
        let mut fft = self.fft.clone();
        fft.resize(bins, 0.0);
        Self {
            fft,
            output: self.output,
        }
    }
}

/// Publishing side handed to the external analysis pipeline.
///
/// The writer is `Send + Sync`; publishing never blocks the reader.
pub struct FrameWriter {
    frame: Arc<ArcSwap<AnalysisFrame>>,
    options: Arc<ArcSwap<ParserOptions>>,
}

impl FrameWriter {
    /// Publish a new frame.
    ///
    /// Non-finite values are replaced by `0.0`.
    pub fn publish(&self, fft: &[f32], output: f32) {
        let fft = fft
            .iter()
            .map(|&v| if v.is_finite() { v } else { 0.0 })
            .collect();
        let output = if output.is_finite() { output } else { 0.0 };
        self.frame.store(Arc::new(AnalysisFrame { fft, output }));
    }

    /// Options the pipeline should apply on its next cycle
    pub fn options(&self) -> ParserOptions {
        **self.options.load()
    }

    /// False once the parser detached or re-attached another writer
    pub fn is_connected(&self) -> bool {
        Arc::strong_count(&self.frame) > 1
    }
}

impl std::fmt::Debug for FrameWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Holds analysis options and exposes the latest analysis frame
pub struct AnalysisParser {
    bins: usize,
    options: Arc<ArcSwap<ParserOptions>>,
    link: Option<Arc<ArcSwap<AnalysisFrame>>>,
}

impl std::fmt::Debug for AnalysisParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisParser")
            .field("bins", &self.bins)
            .field("options", &self.options())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl AnalysisParser {
    /// Parser producing frames of `bins` bins, with default options
    pub fn new(bins: usize) -> Self {
        Self::with_options(bins, ParserOptions::default())
    }

    /// Parser with explicit initial options (clamped)
    pub fn with_options(bins: usize, options: ParserOptions) -> Self {
        let parser = Self {
            bins,
            options: Arc::new(ArcSwap::from_pointee(ParserOptions::default())),
            link: None,
        };
        parser.update(ParserUpdate {
            max_decibels: Some(options.max_decibels),
            smoothing_time_constant: Some(options.smoothing_time_constant),
        });
        parser
    }

    /// Current options
    pub fn options(&self) -> ParserOptions {
        **self.options.load()
    }

    /// Merge `update` into the options.
    ///
    /// Out-of-range values are clamped to the legal interval. NaN values are
    /// ignored.
    pub fn update(&self, update: ParserUpdate) {
        let max_decibels = update
            .max_decibels
            .and_then(|value| accept(&MAX_DECIBELS, value));
        let smoothing = update
            .smoothing_time_constant
            .and_then(|value| accept(&SMOOTHING, value));

        // Merge into the current value; a concurrent update of the other
        // field survives
        self.options.rcu(|current| {
            let mut options = **current;
            if let Some(value) = max_decibels {
                options.max_decibels = value;
            }
            if let Some(value) = smoothing {
                options.smoothing_time_constant = value;
            }
            options
        });

        let options = self.options();
        debug!(
            "Parser options: max_decibels={}, smoothing={}",
            options.max_decibels, options.smoothing_time_constant
        );
    }

    /// Number of bins in every returned frame
    pub fn bin_count(&self) -> usize {
        self.bins
    }

    /// Change the number of bins returned by [`frame`](Self::frame)
    pub fn set_bin_count(&mut self, bins: usize) {
        self.bins = bins;
    }

    /// Connect an analysis pipeline, replacing any previous one
    pub fn attach(&mut self) -> FrameWriter {
        if self.link.is_some() {
            debug!("Parser re-attached; previous writer disconnected");
        }
        let frame = Arc::new(ArcSwap::from_pointee(AnalysisFrame::silent(self.bins)));
        self.link = Some(frame.clone());
        FrameWriter {
            frame,
            options: self.options.clone(),
        }
    }

    /// Disconnect the analysis pipeline; frames fall back to silence
    pub fn detach(&mut self) {
        if self.link.take().is_some() {
            debug!("Parser detached from analysis pipeline");
        }
    }

    /// Whether an analysis pipeline is connected
    pub fn is_attached(&self) -> bool {
        self.link.is_some()
    }

    /// Latest analysis frame, always exactly `bin_count` bins long.
    ///
    /// Without an attached pipeline this is an all-zero frame.
    pub fn frame(&self) -> AnalysisFrame {
        match &self.link {
            Some(link) => {
                let frame = link.load();
                if frame.fft.len() == self.bins {
                    AnalysisFrame::clone(&frame)
                } else {
                    frame.with_bin_count(self.bins)
                }
            }
            None => AnalysisFrame::silent(self.bins),
        }
    }
}

fn accept(spec: &ParameterSpec, value: f32) -> Option<f32> {
    if value.is_nan() {
        warn!("Ignoring NaN for {}", spec.name);
        return None;
    }
    let clamped = spec.clamp(value);
    if clamped != value {
        debug!("Clamped {} from {} to {}", spec.name, value, clamped);
    }
    Some(clamped)
}
