//! Synthetic analysis feed
//!
//! Stands in for an audio pipeline: a peak sweeps across the spectrum and is
//! published through a [`FrameWriter`] from a background thread. The parser's
//! current options are applied the way an analyser applies them: magnitudes
//! are scaled into the `[MIN_DECIBELS, max_decibels]` window and smoothed over
//! time with the smoothing constant.

use anyhow::{Context, Result};
use reactor_core::{FrameWriter, ParserOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Lower edge of the decibel window
pub const MIN_DECIBELS: f32 = -100.0;

/// Level of the sweeping peak
const PEAK_DECIBELS: f32 = -12.0;
/// Level of the noise floor
const FLOOR_DECIBELS: f32 = -90.0;

/// Produces one spectrum per step
#[derive(Debug, Clone)]
pub struct SweepGenerator {
    bins: usize,
    phase: f32,
    /// Fraction of the spectrum the peak moves per step
    speed: f32,
    smoothed: Vec<f32>,
}

impl SweepGenerator {
    pub fn new(bins: usize, speed: f32) -> Self {
        Self {
            bins,
            phase: 0.0,
            speed,
            smoothed: vec![0.0; bins],
        }
    }

    /// Advance one step and return `(fft, output)`
    pub fn next_frame(&mut self, options: &ParserOptions) -> (Vec<f32>, f32) {
        let center = self.phase * self.bins as f32;
        let width = (self.bins as f32 / 16.0).max(1.0);
        let smoothing = options.smoothing_time_constant;

        for (i, smoothed) in self.smoothed.iter_mut().enumerate() {
            let distance = (i as f32 - center) / width;
            let decibels =
                FLOOR_DECIBELS + (PEAK_DECIBELS - FLOOR_DECIBELS) * (-distance * distance).exp();
            let magnitude = scale_decibels(decibels, options.max_decibels);
            *smoothed = smoothing * *smoothed + (1.0 - smoothing) * magnitude;
        }

        self.phase = (self.phase + self.speed).fract();

        let output = if self.bins == 0 {
            0.0
        } else {
            self.smoothed.iter().copied().fold(0.0, f32::max)
        };
        (self.smoothed.clone(), output)
    }
}

/// Map a decibel value into [0, 1] of the `[MIN_DECIBELS, max_decibels]` window
pub fn scale_decibels(decibels: f32, max_decibels: f32) -> f32 {
    let span = max_decibels - MIN_DECIBELS;
    if span <= 0.0 {
        return 0.0;
    }
    ((decibels - MIN_DECIBELS) / span).clamp(0.0, 1.0)
}

/// Background thread publishing generated frames
pub struct SignalFeed {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl SignalFeed {
    /// Start publishing to `writer` every `interval`
    pub fn spawn(writer: FrameWriter, bins: usize, interval: Duration) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let handle = thread::Builder::new()
            .name("signal-feed".to_string())
            .spawn({
                let running = running.clone();
                move || {
                    let mut generator = SweepGenerator::new(bins, 0.01);
                    let mut frames = 0u64;
                    while running.load(Ordering::Relaxed) && writer.is_connected() {
                        let (fft, output) = generator.next_frame(&writer.options());
                        writer.publish(&fft, output);
                        frames += 1;
                        thread::sleep(interval);
                    }
                    debug!("Signal feed stopped after {} frames", frames);
                    frames
                }
            })
            .context("Failed to spawn signal feed thread")?;

        info!("Signal feed started ({} bins, {:?} interval)", bins, interval);
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the thread and return the number of frames it published
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        self.running.store(false, Ordering::Relaxed);
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for SignalFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}
