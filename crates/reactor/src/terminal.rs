//! Text renderers for the headless monitor

use reactor_core::{FracRange, LevelRenderer, SpectrumRenderer};

const BLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn block(value: f32) -> char {
    let value = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    };
    BLOCKS[(value * (BLOCKS.len() - 1) as f32).round() as usize]
}

/// One block character per bar
#[derive(Debug, Default)]
pub struct TextSpectrum {
    line: String,
    bars: usize,
}

impl TextSpectrum {
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Line with the bars outside `range` dimmed to dots.
    ///
    /// A degenerate range filters nothing.
    pub fn line_with_range(&self, range: Option<FracRange>) -> String {
        let Some(range) = range.filter(|r| !r.is_degenerate()) else {
            return self.line.clone();
        };
        let span = range.bin_span(self.bars);
        self.line
            .chars()
            .enumerate()
            .map(|(i, c)| if span.contains(&i) { c } else { '·' })
            .collect()
    }
}

impl SpectrumRenderer for TextSpectrum {
    fn render(&mut self, fft: &[f32]) {
        self.line = fft.iter().copied().map(block).collect();
        self.bars = fft.len();
    }
}

/// Horizontal gauge of fixed width
#[derive(Debug)]
pub struct TextMeter {
    width: usize,
    level: f32,
}

impl TextMeter {
    pub fn new(width: usize) -> Self {
        Self { width, level: 0.0 }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn gauge(&self) -> String {
        let filled = (self.level * self.width as f32).round() as usize;
        format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            " ".repeat(self.width - filled),
            self.level * 100.0
        )
    }
}

impl LevelRenderer for TextMeter {
    fn render(&mut self, output: f32) {
        self.level = if output.is_finite() {
            output.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}
