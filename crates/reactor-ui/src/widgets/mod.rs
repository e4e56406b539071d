pub mod level_meter;
pub mod selection_box;
pub mod spectrum_bars;

pub use level_meter::{LevelMeter, LevelMeterOptions, MeterOrigin};
pub use selection_box::{InteractionInput, SelectionBox, SelectionEvent};
pub use spectrum_bars::{SpectrumBars, SpectrumBarsOptions};
