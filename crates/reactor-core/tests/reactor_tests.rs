use reactor_core::{
    AnalysisParser, ControlSurface, DisplayGeometry, FracRange, LevelRenderer, OutputMode,
    ParserUpdate, Reactor, ReactorUpdate, Rect, RenderClock, SpectrumRenderer,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct LastSpectrum(Option<Vec<f32>>);

impl SpectrumRenderer for LastSpectrum {
    fn render(&mut self, fft: &[f32]) {
        self.0 = Some(fft.to_vec());
    }
}

#[derive(Default)]
struct LastLevel(Option<f32>);

impl LevelRenderer for LastLevel {
    fn render(&mut self, output: f32) {
        self.0 = Some(output);
    }
}

#[test]
fn test_parser_clamps_max_decibels() {
    let parser = AnalysisParser::new(64);

    parser.update(ParserUpdate::max_decibels(10.0));
    assert_eq!(parser.options().max_decibels, 0.0);

    parser.update(ParserUpdate::max_decibels(-100.0));
    assert_eq!(parser.options().max_decibels, -40.0);
}

#[test]
fn test_zero_selection_yields_zero_range() {
    let mut reactor = Reactor::new("Vocals", DisplayGeometry::default());
    reactor.update(ReactorUpdate::select(Rect::new(0.0, 0.0, 0.0, 0.0)));
    assert_eq!(reactor.range(), Some(FracRange::new(0.0, 0.0, 0.0, 0.0)));
    assert!(reactor.range().unwrap().is_degenerate());
}

#[test]
fn test_result_without_audio_is_silent() {
    let reactor = Reactor::new("Vocals", DisplayGeometry::default());
    let frame = reactor.result();
    assert_eq!(frame.fft.len(), 64);
    assert!(frame.fft.iter().all(|&v| v == 0.0));
    assert_eq!(frame.output, 0.0);
}

#[test]
fn test_surface_flow_end_to_end() {
    let clock = RenderClock::new();
    let surface = ControlSurface::new(
        DisplayGeometry::default(),
        LastSpectrum::default(),
        LastLevel::default(),
    );
    let _subscription = surface.attach(&clock);

    let reactor = Reactor::new("Drums", DisplayGeometry::default()).into_shared();
    let writer = reactor.lock().parser_mut().attach();
    surface.bind(reactor.clone());

    let mut spectrum = vec![0.0; 64];
    spectrum[0] = 0.9;
    spectrum[63] = 0.1;
    writer.publish(&spectrum, 0.5);

    surface.select(Rect::new(72.0, 20.0, 144.0, 30.0));
    surface.set_output_mode(OutputMode::CycleBackwards);
    clock.tick();

    surface.with_renderers(|s, l| {
        assert_eq!(s.0.as_deref(), Some(spectrum.as_slice()));
        assert_eq!(l.0, Some(0.5));
    });

    let reactor = reactor.lock();
    assert_eq!(reactor.output_mode(), OutputMode::CycleBackwards);
    let range = reactor.range().unwrap();
    assert!((range.x1 - 0.125).abs() < 1e-9);
    assert!((range.x2 - 0.375).abs() < 1e-9);
    assert!((range.y1 - 0.2).abs() < 1e-9);
    assert!((range.y2 - 0.5).abs() < 1e-9);
}

#[test]
fn test_spectrum_and_level_come_from_one_frame() {
    let clock = RenderClock::new();
    let surface = ControlSurface::new(
        DisplayGeometry::new(8, 8.0, 1.0, 100.0).unwrap(),
        LastSpectrum::default(),
        LastLevel::default(),
    );
    let _subscription = surface.attach(&clock);

    let reactor = Reactor::new("Bass", DisplayGeometry::default()).into_shared();
    let writer = reactor.lock().parser_mut().attach();
    surface.bind(reactor);

    // The pipeline publishes frames where every bin equals the output level
    let running = Arc::new(AtomicBool::new(true));
    let producer = {
        let running = running.clone();
        thread::spawn(move || {
            let mut level = 0.0f32;
            while running.load(Ordering::Relaxed) {
                level = (level + 0.01) % 1.0;
                writer.publish(&[level; 8], level);
                thread::yield_now();
            }
        })
    };

    for _ in 0..200 {
        clock.tick();
        surface.with_renderers(|s, l| {
            let fft = s.0.as_ref().unwrap();
            let output = l.0.unwrap();
            assert!(fft.iter().all(|&v| v == output));
        });
        thread::sleep(Duration::from_micros(50));
    }

    running.store(false, Ordering::Relaxed);
    producer.join().unwrap();
}
