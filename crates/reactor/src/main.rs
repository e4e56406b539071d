//! Reactor - headless monitor for the reactor control surface
//!
//! Runs one reactor against a synthetic analysis feed, drives the render
//! clock at the configured frame rate, replays a scripted set of user
//! gestures and prints the spectrum and level meter as text.

#![warn(missing_docs)]

mod logging_setup;
mod script;
mod signal;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use reactor_core::{ControlSurface, FramePacer, Reactor, RenderClock};
use reactor_ui::PanelConfig;
use script::InputScript;
use signal::SignalFeed;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use terminal::{TextMeter, TextSpectrum};
use tracing::{info, warn};

/// Headless monitor for the reactor control surface
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "reactor", version, about)]
struct Args {
    /// Path to the panel config TOML
    #[arg(long, default_value = "reactor.toml")]
    config: PathBuf,

    /// Number of render ticks to run
    #[arg(long, default_value_t = 180)]
    frames: u64,

    /// Print the spectrum every N ticks
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    print_every: u64,

    /// Reactor name shown in the title
    #[arg(long, default_value = "Reactor")]
    name: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = PanelConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config {:?}", args.config))?;
    let _log_guard = logging_setup::init(&config.log)?;

    info!("==========================================");
    info!("===      Reactor Session Started       ===");
    info!("==========================================");

    let geometry = config.geometry()?;
    let reactor = Reactor::new(args.name.as_str(), geometry).into_shared();
    let writer = reactor.lock().parser_mut().attach();

    let clock = RenderClock::new();
    let mut pacer = FramePacer::new(config.target_fps, Instant::now());
    let feed = SignalFeed::spawn(writer, geometry.bar_count(), pacer.interval())?;

    let surface = ControlSurface::new(geometry, TextSpectrum::default(), TextMeter::new(20));
    let _subscription = surface.attach(&clock);
    surface.bind(reactor.clone());

    let script = InputScript::demo(geometry.width(), geometry.height());
    info!(
        "Running {} frames at {:?} per frame, {} scripted gestures",
        args.frames,
        pacer.interval(),
        script.len()
    );

    while clock.tick_count() < args.frames {
        let now = Instant::now();
        if !pacer.due(now) {
            thread::sleep(pacer.next_deadline().saturating_duration_since(now));
            continue;
        }

        script.apply(clock.tick_count() + 1, &surface);
        let report = clock.tick();
        if report.faults > 0 {
            warn!("Tick {}: {} handler fault(s)", report.tick, report.faults);
        }

        if report.tick % args.print_every == 0 {
            let range = reactor.lock().range();
            surface.with_renderers(|spectrum, meter| {
                println!(
                    "{:>5} |{}| {}",
                    report.tick,
                    spectrum.line_with_range(range),
                    meter.gauge()
                );
            });
        }
    }

    let published = feed.stop();
    let reactor = reactor.lock();
    info!(
        "Session finished: {} ticks drawn, {} frames published, mode {}, parser {:?}",
        surface.draw_count(),
        published,
        reactor.output_mode(),
        reactor.parser().options()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("reactor").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.config, PathBuf::from("reactor.toml"));
        assert_eq!(parsed.frames, 180);
        assert_eq!(parsed.print_every, 10);
        assert_eq!(parsed.name, "Reactor");
    }

    #[test]
    fn test_parse_all_options() {
        let parsed = args(&[
            "--config",
            "panel.toml",
            "--frames",
            "12",
            "--print-every",
            "3",
            "--name",
            "Kick",
        ])
        .unwrap();
        assert_eq!(parsed.config, PathBuf::from("panel.toml"));
        assert_eq!(parsed.frames, 12);
        assert_eq!(parsed.print_every, 3);
        assert_eq!(parsed.name, "Kick");
    }

    #[test]
    fn test_parse_help() {
        let err = args(&["--frames", "3", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--frames"]).is_err());
        assert!(args(&["--frames", "many"]).is_err());
        assert!(args(&["--loud"]).is_err());
    }

    #[test]
    fn test_print_every_zero_rejected() {
        let err = args(&["--print-every", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(args(&["--print-every", "1"]).unwrap().print_every, 1);
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
