use egui::{pos2, Pos2};
use reactor_core::{OutputMode, ParameterChange, Reactor, RenderClock};
use reactor_ui::{InteractionInput, PanelConfig, ReactorPanel, SelectionBox, SelectionEvent};

fn drag(selection: &mut SelectionBox, from: Pos2, to: Pos2) -> SelectionEvent {
    let at = |pos| InteractionInput {
        pointer_pos: pos,
        ..InteractionInput::default()
    };
    selection.handle_interaction(InteractionInput {
        drag_started: true,
        ..at(from)
    });
    selection.handle_interaction(InteractionInput {
        dragged: true,
        ..at(to)
    });
    selection
        .handle_interaction(InteractionInput {
            drag_stopped: true,
            ..at(to)
        })
        .unwrap()
}

#[test]
fn test_drag_over_configured_canvas_sets_range() {
    let config = PanelConfig::from_toml_str("bar_count = 64\nbar_height = 100.0").unwrap();
    let geometry = config.geometry().unwrap();
    let panel = ReactorPanel::new(geometry, &config);
    let reactor = Reactor::new("Lead", geometry).into_shared();
    panel.bind(reactor.clone());

    let mut selection = SelectionBox::from_geometry(&geometry);
    let SelectionEvent::Selected(rect) = drag(&mut selection, pos2(72.0, 20.0), pos2(216.0, 50.0))
    else {
        panic!("drag did not select");
    };
    assert!(panel.surface().select(rect));

    let range = reactor.lock().range().unwrap();
    assert!((range.x1 - 0.125).abs() < 1e-9);
    assert!((range.x2 - 0.375).abs() < 1e-9);
    assert!((range.y1 - 0.2).abs() < 1e-9);
    assert!((range.y2 - 0.5).abs() < 1e-9);
}

#[test]
fn test_narrow_canvas_rederives_range() {
    let config = PanelConfig::from_toml_str("bar_count = 32").unwrap();
    let reactor = Reactor::new("Lead", Default::default()).into_shared();

    let panel = ReactorPanel::new(config.geometry().unwrap(), &config);
    panel.bind(reactor.clone());
    panel.surface().select(reactor_core::Rect::new(0.0, 0.0, 144.0, 100.0));

    let reactor = reactor.lock();
    assert_eq!(reactor.parser().bin_count(), 32);
    assert!((reactor.range().unwrap().x2 - 0.5).abs() < 1e-9);
}

#[test]
fn test_parameter_widgets_reach_parser() {
    let config = PanelConfig::default();
    let geometry = config.geometry().unwrap();
    let panel = ReactorPanel::new(geometry, &config);
    let clock = RenderClock::new();
    let _subscription = panel.attach(&clock);
    let reactor = Reactor::new("Lead", geometry).into_shared();
    panel.bind(reactor.clone());

    let surface = panel.surface();
    assert!(surface.apply(ParameterChange::from_named("maxDecibels", "10").unwrap()));
    assert!(surface.apply(ParameterChange::from_named("outputMode", "Cycle").unwrap()));
    clock.tick();

    let reactor = reactor.lock();
    assert_eq!(reactor.parser().options().max_decibels, 0.0);
    assert_eq!(reactor.output_mode(), OutputMode::Cycle);
    assert_eq!(surface.draw_count(), 1);
}
