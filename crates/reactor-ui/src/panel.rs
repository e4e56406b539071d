//! Reactor Control Panel
//!
//! Title, output-mode buttons, analysis parameter inputs, the spectrum canvas
//! with its selection overlay, and the output level meter. Every edit is sent
//! through the [`ControlSurface`]; the panel itself holds no reactor state.

use crate::config::PanelConfig;
use crate::theme::colors;
use crate::widgets::{InteractionInput, LevelMeter, SelectionBox, SelectionEvent, SpectrumBars};
use egui::{pos2, vec2, Color32, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use reactor_core::{
    ControlSurface, DisplayGeometry, OutputMode, ParameterChange, ParameterSpec, ParserOptions,
    RenderClock, SharedReactor, Subscription, MAX_DECIBELS, SMOOTHING,
};
use tracing::debug;

/// The surface type driven by the panel
pub type PanelSurface = ControlSurface<SpectrumBars, LevelMeter>;

/// Values shown by the controls, read once per frame
#[derive(Debug, Clone)]
struct PanelSnapshot {
    display_name: String,
    output_mode: OutputMode,
    max_decibels: f32,
    smoothing: f32,
    selection: Option<reactor_core::Rect>,
}

impl PanelSnapshot {
    fn read(reactor: &SharedReactor) -> Self {
        let reactor = reactor.lock();
        let options = reactor.parser().options();
        Self {
            display_name: reactor.display_name().to_string(),
            output_mode: reactor.output_mode(),
            max_decibels: options.max_decibels,
            smoothing: options.smoothing_time_constant,
            selection: reactor.selection(),
        }
    }
}

/// egui panel for one reactor
pub struct ReactorPanel {
    surface: PanelSurface,
    selection_box: SelectionBox,
}

impl ReactorPanel {
    /// Build a panel and its renderers from a config
    pub fn new(geometry: DisplayGeometry, config: &PanelConfig) -> Self {
        let spectrum = SpectrumBars::new(config.spectrum_options(&geometry));
        let meter = LevelMeter::new(config.meter_options(&geometry));
        Self {
            surface: ControlSurface::new(geometry, spectrum, meter),
            selection_box: SelectionBox::from_geometry(&geometry),
        }
    }

    /// Redraw the renderers on every tick of `clock`
    #[must_use = "dropping the subscription stops drawing"]
    pub fn attach(&self, clock: &RenderClock) -> Subscription {
        self.surface.attach(clock)
    }

    /// Show `reactor` in this panel
    pub fn bind(&self, reactor: SharedReactor) {
        self.surface.bind(reactor);
    }

    pub fn unbind(&self) -> Option<SharedReactor> {
        self.surface.unbind()
    }

    pub fn surface(&self) -> &PanelSurface {
        &self.surface
    }

    /// Draw the panel. Returns true if the user changed anything.
    pub fn show(&mut self, ui: &mut Ui) -> bool {
        if !self.surface.is_visible() {
            return false;
        }

        let snapshot = self.surface.reactor().map(|r| PanelSnapshot::read(&r));
        let mut changes = Vec::new();
        let mut clear_requested = false;

        let title = snapshot
            .as_ref()
            .map(|s| s.display_name.as_str())
            .unwrap_or_default();
        render_title(ui, title);
        ui.add_space(4.0);

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.add_enabled_ui(snapshot.is_some(), |ui| {
                    Self::show_controls(ui, snapshot.as_ref(), &mut changes, &mut clear_requested);
                });
            });

            ui.add_space(8.0);
            let selection = snapshot.as_ref().and_then(|s| s.selection);
            if let Some(event) = self.show_spectrum(ui, selection) {
                match event {
                    SelectionEvent::Selected(rect) => {
                        self.surface.select(rect);
                    }
                    SelectionEvent::Cleared => clear_requested = true,
                }
            }

            ui.add_space(4.0);
            self.surface.with_renderers(|_, meter| ui.add(meter));
        });

        let mut changed = false;
        for change in changes {
            debug!("Panel parameter change: {:?}", change);
            changed |= self.surface.apply(change);
        }
        if clear_requested {
            changed |= self.surface.clear_selection();
        }

        if self.surface.take_refresh_request() {
            ui.ctx().request_repaint();
            changed = true;
        }
        changed
    }

    fn show_controls(
        ui: &mut Ui,
        snapshot: Option<&PanelSnapshot>,
        changes: &mut Vec<ParameterChange>,
        clear_requested: &mut bool,
    ) {
        let current_mode = snapshot.map(|s| s.output_mode);
        let defaults = ParserOptions::default();

        egui::Grid::new("reactor_controls_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Output Mode");
                ui.horizontal(|ui| {
                    for mode in OutputMode::ALL {
                        let selected = current_mode == Some(mode);
                        if ui.selectable_label(selected, mode.title()).clicked() && !selected {
                            changes.push(ParameterChange::OutputMode(mode));
                        }
                    }
                });
                ui.end_row();

                let mut max_decibels = snapshot.map_or(defaults.max_decibels, |s| s.max_decibels);
                ui.label(MAX_DECIBELS.label);
                if parameter_input(ui, &MAX_DECIBELS, &mut max_decibels) {
                    changes.push(ParameterChange::MaxDecibels(max_decibels));
                }
                ui.end_row();

                let mut smoothing = snapshot.map_or(defaults.smoothing_time_constant, |s| s.smoothing);
                ui.label(SMOOTHING.label);
                if parameter_input(ui, &SMOOTHING, &mut smoothing) {
                    changes.push(ParameterChange::Smoothing(smoothing));
                }
                ui.end_row();

                ui.label("Selection");
                let has_selection = snapshot.is_some_and(|s| s.selection.is_some());
                if ui
                    .add_enabled(has_selection, egui::Button::new("Clear"))
                    .clicked()
                {
                    *clear_requested = true;
                }
                ui.end_row();
            });
    }

    fn show_spectrum(
        &mut self,
        ui: &mut Ui,
        selection: Option<reactor_core::Rect>,
    ) -> Option<SelectionEvent> {
        let size = self.surface.with_renderers(|spectrum, _| spectrum.size());
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let canvas = response.rect;

        self.surface
            .with_renderers(|spectrum, _| spectrum.paint(&painter, canvas));

        let pointer = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));
        let mut event = None;
        if let Some(pointer) = pointer {
            let input = InteractionInput {
                pointer_pos: (pointer - canvas.min).to_pos2(),
                clicked: response.clicked(),
                dragged: response.dragged(),
                drag_delta: response.drag_delta(),
                drag_started: response.drag_started(),
                drag_stopped: response.drag_stopped(),
            };
            event = self.selection_box.handle_interaction(input);
        }

        // A drag in progress previews over the stored selection
        let overlay = self.selection_box.preview().or(selection);
        if let Some(rect) = overlay {
            paint_selection(&painter, canvas.min, rect);
        }
        painter.rect_stroke(
            canvas,
            0.0,
            Stroke::new(1.0, colors::STROKE_GREY),
            egui::StrokeKind::Inside,
        );

        event
    }
}

/// Number field plus slider for one analysis parameter.
///
/// Returns true if either widget changed `value`.
fn parameter_input(ui: &mut Ui, spec: &ParameterSpec, value: &mut f32) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui
            .add(
                egui::DragValue::new(value)
                    .range(spec.range())
                    .speed(spec.step)
                    .min_decimals(decimals(spec.step)),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(value, spec.range())
                    .step_by(f64::from(spec.step))
                    .show_value(false),
            )
            .changed();
    });
    changed
}

fn decimals(step: f32) -> usize {
    if step >= 1.0 {
        0
    } else {
        (-step.log10()).round() as usize
    }
}

fn render_title(ui: &mut Ui, title: &str) {
    let desired_size = Vec2::new(ui.available_width(), 24.0);
    let (rect, _response) = ui.allocate_at_least(desired_size, Sense::hover());

    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, colors::LIGHTER_GREY);
    let stripe = Rect::from_min_size(rect.min, vec2(3.0, rect.height()));
    painter.rect_filled(stripe, 0.0, colors::REACTOR_PURPLE);

    painter.text(
        pos2(rect.min.x + 11.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        title,
        egui::FontId::proportional(14.0),
        Color32::WHITE,
    );
}

fn paint_selection(painter: &Painter, origin: Pos2, rect: reactor_core::Rect) {
    let min = origin + vec2(rect.x as f32, rect.y as f32);
    let area = Rect::from_min_size(min, vec2(rect.width as f32, rect.height as f32));
    painter.rect_filled(area, 0.0, colors::CYAN_ACCENT.gamma_multiply(0.15));
    painter.rect_stroke(
        area,
        0.0,
        Stroke::new(1.0, colors::CYAN_ACCENT),
        egui::StrokeKind::Inside,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactor_core::{AnalysisFrame, Reactor};

    fn run_frame(panel: &mut ReactorPanel) -> bool {
        let ctx = egui::Context::default();
        let mut changed = false;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                changed |= panel.show(ui);
            });
        });
        changed
    }

    #[test]
    fn test_decimals() {
        assert_eq!(decimals(MAX_DECIBELS.step), 0);
        assert_eq!(decimals(SMOOTHING.step), 2);
    }

    #[test]
    fn test_panel_renders_unbound() {
        let config = PanelConfig::default();
        let mut panel = ReactorPanel::new(config.geometry().unwrap(), &config);
        assert!(!run_frame(&mut panel));
    }

    #[test]
    fn test_bind_requests_refresh() {
        let config = PanelConfig::default();
        let mut panel = ReactorPanel::new(config.geometry().unwrap(), &config);
        panel.bind(Reactor::new("Vocals", DisplayGeometry::default()).into_shared());

        assert!(run_frame(&mut panel));
        assert!(!run_frame(&mut panel));
    }

    #[test]
    fn test_clock_feeds_renderers() {
        let config = PanelConfig::default();
        let geometry = config.geometry().unwrap();
        let panel = ReactorPanel::new(geometry, &config);
        let clock = RenderClock::new();
        let _subscription = panel.attach(&clock);

        let reactor = Reactor::new("Vocals", geometry).into_shared();
        let writer = reactor.lock().parser_mut().attach();
        panel.bind(reactor);

        let mut fft = AnalysisFrame::silent(64).fft;
        fft[10] = 0.75;
        writer.publish(&fft, 0.4);
        clock.tick();

        panel.surface().with_renderers(|spectrum, meter| {
            assert_eq!(spectrum.values()[10], 0.75);
            assert_eq!(meter.level(), 0.4);
        });
    }

    #[test]
    fn test_hidden_panel_shows_nothing() {
        let config = PanelConfig::default();
        let mut panel = ReactorPanel::new(config.geometry().unwrap(), &config);
        panel.bind(Reactor::new("Vocals", DisplayGeometry::default()).into_shared());
        panel.surface().set_visible(false);
        assert!(!run_frame(&mut panel));
        assert!(panel.surface().take_refresh_request());
    }
}
