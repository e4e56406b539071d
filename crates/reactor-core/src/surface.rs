//! Control surface - binds clock ticks and user input to a reactor.
//!
//! The surface exclusively owns one spectrum renderer and one level renderer.
//! On every tick it reads the bound reactor's result once and hands the
//! spectrum and the output level to the two renderers, so both displays always
//! show the same frame.

use crate::clock::{HandlerError, OwnerId, RenderClock, Subscription, TickHandler};
use crate::geometry::DisplayGeometry;
use crate::parser::{ParserUpdate, MAX_DECIBELS, SMOOTHING};
use crate::reactor::{OutputMode, ReactorUpdate, SharedReactor};
use crate::selection::Rect;
use crate::{CoreError, Result};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// Draws one bar per spectrum magnitude, lowest frequency bin leftmost
pub trait SpectrumRenderer {
    /// Draw a spectrum frame
    fn render(&mut self, fft: &[f32]);
}

/// Draws the aggregate output level
pub trait LevelRenderer {
    /// Draw an output level
    fn render(&mut self, output: f32);
}

/// A single change emitted by a parameter input widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterChange {
    /// Output-mode button group
    OutputMode(OutputMode),
    /// Max dB slider / number input
    MaxDecibels(f32),
    /// Smoothing slider / number input
    Smoothing(f32),
}

impl ParameterChange {
    /// Parse a `(name, value)` pair as emitted by generic input widgets
    pub fn from_named(name: &str, value: &str) -> Result<Self> {
        let number = || {
            value
                .trim()
                .parse::<f32>()
                .map_err(|_| CoreError::InvalidParameterValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })
        };

        match name {
            "outputMode" => Ok(Self::OutputMode(value.parse()?)),
            n if n == MAX_DECIBELS.name => Ok(Self::MaxDecibels(number()?)),
            n if n == SMOOTHING.name => Ok(Self::Smoothing(number()?)),
            _ => Err(CoreError::UnknownParameter(name.to_string())),
        }
    }
}

struct SurfaceState<S, L> {
    geometry: DisplayGeometry,
    reactor: Option<SharedReactor>,
    spectrum: S,
    level: L,
    refresh_requested: bool,
    visible: bool,
    draws: u64,
}

impl<S: SpectrumRenderer, L: LevelRenderer> SurfaceState<S, L> {
    fn draw(&mut self) -> bool {
        let Some(reactor) = &self.reactor else {
            return false;
        };
        // One read per draw keeps spectrum and level consistent
        let frame = reactor.lock().result();
        self.spectrum.render(&frame.fft);
        self.level.render(frame.output);
        self.draws += 1;
        trace!("Surface draw #{} (output {:.3})", self.draws, frame.output);
        true
    }
}

/// Presentational binding between a [`RenderClock`], user input and a reactor
pub struct ControlSurface<S, L> {
    state: Rc<RefCell<SurfaceState<S, L>>>,
    owner: OwnerId,
}

impl<S, L> ControlSurface<S, L>
where
    S: SpectrumRenderer + 'static,
    L: LevelRenderer + 'static,
{
    /// Create an unbound surface owning the given renderers
    pub fn new(geometry: DisplayGeometry, spectrum: S, level: L) -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                geometry,
                reactor: None,
                spectrum,
                level,
                refresh_requested: false,
                visible: true,
                draws: 0,
            })),
            owner: OwnerId::next(),
        }
    }

    /// Owner key used for clock registrations
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Draw on every tick of `clock` until the returned guard is dropped
    #[must_use = "dropping the subscription stops drawing"]
    pub fn attach(&self, clock: &RenderClock) -> Subscription {
        let state = Rc::downgrade(&self.state);
        let handler: TickHandler = Rc::new(move || -> std::result::Result<(), HandlerError> {
            if let Some(state) = state.upgrade() {
                state
                    .try_borrow_mut()
                    .map_err(|e| Box::new(e) as HandlerError)?
                    .draw();
            }
            Ok(())
        });
        debug!("Control surface {} attached to clock", self.owner.raw());
        clock.subscribe_scoped(handler, self.owner)
    }

    /// Draw the bound reactor's current frame now.
    ///
    /// Returns false (and draws nothing) when no reactor is bound.
    pub fn draw(&self) -> bool {
        self.state.borrow_mut().draw()
    }

    /// Bind a reactor, pushing this surface's geometry into it
    pub fn bind(&self, reactor: SharedReactor) {
        let mut state = self.state.borrow_mut();
        {
            let mut guard = reactor.lock();
            guard.set_geometry(state.geometry);
            debug!("Control surface bound to reactor '{}'", guard.display_name());
        }
        state.reactor = Some(reactor);
        state.refresh_requested = true;
    }

    /// Unbind the current reactor; renderers keep their last frame
    pub fn unbind(&self) -> Option<SharedReactor> {
        let mut state = self.state.borrow_mut();
        let reactor = state.reactor.take();
        if reactor.is_some() {
            debug!("Control surface unbound");
            state.refresh_requested = true;
        }
        reactor
    }

    /// Currently bound reactor
    pub fn reactor(&self) -> Option<SharedReactor> {
        self.state.borrow().reactor.clone()
    }

    /// Geometry of the spectrum canvas
    pub fn geometry(&self) -> DisplayGeometry {
        self.state.borrow().geometry
    }

    /// User finished dragging a selection box
    pub fn select(&self, rect: Rect) -> bool {
        self.update_reactor(ReactorUpdate::select(rect))
    }

    /// User cleared the selection
    pub fn clear_selection(&self) -> bool {
        self.update_reactor(ReactorUpdate::clear_selection())
    }

    /// User picked an output mode
    pub fn set_output_mode(&self, mode: OutputMode) -> bool {
        self.update_reactor(ReactorUpdate::output_mode(mode))
    }

    /// User changed an analysis parameter
    pub fn update_parser(&self, update: ParserUpdate) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(reactor) = &state.reactor else {
            debug!("Parser update ignored: no reactor bound");
            return false;
        };
        reactor.lock().parser().update(update);
        state.refresh_requested = true;
        true
    }

    /// Route a parameter widget change to the reactor or its parser
    pub fn apply(&self, change: ParameterChange) -> bool {
        match change {
            ParameterChange::OutputMode(mode) => self.set_output_mode(mode),
            ParameterChange::MaxDecibels(value) => {
                self.update_parser(ParserUpdate::max_decibels(value))
            }
            ParameterChange::Smoothing(value) => self.update_parser(ParserUpdate::smoothing(value)),
        }
    }

    /// Returns whether a UI refresh was requested since the last call
    pub fn take_refresh_request(&self) -> bool {
        std::mem::take(&mut self.state.borrow_mut().refresh_requested)
    }

    /// Show or hide the surface; a hidden surface keeps drawing
    pub fn set_visible(&self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    /// Whether the surface is shown
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Number of draws issued so far
    pub fn draw_count(&self) -> u64 {
        self.state.borrow().draws
    }

    /// Read access to both renderers (e.g. to paint them)
    pub fn with_renderers<R>(&self, f: impl FnOnce(&S, &L) -> R) -> R {
        let state = self.state.borrow();
        f(&state.spectrum, &state.level)
    }

    /// Mutable access to both renderers (e.g. to resize them)
    pub fn with_renderers_mut<R>(&self, f: impl FnOnce(&mut S, &mut L) -> R) -> R {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        f(&mut state.spectrum, &mut state.level)
    }

    fn update_reactor(&self, update: ReactorUpdate) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(reactor) = &state.reactor else {
            debug!("Reactor update ignored: no reactor bound");
            return false;
        };
        reactor.lock().update(update);
        state.refresh_requested = true;
        true
    }
}
