//! Render clock - broadcasts one tick per displayable frame.
//!
//! Subscribers register a handler together with an owner key. Every call to
//! [`RenderClock::tick`] invokes the handlers registered at the start of that
//! tick, in registration order. A handler that fails (returns an error or
//! panics) is logged and skipped; the remaining handlers still run.
//!
//! The clock is single-threaded (`Rc` based) and is meant to be driven by the
//! host's UI loop.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Error type a tick handler may return
pub type HandlerError = Box<dyn std::error::Error>;

/// A callback invoked on every tick
pub type TickHandler = Rc<dyn Fn() -> Result<(), HandlerError>>;

/// Opaque key identifying who registered a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

impl OwnerId {
    /// Allocate a process-unique owner key
    pub fn next() -> Self {
        Self(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw key value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

struct Entry {
    owner: OwnerId,
    handler: TickHandler,
}

#[derive(Default)]
struct ClockInner {
    subscribers: RefCell<Vec<Entry>>,
    ticks: Cell<u64>,
}

impl ClockInner {
    fn remove(&self, handler: &TickHandler, owner: OwnerId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let position = subscribers
            .iter()
            .position(|e| e.owner == owner && same_handler(&e.handler, handler));
        match position {
            Some(index) => {
                subscribers.remove(index);
                true
            }
            None => false,
        }
    }
}

fn same_handler(a: &TickHandler, b: &TickHandler) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Summary of one dispatched tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Sequence number of the tick (starting at 1)
    pub tick: u64,
    /// Handlers that completed successfully
    pub delivered: usize,
    /// Handlers that returned an error or panicked
    pub faults: usize,
}

/// Broadcast source of render ticks.
///
/// Cloning yields another handle to the same clock.
#[derive(Clone, Default)]
pub struct RenderClock {
    inner: Rc<ClockInner>,
}

impl std::fmt::Debug for RenderClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderClock")
            .field("subscribers", &self.subscriber_count())
            .field("ticks", &self.tick_count())
            .finish()
    }
}

impl RenderClock {
    /// Create a clock with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` to run on every tick until unsubscribed.
    ///
    /// Registering the same handler twice makes it run twice per tick.
    pub fn subscribe(&self, handler: TickHandler, owner: OwnerId) {
        self.inner
            .subscribers
            .borrow_mut()
            .push(Entry { owner, handler });
        trace!("Clock subscriber added for owner {}", owner.raw());
    }

    /// Remove one registration of `handler` by `owner`.
    ///
    /// Unknown handlers are ignored so teardown may run more than once.
    pub fn unsubscribe(&self, handler: &TickHandler, owner: OwnerId) {
        if !self.inner.remove(handler, owner) {
            trace!(
                "Clock unsubscribe for owner {} matched nothing",
                owner.raw()
            );
        }
    }

    /// Register `handler` and return a guard that unsubscribes it on drop
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_scoped(&self, handler: TickHandler, owner: OwnerId) -> Subscription {
        self.subscribe(handler.clone(), owner);
        Subscription {
            clock: Rc::downgrade(&self.inner),
            handler,
            owner,
        }
    }

    /// Dispatch one tick to all current subscribers
    pub fn tick(&self) -> TickReport {
        let tick = self.inner.ticks.get() + 1;
        self.inner.ticks.set(tick);

        // Snapshot so handlers may (un)subscribe while we dispatch
        let snapshot: Vec<(OwnerId, TickHandler)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|e| (e.owner, e.handler.clone()))
            .collect();

        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        for (owner, handler) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler())) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    report.faults += 1;
                    warn!(
                        "Tick {} handler of owner {} failed: {}",
                        tick,
                        owner.raw(),
                        e
                    );
                }
                Err(_) => {
                    report.faults += 1;
                    warn!("Tick {} handler of owner {} panicked", tick, owner.raw());
                }
            }
        }

        trace!(
            "Tick {} dispatched: {} delivered, {} faults",
            tick,
            report.delivered,
            report.faults
        );
        report
    }

    /// Number of ticks dispatched so far
    pub fn tick_count(&self) -> u64 {
        self.inner.ticks.get()
    }

    /// Number of registrations (duplicates counted)
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether `owner` has at least one registration
    pub fn is_subscribed(&self, owner: OwnerId) -> bool {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .any(|e| e.owner == owner)
    }
}

/// Scoped clock registration, removed when dropped
pub struct Subscription {
    clock: Weak<ClockInner>,
    handler: TickHandler,
    owner: OwnerId,
}

impl Subscription {
    /// Owner key this subscription was registered with
    pub fn owner(&self) -> OwnerId {
        self.owner
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("owner", &self.owner)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.clock.upgrade() {
            inner.remove(&self.handler, self.owner);
        }
    }
}

/// Fixed-interval pacing for hosts without a display refresh signal
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next: Instant,
}

impl FramePacer {
    /// Default frame rate when none (or an invalid one) is configured
    pub const DEFAULT_FPS: f32 = 60.0;

    /// Pacer for `target_fps` frames per second, starting at `start`
    pub fn new(target_fps: f32, start: Instant) -> Self {
        let fps = if target_fps.is_finite() && target_fps > 0.0 {
            target_fps
        } else {
            Self::DEFAULT_FPS
        };
        // Rates too small to express as a deadline fall back to the default
        Duration::try_from_secs_f64(1.0 / f64::from(fps))
            .ok()
            .and_then(|interval| Some((interval, start.checked_add(interval)?)))
            .map(|(interval, next)| Self { interval, next })
            .unwrap_or_else(|| Self::new(Self::DEFAULT_FPS, start))
    }

    /// Time between frames
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next frame is due
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Returns true if a frame is due at `now` and schedules the next one.
    ///
    /// Frames missed by more than one interval are dropped rather than
    /// delivered in a burst.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }
}
