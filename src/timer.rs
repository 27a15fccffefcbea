use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source, measured from the clock's own origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

/// One-shot, cancellable tick scheduling
pub trait TickScheduler {
    /// Arrange for a tick to fire once `delay` has elapsed.
    fn schedule(&mut self, delay: Duration) -> TickId;
    /// Arrange for a tick at an absolute deadline on the scheduler's clock.
    /// A deadline already in the past is due immediately.
    fn schedule_at(&mut self, deadline: Duration) -> TickId;
    /// Drop a scheduled tick. Cancelling an unknown or already fired tick is a no-op.
    fn cancel(&mut self, id: TickId);
    /// Remove and return the earliest tick whose deadline has passed, with
    /// the deadline it was due at.
    fn poll_due(&mut self) -> Option<(TickId, Duration)>;
    fn pending(&self) -> usize;
}

/// Deadline queue driven by any [`Clock`]
#[derive(Debug)]
pub struct TickQueue<C: Clock> {
    clock: C,
    next_id: u64,
    deadlines: Vec<(TickId, Duration)>,
}

impl<C: Clock> TickQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            deadlines: Vec::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> TickScheduler for TickQueue<C> {
    fn schedule(&mut self, delay: Duration) -> TickId {
        let deadline = self.clock.now() + delay;
        self.schedule_at(deadline)
    }

    fn schedule_at(&mut self, deadline: Duration) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.deadlines.push((id, deadline));
        id
    }

    fn cancel(&mut self, id: TickId) {
        self.deadlines.retain(|(pending, _)| *pending != id);
    }

    fn poll_due(&mut self) -> Option<(TickId, Duration)> {
        let now = self.clock.now();
        let (pos, _) = self
            .deadlines
            .iter()
            .enumerate()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .min_by_key(|(_, (_, deadline))| *deadline)?;
        Some(self.deadlines.remove(pos))
    }

    fn pending(&self) -> usize {
        self.deadlines.len()
    }
}
