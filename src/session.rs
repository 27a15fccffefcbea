use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{ExerciseSpec, SessionPlan};
use crate::progress::{session_progress, CARDIO_NAME, TREADMILL_NAME};
use crate::timer::{TickId, TickScheduler};

pub const TREADMILL_SECS: u32 = 15 * 60;
pub const REST_SECS: u32 = 15;
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Session phases in the only order they can be visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
pub enum PhaseKind {
    Treadmill,
    #[strum(serialize = "Warm-up")]
    WarmUp,
    #[strum(serialize = "Main Workout")]
    MainWorkout,
    Cardio,
    Complete,
}

/// Phases that have an item to work on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePhase {
    Treadmill,
    WarmUp,
    MainWorkout,
    Cardio,
}

impl ActivePhase {
    pub fn kind(self) -> PhaseKind {
        match self {
            ActivePhase::Treadmill => PhaseKind::Treadmill,
            ActivePhase::WarmUp => PhaseKind::WarmUp,
            ActivePhase::MainWorkout => PhaseKind::MainWorkout,
            ActivePhase::Cardio => PhaseKind::Cardio,
        }
    }

    fn next(self) -> Option<ActivePhase> {
        match self {
            ActivePhase::Treadmill => Some(ActivePhase::WarmUp),
            ActivePhase::WarmUp => Some(ActivePhase::MainWorkout),
            ActivePhase::MainWorkout => Some(ActivePhase::Cardio),
            ActivePhase::Cardio => None,
        }
    }
}

/// Position inside a live session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub phase: ActivePhase,
    pub exercise_index: usize,
    pub round: u32,
    pub time_remaining: u32,
    pub resting: bool,
}

impl Cursor {
    fn at(phase: ActivePhase, exercise_index: usize, time_remaining: u32) -> Self {
        Self {
            phase,
            exercise_index,
            round: 0,
            time_remaining,
            resting: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running(Cursor),
    Paused(Cursor),
    Complete,
    Exited { phase: PhaseKind },
}

/// The thing the user is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentItem<'a> {
    Timed {
        name: &'static str,
        duration_secs: u32,
    },
    Rounds(&'a ExerciseSpec),
}

impl CurrentItem<'_> {
    pub fn name(&self) -> &str {
        match self {
            CurrentItem::Timed { name, .. } => name,
            CurrentItem::Rounds(spec) => &spec.name,
        }
    }

    pub fn rounds(&self) -> u32 {
        match self {
            CurrentItem::Timed { .. } => 1,
            CurrentItem::Rounds(spec) => spec.rounds,
        }
    }

    pub fn counts(&self) -> Option<&str> {
        match self {
            CurrentItem::Timed { .. } => None,
            CurrentItem::Rounds(spec) => spec.counts.as_deref(),
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, CurrentItem::Timed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Rest { duration_secs: u32 },
    Resumed,
    PhaseEntered(PhaseKind),
    Complete,
}

/// Receives controller notifications synchronously, in order.
pub trait SessionObserver {
    fn notify(&mut self, event: SessionEvent);
}

impl SessionObserver for Vec<SessionEvent> {
    fn notify(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

impl SessionObserver for Sender<SessionEvent> {
    fn notify(&mut self, event: SessionEvent) {
        if let Err(err) = self.send(event) {
            warn!(event = ?err.0, "session observer disconnected");
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,
    #[error("session has not started")]
    NotRunning,
    #[error("rest period in progress")]
    Resting,
    #[error("session is not complete")]
    NotComplete,
    #[error("session is over")]
    Finished,
}

/// Drives one workout session: treadmill, warm-up list, main list, cardio.
///
/// The controller is the single owner of session state. User actions and
/// timer ticks both go through `&mut self`, and at most one tick is
/// outstanding at any time.
pub struct SessionController<S: TickScheduler, O: SessionObserver> {
    plan: SessionPlan,
    state: SessionState,
    scheduler: S,
    observer: O,
    pending_tick: Option<TickId>,
    /// Deadline of the tick being delivered by `pump`, so the next second
    /// is counted from when it was due rather than when it arrived.
    tick_due: Option<Duration>,
}

impl<S: TickScheduler, O: SessionObserver> SessionController<S, O> {
    pub fn new(plan: SessionPlan, scheduler: S, observer: O) -> Self {
        Self {
            plan,
            state: SessionState::NotStarted,
            scheduler,
            observer,
            pending_tick: None,
            tick_due: None,
        }
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn pending_tick(&self) -> Option<TickId> {
        self.pending_tick
    }

    fn cursor(&self) -> Option<Cursor> {
        match self.state {
            SessionState::Running(cursor) | SessionState::Paused(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn phase(&self) -> PhaseKind {
        match self.state {
            SessionState::NotStarted => PhaseKind::Treadmill,
            SessionState::Running(cursor) | SessionState::Paused(cursor) => cursor.phase.kind(),
            SessionState::Complete => PhaseKind::Complete,
            SessionState::Exited { phase } => phase,
        }
    }

    pub fn exercise_index(&self) -> usize {
        self.cursor().map_or(0, |c| c.exercise_index)
    }

    pub fn round(&self) -> u32 {
        self.cursor().map_or(0, |c| c.round)
    }

    pub fn time_remaining(&self) -> u32 {
        self.cursor().map_or(0, |c| c.time_remaining)
    }

    pub fn is_resting(&self) -> bool {
        self.cursor().is_some_and(|c| c.resting)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Running(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, SessionState::Paused(_))
    }

    pub fn started(&self) -> bool {
        !matches!(self.state, SessionState::NotStarted)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Complete)
    }

    pub fn cardio_secs(&self) -> u32 {
        self.plan.cardio_minutes * 60
    }

    /// Item for the current position. A list index past the end yields `None`.
    pub fn current_item(&self) -> Option<CurrentItem<'_>> {
        match self.state {
            SessionState::NotStarted => self.item_at(ActivePhase::Treadmill, 0),
            SessionState::Running(cursor) | SessionState::Paused(cursor) => {
                self.item_at(cursor.phase, cursor.exercise_index)
            }
            SessionState::Complete | SessionState::Exited { .. } => None,
        }
    }

    fn item_at(&self, phase: ActivePhase, index: usize) -> Option<CurrentItem<'_>> {
        match phase {
            ActivePhase::Treadmill => Some(CurrentItem::Timed {
                name: TREADMILL_NAME,
                duration_secs: TREADMILL_SECS,
            }),
            ActivePhase::WarmUp => self.plan.warm_up.get(index).map(CurrentItem::Rounds),
            ActivePhase::MainWorkout => self.plan.main.get(index).map(CurrentItem::Rounds),
            ActivePhase::Cardio => Some(CurrentItem::Timed {
                name: CARDIO_NAME,
                duration_secs: self.cardio_secs(),
            }),
        }
    }

    fn list_len(&self, phase: ActivePhase) -> Option<usize> {
        match phase {
            ActivePhase::WarmUp => Some(self.plan.warm_up.len()),
            ActivePhase::MainWorkout => Some(self.plan.main.len()),
            ActivePhase::Treadmill | ActivePhase::Cardio => None,
        }
    }

    /// `(completed, total)` exercises for the session progress bar
    pub fn progress(&self) -> (usize, usize) {
        session_progress(
            self.phase(),
            self.exercise_index(),
            self.plan.warm_up.len(),
            self.plan.main.len(),
        )
    }

    fn live_cursor(&self) -> Result<Cursor, SessionError> {
        match self.state {
            SessionState::NotStarted => Err(SessionError::NotRunning),
            SessionState::Running(cursor) | SessionState::Paused(cursor) => Ok(cursor),
            SessionState::Complete | SessionState::Exited { .. } => Err(SessionError::Finished),
        }
    }

    /// Replace the cursor, keeping the running/paused status.
    fn set_cursor(&mut self, cursor: Cursor) {
        match &mut self.state {
            SessionState::Running(current) | SessionState::Paused(current) => *current = cursor,
            _ => {}
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        debug!(?event, "session event");
        self.observer.notify(event);
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending_tick.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Keep exactly one tick in flight while a countdown is running, none otherwise.
    fn reschedule(&mut self) {
        self.cancel_pending();
        if let SessionState::Running(cursor) = self.state {
            if cursor.time_remaining > 0 {
                let id = match self.tick_due {
                    Some(due) => self.scheduler.schedule_at(due + TICK_INTERVAL),
                    None => self.scheduler.schedule(TICK_INTERVAL),
                };
                self.pending_tick = Some(id);
            }
        }
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.started() {
            return Err(SessionError::AlreadyStarted);
        }

        self.state = SessionState::Running(Cursor::at(ActivePhase::Treadmill, 0, TREADMILL_SECS));
        info!(
            warm_up = self.plan.warm_up.len(),
            main = self.plan.main.len(),
            cardio_minutes = self.plan.cardio_minutes,
            "workout session started"
        );
        self.emit(SessionEvent::Started);
        self.reschedule();
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), SessionError> {
        self.state = match self.state {
            SessionState::Running(cursor) => SessionState::Paused(cursor),
            SessionState::Paused(cursor) => SessionState::Running(cursor),
            SessionState::NotStarted => return Err(SessionError::NotRunning),
            SessionState::Complete | SessionState::Exited { .. } => {
                return Err(SessionError::Finished)
            }
        };
        debug!(paused = self.is_paused(), "session pause toggled");
        self.reschedule();
        Ok(())
    }

    /// Finish the current round. Timed items, absent items and final rounds
    /// move on to the next exercise; any other round starts a rest period.
    pub fn advance_round(&mut self) -> Result<(), SessionError> {
        let cursor = self.live_cursor()?;
        if cursor.resting {
            return Err(SessionError::Resting);
        }

        let last_round = match self.item_at(cursor.phase, cursor.exercise_index) {
            Some(CurrentItem::Rounds(spec)) => cursor.round + 1 >= spec.rounds,
            Some(CurrentItem::Timed { .. }) | None => true,
        };
        if last_round {
            return self.advance_exercise();
        }

        self.set_cursor(Cursor {
            round: cursor.round + 1,
            resting: true,
            time_remaining: REST_SECS,
            ..cursor
        });
        self.emit(SessionEvent::Rest {
            duration_secs: REST_SECS,
        });
        self.reschedule();
        Ok(())
    }

    /// Finish the current exercise and move to the next one, skipping phases
    /// whose list is empty.
    pub fn advance_exercise(&mut self) -> Result<(), SessionError> {
        let cursor = self.live_cursor()?;

        match self.next_position(cursor.phase, cursor.exercise_index) {
            Some((phase, exercise_index)) => {
                let time_remaining = match phase {
                    ActivePhase::Treadmill => TREADMILL_SECS,
                    ActivePhase::Cardio => self.cardio_secs(),
                    ActivePhase::WarmUp | ActivePhase::MainWorkout => 0,
                };
                self.set_cursor(Cursor::at(phase, exercise_index, time_remaining));
                debug!(phase = %phase.kind(), exercise_index, "advanced exercise");
                if phase != cursor.phase {
                    self.emit(SessionEvent::PhaseEntered(phase.kind()));
                }
                self.reschedule();
            }
            None => self.complete(),
        }

        Ok(())
    }

    fn next_position(&self, phase: ActivePhase, index: usize) -> Option<(ActivePhase, usize)> {
        if let Some(len) = self.list_len(phase) {
            if index + 1 < len {
                return Some((phase, index + 1));
            }
        }

        let mut next = phase.next();
        while let Some(candidate) = next {
            match self.list_len(candidate) {
                Some(0) => next = candidate.next(),
                _ => return Some((candidate, 0)),
            }
        }
        None
    }

    fn complete(&mut self) {
        self.cancel_pending();
        self.state = SessionState::Complete;
        info!("workout session complete");
        self.emit(SessionEvent::Complete);
    }

    /// Acknowledge a completed session so the host can persist and leave.
    pub fn finish(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(SessionError::NotComplete)
        }
    }

    /// Leave the session. Safe from any state; no tick fires afterwards.
    pub fn exit(&mut self) {
        self.cancel_pending();
        if !matches!(
            self.state,
            SessionState::Complete | SessionState::Exited { .. }
        ) {
            let phase = self.phase();
            self.state = SessionState::Exited { phase };
            info!(%phase, "workout session exited");
        }
    }

    /// Deliver every tick that has come due. Returns how many fired.
    pub fn pump(&mut self) -> usize {
        let mut fired = 0;
        while let Some((id, due)) = self.scheduler.poll_due() {
            self.tick_due = Some(due);
            self.on_tick(id);
            self.tick_due = None;
            fired += 1;
        }
        fired
    }

    /// One elapsed second of countdown.
    pub fn on_tick(&mut self, id: TickId) {
        if self.pending_tick != Some(id) {
            debug!(?id, "ignoring stale tick");
            return;
        }
        self.pending_tick = None;

        let SessionState::Running(cursor) = self.state else {
            return;
        };
        if cursor.time_remaining == 0 {
            return;
        }

        if cursor.time_remaining > 1 {
            self.set_cursor(Cursor {
                time_remaining: cursor.time_remaining - 1,
                ..cursor
            });
        } else if cursor.resting {
            self.set_cursor(Cursor {
                resting: false,
                time_remaining: 0,
                ..cursor
            });
            self.emit(SessionEvent::Resumed);
        } else {
            self.set_cursor(Cursor {
                time_remaining: 0,
                ..cursor
            });
            if let Err(err) = self.advance_round() {
                warn!(%err, "countdown expiry could not advance");
            }
        }

        self.reschedule();
    }
}
