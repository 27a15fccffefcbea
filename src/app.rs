use std::io;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;
use webbrowser::Browser;

use crate::catalog::{Catalog, CatalogError, ExerciseSpec};
use crate::cue::{play_cue, Cue, CuePlayer};
use crate::program::ProgramProgress;
use crate::progress::{section_breakdown, Section, SectionKind, CARDIO_NAME, TREADMILL_NAME};
use crate::session::{SessionController, SessionError, SessionEvent, SessionState};
use crate::store::{SqliteStore, StoreError};
use crate::runtime::{AppEvent, AppEventSource, Runner, Ticker};
use crate::timer::{Clock, SystemClock, TickQueue};
use crate::ui;

const HOW_TO_SEARCH: &str = "https://m.youtube.com/results";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Checklist,
    Session,
}

/// What today looks like from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodayStatus {
    Done,
    RestDay,
    Ready,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistState {
    pub cursor: usize,
    pub sidebar_open: bool,
}

/// One checklist row: a single round of a single exercise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub section: SectionKind,
    pub name: String,
    pub round: usize,
    pub rounds: usize,
}

pub type SessionDriver = SessionController<TickQueue<Rc<dyn Clock>>, Sender<SessionEvent>>;

struct LiveSession {
    controller: SessionDriver,
    events: Receiver<SessionEvent>,
}

pub struct App {
    catalog: Catalog,
    store: SqliteStore,
    progress: ProgramProgress,
    view: View,
    checklist: ChecklistState,
    session: Option<LiveSession>,
    cues: Box<dyn CuePlayer>,
    clock: Rc<dyn Clock>,
    browser: bool,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    /// Load today's progress for `weekday` (Sunday = 0).
    pub fn new(
        catalog: Catalog,
        mut store: SqliteStore,
        weekday: u32,
        cues: Box<dyn CuePlayer>,
    ) -> Result<Self, AppError> {
        let progress = ProgramProgress::load(&mut store, weekday)?;
        info!(
            day = progress.day,
            week = progress.week,
            done = progress.workout_done,
            "loaded program progress"
        );

        Ok(Self {
            catalog,
            store,
            progress,
            view: View::Dashboard,
            checklist: ChecklistState::default(),
            session: None,
            cues,
            clock: Rc::new(SystemClock::new()),
            browser: Browser::is_available(),
            status: None,
            should_quit: false,
        })
    }

    /// Drive session countdowns from `clock` instead of wall time.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// When disabled, "how to" shows the search link instead of opening it.
    pub fn with_browser(mut self, enabled: bool) -> Self {
        self.browser = enabled;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgramProgress {
        &self.progress
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn checklist(&self) -> ChecklistState {
        self.checklist
    }

    pub fn session(&self) -> Option<&SessionDriver> {
        self.session.as_ref().map(|live| &live.controller)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn browser_enabled(&self) -> bool {
        self.browser
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn today_status(&self) -> TodayStatus {
        if self.progress.workout_done {
            TodayStatus::Done
        } else if self.progress.today(&self.catalog).is_rest() {
            TodayStatus::RestDay
        } else {
            TodayStatus::Ready
        }
    }

    pub fn main_exercises(&self) -> &[ExerciseSpec] {
        self.progress.today(&self.catalog).exercises()
    }

    /// Treadmill, warm-up list, main list and cardio; zero on a rest day.
    pub fn exercises_today(&self) -> usize {
        if self.progress.today(&self.catalog).is_rest() {
            0
        } else {
            self.catalog.warm_up().len() + self.main_exercises().len() + 2
        }
    }

    pub fn total_slots(&self) -> usize {
        self.progress.total_slots(&self.catalog)
    }

    pub fn sections(&self) -> Vec<Section> {
        section_breakdown(
            &self.progress.completion,
            self.catalog.warm_up(),
            self.main_exercises(),
        )
    }

    /// Checklist rows in completion-array order
    pub fn slots(&self) -> Vec<SlotInfo> {
        self.sections()
            .into_iter()
            .flat_map(|section| {
                section.exercises.into_iter().flat_map(move |exercise| {
                    let rounds = exercise.rounds.len();
                    (0..rounds).map(move |round| SlotInfo {
                        section: section.kind,
                        name: exercise.name.clone(),
                        round,
                        rounds,
                    })
                })
            })
            .collect()
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        self.status = None;
        let handled = match self.view {
            View::Dashboard => {
                self.dashboard_key(key);
                Ok(())
            }
            View::Checklist => self.checklist_key(key),
            View::Session => self.session_key(key),
        };

        if let Err(err) = handled {
            warn!(%err, "failed to save progress");
            self.flash(format!("Could not save progress: {err}"));
        }
    }

    /// Event loop: redraw after every key, resize and tick until the user quits.
    pub fn run<B, E, T>(
        &mut self,
        terminal: &mut Terminal<B>,
        runner: &Runner<E, T>,
    ) -> io::Result<()>
    where
        B: Backend,
        E: AppEventSource,
        T: Ticker,
    {
        terminal.draw(|f| ui::draw(self, f))?;
        while !self.should_quit {
            self.handle_event(runner.step());
            terminal.draw(|f| ui::draw(self, f))?;
        }
        Ok(())
    }

    /// React to one runner event. Due countdown ticks are delivered after
    /// every event, so a stream of key presses cannot hold the timer back.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(key) => self.on_key(key),
        }
        self.on_tick();
    }

    /// Deliver due countdown ticks and react to what they caused.
    pub fn on_tick(&mut self) {
        let fired = match self.session.as_mut() {
            Some(live) => live.controller.pump(),
            None => return,
        };
        if fired > 0 {
            if let Err(err) = self.drain_session_events() {
                warn!(%err, "failed to save session progress");
                self.flash(format!("Could not save progress: {err}"));
            }
        }
    }

    fn quit(&mut self) {
        if let Some(mut live) = self.session.take() {
            live.controller.exit();
        }
        self.should_quit = true;
    }

    fn flash(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('v') => {
                self.checklist = ChecklistState::default();
                self.view = View::Checklist;
            }
            KeyCode::Char('s') => match self.today_status() {
                TodayStatus::Ready => self.open_session(),
                TodayStatus::Done => self.flash("Today's workout is already done"),
                TodayStatus::RestDay => self.flash("Rest day: no session today"),
            },
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    fn checklist_key(&mut self, key: KeyEvent) -> Result<(), StoreError> {
        let rest_day = self.progress.today(&self.catalog).is_rest();
        let last = self.total_slots().saturating_sub(1);

        match key.code {
            KeyCode::Char('b') | KeyCode::Esc => self.view = View::Dashboard,
            _ if rest_day => {}
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                self.checklist.cursor = self.checklist.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                self.checklist.cursor = (self.checklist.cursor + 1).min(last);
            }
            KeyCode::Char(' ') => {
                let total = self.total_slots();
                self.progress
                    .toggle_slot(&mut self.store, self.checklist.cursor, total)?;
            }
            KeyCode::Char('f') => {
                if self.progress.finish_workout(&mut self.store)? {
                    self.view = View::Dashboard;
                    self.flash("Workout complete!");
                } else {
                    self.flash("Tick off every exercise before finishing");
                }
            }
            KeyCode::Char('p') => self.checklist.sidebar_open = !self.checklist.sidebar_open,
            KeyCode::Char('y') => {
                if let Some(slot) = self.slots().get(self.checklist.cursor) {
                    let name = slot.name.clone();
                    self.open_how_to(&name);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open_session(&mut self) {
        let plan = self.progress.session_plan(&self.catalog);
        let (tx, rx) = mpsc::channel();
        let scheduler = TickQueue::new(Rc::clone(&self.clock));
        self.session = Some(LiveSession {
            controller: SessionController::new(plan, scheduler, tx),
            events: rx,
        });
        self.view = View::Session;
        debug!("opened session view");
    }

    fn close_session(&mut self, back_to: View) {
        if let Some(mut live) = self.session.take() {
            live.controller.exit();
        }
        self.view = back_to;
    }

    fn session_key(&mut self, key: KeyEvent) -> Result<(), StoreError> {
        let Some(live) = self.session.as_mut() else {
            self.view = View::Dashboard;
            return Ok(());
        };
        let controller = &mut live.controller;

        let outcome = match (controller.state(), key.code) {
            (SessionState::NotStarted, KeyCode::Enter | KeyCode::Char(' ')) => controller.start(),
            (SessionState::Complete, KeyCode::Enter) => {
                let finished = controller.finish();
                if finished.is_ok() {
                    self.close_session(View::Dashboard);
                    self.flash("Workout complete!");
                }
                finished
            }
            (SessionState::Complete, KeyCode::Esc) => {
                self.close_session(View::Dashboard);
                Ok(())
            }
            (_, KeyCode::Char('x') | KeyCode::Esc) => {
                self.close_session(View::Checklist);
                Ok(())
            }
            (_, KeyCode::Char('p')) => controller.toggle_pause(),
            (_, KeyCode::Char('n') | KeyCode::Enter) => controller.advance_round(),
            (_, KeyCode::Char('y')) => {
                if let Some(name) = controller.current_item().map(|item| item.name().to_string()) {
                    self.open_how_to(&name);
                }
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(err) = outcome {
            debug!(%err, "session action rejected");
            if err == SessionError::Resting {
                self.flash("Resting: next round starts when the timer ends");
            }
        }

        self.drain_session_events()
    }

    /// Play cues and persist completion for everything the controller just emitted.
    fn drain_session_events(&mut self) -> Result<(), StoreError> {
        let events: Vec<SessionEvent> = match self.session.as_ref() {
            Some(live) => live.events.try_iter().collect(),
            None => return Ok(()),
        };

        for event in events {
            match event {
                SessionEvent::Started | SessionEvent::Resumed => {
                    play_cue(self.cues.as_mut(), Cue::Start)
                }
                SessionEvent::Rest { .. } => play_cue(self.cues.as_mut(), Cue::Rest),
                SessionEvent::PhaseEntered(phase) => debug!(%phase, "entered phase"),
                SessionEvent::Complete => {
                    let total = self.total_slots();
                    self.progress.complete_session(&mut self.store, total)?;
                }
            }
        }
        Ok(())
    }

    fn open_how_to(&mut self, name: &str) {
        let url = match how_to_url(name) {
            Ok(url) => url,
            Err(err) => {
                warn!(%err, exercise = name, "could not build how-to link");
                return;
            }
        };
        if !self.browser {
            self.flash(format!("How to perform: {url}"));
            return;
        }
        match webbrowser::open(url.as_str()) {
            Ok(()) => info!(exercise = name, "opened how-to search"),
            Err(err) => {
                warn!(%err, exercise = name, "could not open browser");
                self.flash(format!("How to perform: {url}"));
            }
        }
    }
}

/// Video search link for an exercise name
pub fn how_to_url(name: &str) -> Result<Url, url::ParseError> {
    let query = match name {
        TREADMILL_NAME => "treadmill walking",
        CARDIO_NAME => "cardio workout",
        other => other,
    };
    Url::parse_with_params(HOW_TO_SEARCH, &[("search_query", query)])
}
