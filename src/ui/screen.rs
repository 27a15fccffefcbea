use ratatui::{layout::Rect, Frame};

use crate::app::{App, View};
use crate::ui::{checklist, dashboard, session};

/// A UI Screen boundary: draws one view and names its keys
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
    /// Key legend shown under the screen when no status message is up
    fn legend(&self, _app: &App) -> &'static str {
        ""
    }
}

pub struct DashboardScreen;

impl Screen for DashboardScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        dashboard::render_dashboard(app, f, area);
    }

    fn legend(&self, _app: &App) -> &'static str {
        "(v) exercises  (s) start session  (q) quit"
    }
}

pub struct ChecklistScreen;

impl Screen for ChecklistScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        checklist::render_checklist(app, f, area);
    }

    fn legend(&self, app: &App) -> &'static str {
        if app.progress().today(app.catalog()).is_rest() {
            "(b) back"
        } else {
            "(↑/↓) move  (space) toggle  (f) finish  (p) progress  (y) how to  (b) back"
        }
    }
}

pub struct SessionScreen;

impl Screen for SessionScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        session::render_session(app, f, area);
    }

    fn legend(&self, app: &App) -> &'static str {
        match app.session() {
            Some(s) if s.is_complete() => "(enter) finish & save  (esc) dashboard",
            Some(s) if s.started() => "(n) next  (p) pause  (y) how to  (x) exit session",
            _ => "(enter) start  (y) how to  (x) back to exercises",
        }
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: View) -> Box<dyn Screen> {
    match view {
        View::Dashboard => Box::new(DashboardScreen),
        View::Checklist => Box::new(ChecklistScreen),
        View::Session => Box::new(SessionScreen),
    }
}
