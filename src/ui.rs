pub mod checklist;
pub mod dashboard;
pub mod format;
pub mod screen;
pub mod session;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::ui::format::truncate;

/// Draw the current view plus a one-line status/legend footer.
pub fn draw(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let screen = screen::current_screen(app.view());
    screen.render(app, f, chunks[0]);

    let width = chunks[1].width as usize;
    let footer = match app.status() {
        Some(status) => Span::styled(
            truncate(status, width),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            truncate(screen.legend(app), width),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
    };
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::app::App;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn dashboard_shows_program_position() {
        let (app, _, _) = test_app();
        let rendered = render(&app, 100, 30);

        assert!(rendered.contains("Luminate"));
        assert!(rendered.contains("Workout Progress"));
        assert!(rendered.contains("Ready for Today's Workout?"));
        assert!(rendered.contains("30 Minutes"));
        assert!(rendered.contains("Stage 1"));
        assert!(rendered.contains("(s) start session"));
    }

    #[test]
    fn checklist_lists_every_section() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::Char('v'));
        let rendered = render(&app, 100, 60);

        assert!(rendered.contains("Treadmill"));
        assert!(rendered.contains("Warm-up"));
        assert!(rendered.contains("Main Workout"));
        assert!(rendered.contains("Cardio"));
        assert!(rendered.contains("Jumping jacks"));
        assert!(rendered.contains("Complete All Exercises First"));
    }

    #[test]
    fn sidebar_shows_weekly_stats() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('p'));
        let rendered = render(&app, 120, 60);

        assert!(rendered.contains("Progress Tracker"));
        assert!(rendered.contains("Weekly Stats"));
        assert!(rendered.contains(&format!("Today's Progress  1/{}", app.total_slots())));
    }

    #[test]
    fn session_screens_follow_state() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::Char('s'));
        assert!(render(&app, 80, 30).contains("Ready to Start?"));

        press(&mut app, KeyCode::Enter);
        let running = render(&app, 80, 30);
        assert!(running.contains("Walking on a treadmill"));
        assert!(running.contains("15:00"));
        assert!(running.contains("Treadmill"));

        press(&mut app, KeyCode::Char('n'));
        let warm_up = render(&app, 80, 30);
        assert!(warm_up.contains("Jumping jacks"));
        assert!(warm_up.contains("Warm-up - Round 1/2"));
        assert!(warm_up.contains("30 Counts"));

        press(&mut app, KeyCode::Char('n'));
        let rest = render(&app, 80, 30);
        assert!(rest.contains("Rest Time"));
        assert!(rest.contains("00:15"));
        assert!(rest.contains("Get ready for round 2"));
    }

    #[test]
    fn status_replaces_legend() {
        let (mut app, _, _) = test_app();
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Char('f'));
        let rendered = render(&app, 100, 40);

        assert!(rendered.contains("Tick off every exercise before finishing"));
    }

    #[test]
    fn tiny_terminals_do_not_panic() {
        let (mut app, _, _) = test_app();
        render(&app, 10, 4);
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Char('p'));
        render(&app, 12, 5);
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        render(&app, 8, 3);
    }
}
