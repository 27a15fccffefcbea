use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, SessionDriver};
use crate::session::REST_SECS;
use crate::ui::format::format_time;

const CARD_WIDTH: u16 = 60;

fn centered(area: Rect, height: u16) -> Rect {
    let [column] = Layout::horizontal([Constraint::Length(CARD_WIDTH.min(area.width))])
        .flex(Flex::Center)
        .areas(area);
    let [card] = Layout::vertical([Constraint::Length(height.min(column.height))])
        .flex(Flex::Center)
        .areas(column);
    card
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn render_session(app: &App, f: &mut Frame, area: Rect) {
    let Some(session) = app.session() else {
        return;
    };

    if session.is_complete() {
        render_complete(f, area);
    } else if !session.started() {
        render_ready(f, area);
    } else {
        render_running(session, f, area);
    }
}

fn render_ready(f: &mut Frame, area: Rect) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled("Ready to Start?", bold().fg(Color::Cyan))),
        Line::from(""),
        Line::from(
            "Your workout session will begin with a whistle. Follow the exercises step by step with guided rest periods.",
        ),
        Line::from(""),
        Line::from(Span::styled("(enter) Start Workout Session", bold())),
        Line::from("(x) Back to Exercises"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Session"));
    f.render_widget(card, centered(area, 10));
}

fn render_complete(f: &mut Frame, area: Rect) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled("Workout Complete!", bold().fg(Color::Green))),
        Line::from(""),
        Line::from("Congratulations! You've completed today's workout session."),
        Line::from(""),
        Line::from(Span::styled("(enter) Finish & Save Progress", bold())),
        Line::from("(esc) Back to Dashboard"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Session"));
    f.render_widget(card, centered(area, 9));
}

fn render_running(session: &SessionDriver, f: &mut Frame, area: Rect) {
    let card = centered(area, 16);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(card);

    let (completed, total) = session.progress();
    let ratio = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    };
    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{completed}/{total}")),
        chunks[0],
    );

    let item = session.current_item();
    let resting = session.is_resting();

    let title = if resting {
        "Rest Time".to_string()
    } else {
        item.map_or_else(|| "Exercise".to_string(), |i| i.name().to_string())
    };

    let mut subtitle = session.phase().to_string();
    if let Some(item) = item.filter(|i| !resting && !i.is_timed()) {
        subtitle.push_str(&format!(" - Round {}/{}", session.round() + 1, item.rounds()));
    }

    let mut lines = vec![
        Line::from(Span::styled(title, bold())),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::Gray))),
        Line::from(""),
    ];

    if resting || item.is_some_and(|i| i.is_timed()) {
        lines.push(Line::from(Span::styled(
            format_time(session.time_remaining()),
            bold().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
    }

    if resting {
        lines.push(Line::from(Span::styled(
            format!("Take a {REST_SECS}-second break"),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(format!(
            "Get ready for round {}",
            session.round() + 1
        )));
    } else if let Some(counts) = item.as_ref().and_then(|i| i.counts()) {
        lines.push(Line::from(format!("{counts} Counts")));
    }

    if session.is_paused() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "PAUSED",
            bold().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
        )));
    }

    lines.push(Line::from(""));
    let next = match (resting, item.map(|i| i.is_timed())) {
        (true, _) => "(p) pause",
        (false, Some(true)) => "(n) Complete   (p) pause",
        _ => "(n) Next Round   (p) pause",
    };
    lines.push(Line::from(Span::styled(next, Style::default().add_modifier(Modifier::ITALIC))));

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Current Exercise")),
        chunks[1],
    );
}
