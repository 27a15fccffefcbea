use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::{App, TodayStatus};
use crate::ui::format::percent_label;

fn stat(value: String, label: &'static str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
}

pub fn render_dashboard(app: &App, f: &mut Frame, area: Rect) {
    let progress = app.progress();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(6), // program position
            Constraint::Length(4), // today
            Constraint::Length(4), // quick stats
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "Luminate",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Professional Workout System",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Workout Progress");
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    f.render_widget(stat((progress.day + 1).to_string(), "Day"), columns[0]);
    f.render_widget(stat((progress.week + 1).to_string(), "Week"), columns[1]);
    f.render_widget(stat(progress.stage().number().to_string(), "Stage"), columns[2]);
    f.render_widget(
        stat(
            format!("{}/{}", progress.completed_count(), progress.completion.len()),
            "Completed",
        ),
        columns[3],
    );

    let percent = progress.completion_percentage();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(percent_label(percent));
    f.render_widget(gauge, rows[1]);

    let (headline, detail, color) = match app.today_status() {
        TodayStatus::Done => (
            "Workout Complete!",
            "Great job! Come back tomorrow for your next workout.",
            Color::Green,
        ),
        TodayStatus::RestDay => (
            "Rest Day",
            "Take a well-deserved break today!",
            Color::Blue,
        ),
        TodayStatus::Ready => (
            "Ready for Today's Workout?",
            "(v) View Exercises   (s) Start Session",
            Color::White,
        ),
    };
    let today = Paragraph::new(vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(detail),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Today"));
    f.render_widget(today, chunks[2]);

    let quick = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[3]);
    let card = |title: &'static str| Block::default().borders(Borders::ALL).title(title);

    f.render_widget(
        Paragraph::new(format!("{} Minutes", progress.cardio_minutes()))
            .alignment(Alignment::Center)
            .block(card("Cardio Duration")),
        quick[0],
    );
    f.render_widget(
        Paragraph::new(app.exercises_today().to_string())
            .alignment(Alignment::Center)
            .block(card("Exercises Today")),
        quick[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Stage {}", progress.stage().number()),
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ))
        .alignment(Alignment::Center)
        .block(card("Current Level")),
        quick[2],
    );
}
