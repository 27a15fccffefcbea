use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::catalog::ExerciseSpec;
use crate::progress::{ExerciseProgress, SectionKind};
use crate::session::TREADMILL_SECS;
use crate::ui::format::{percent_label, round_dots, truncate};

const SIDEBAR_WIDTH: u16 = 38;
const NAME_WIDTH: usize = 28;

fn info(kind: SectionKind, spec: Option<&ExerciseSpec>, cardio_minutes: u32) -> String {
    match kind {
        SectionKind::Treadmill => format!("{} Minutes", TREADMILL_SECS / 60),
        SectionKind::Cardio => format!("{cardio_minutes} Minutes"),
        SectionKind::WarmUp | SectionKind::MainWorkout => spec
            .and_then(|s| s.counts.as_deref())
            .map(|counts| format!("{counts} Counts"))
            .unwrap_or_default(),
    }
}

/// Exercise row: name, one dot per round (the one under the cursor
/// highlighted) and the count or duration.
fn exercise_line(
    exercise: &ExerciseProgress,
    first_slot: usize,
    cursor: usize,
    info: String,
) -> Line<'static> {
    let selected = (first_slot..first_slot + exercise.rounds.len()).contains(&cursor);
    let name_style = if exercise.completed {
        Style::default().fg(Color::Green)
    } else if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let name = truncate(&exercise.name, NAME_WIDTH);
    let pad = NAME_WIDTH.saturating_sub(name.width());
    let mut spans = vec![
        Span::raw(if selected { "> " } else { "  " }),
        Span::styled(name, name_style),
        Span::raw(" ".repeat(pad + 2)),
    ];

    for (round, &done) in exercise.rounds.iter().enumerate() {
        let mut style = if done {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if first_slot + round == cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(round_dots(&[done]), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        format!(" {info}"),
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    Line::from(spans)
}

pub fn render_checklist(app: &App, f: &mut Frame, area: Rect) {
    let progress = app.progress();

    if progress.today(app.catalog()).is_rest() {
        let rest = Paragraph::new(vec![
            Line::from(Span::styled(
                "Rest Day",
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("Take a well-deserved break today!"),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Today's Workout"));
        f.render_widget(rest, area);
        return;
    }

    let state = app.checklist();
    let (list_area, sidebar_area) = if state.sidebar_open && area.width > SIDEBAR_WIDTH * 2 {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(list_area);

    let mut lines = Vec::new();
    let mut cursor_line = 0;
    let mut slot = 0;
    for section in app.sections() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            section.kind.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));

        let specs: &[ExerciseSpec] = match section.kind {
            SectionKind::WarmUp => app.catalog().warm_up(),
            SectionKind::MainWorkout => app.main_exercises(),
            SectionKind::Treadmill | SectionKind::Cardio => &[],
        };
        for (idx, exercise) in section.exercises.iter().enumerate() {
            let rounds = exercise.rounds.len();
            if (slot..slot + rounds).contains(&state.cursor) {
                cursor_line = lines.len();
            }
            let detail = info(section.kind, specs.get(idx), progress.cardio_minutes());
            lines.push(exercise_line(exercise, slot, state.cursor, detail));
            slot += rounds;
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Today's Workout");
    let visible = block.inner(chunks[0]).height as usize;
    let scroll = cursor_line.saturating_sub(visible.saturating_sub(1));
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .scroll((scroll as u16, 0)),
        chunks[0],
    );

    let (label, style) = if progress.is_all_completed() {
        (
            "(f) Finish Workout",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "Complete All Exercises First",
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(
        Paragraph::new(Span::styled(label, style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    if let Some(sidebar) = sidebar_area {
        render_sidebar(app, f, sidebar);
    }
}

/// Progress sidebar: today's totals, program position, per-section detail
pub fn render_sidebar(app: &App, f: &mut Frame, area: Rect) {
    let progress = app.progress();
    let block = Block::default().borders(Borders::ALL).title("Progress Tracker");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // completed
            Constraint::Length(1), // gauge
            Constraint::Length(1), // spacer
            Constraint::Length(3), // weekly stats
            Constraint::Min(0),    // sections
        ])
        .split(inner);

    // the array stays empty until the first toggle
    let total = if progress.completion.is_empty() {
        app.total_slots()
    } else {
        progress.completion.len()
    };
    f.render_widget(
        Paragraph::new(format!(
            "Today's Progress  {}/{}",
            progress.completed_count(),
            total
        )),
        chunks[0],
    );
    let percent = progress.completion_percentage();
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio((percent / 100.0).clamp(0.0, 1.0))
            .label(percent_label(percent)),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Weekly Stats",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Day {}  Week {}",
                progress.day + 1,
                progress.week + 1
            )),
            Line::from(format!("Stage {}", progress.stage().number())),
        ]),
        chunks[3],
    );

    let name_width = (chunks[4].width as usize).saturating_sub(10);
    let mut lines = Vec::new();
    for section in app.sections() {
        lines.push(Line::from(Span::styled(
            section.kind.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for exercise in &section.exercises {
            let done = exercise.rounds.iter().filter(|&&d| d).count();
            let mark = if exercise.completed { "✓" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{mark} "),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(truncate(&exercise.name, name_width)),
                Span::styled(
                    format!(" {done}/{}", exercise.rounds.len()),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }
    }
    f.render_widget(Paragraph::new(lines), chunks[4]);
}
