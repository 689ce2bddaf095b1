use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;
use time_humanize::{Accuracy, HumanTime, Tense};

use mathdrill::quiz::QuizMode;
use mathdrill::scoring::Score;
use mathdrill::status::LessonStatus;

use crate::{ui, App};

/// Lesson picker: chapters in course order, one row per lesson with its
/// status glyph and best recorded score.
pub fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(3), // title + mode
            Constraint::Min(1),    // lesson list
            Constraint::Length(1), // notice
            Constraint::Length(2), // legend + history hint
        ])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let mode_span = match app.mode {
        QuizMode::Assessment => Span::styled(
            "Assessment — timed, scores recorded",
            Style::default().fg(Color::Cyan),
        ),
        QuizMode::Practice => Span::styled(
            "Practice — untimed, nothing recorded",
            Style::default().fg(Color::Green),
        ),
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("mathdrill · {}", app.config.course_label),
            bold,
        )),
        Line::from(mode_span),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let width = chunks[1].width as usize;
    let mut rows: Vec<Line> = Vec::new();
    let mut selected_row = 0;
    let mut flat_idx = 0;
    for chapter in app.curriculum.chapters() {
        rows.push(Line::from(Span::styled(
            ui::truncate_to_width(&chapter.title, width),
            dim.patch(bold),
        )));
        for lesson in &chapter.lessons {
            let status = app.status_of(&lesson.id);
            let selected = flat_idx == app.dashboard.selected;
            if selected {
                selected_row = rows.len();
            }
            rows.push(lesson_row(
                &lesson.id,
                &lesson.title,
                status,
                app.progress.best(&lesson.id),
                selected,
                width,
            ));
            flat_idx += 1;
        }
    }

    // Keep the selected row inside the visible window.
    let height = chunks[1].height as usize;
    if selected_row < app.dashboard.scroll_offset {
        app.dashboard.scroll_offset = selected_row;
    } else if height > 0 && selected_row >= app.dashboard.scroll_offset + height {
        app.dashboard.scroll_offset = selected_row + 1 - height;
    }
    let visible: Vec<Line> = rows
        .into_iter()
        .skip(app.dashboard.scroll_offset)
        .take(height)
        .collect();
    f.render_widget(Paragraph::new(visible), chunks[1]);

    if let Some(notice) = &app.dashboard.notice {
        let notice = Paragraph::new(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center);
        f.render_widget(notice, chunks[2]);
    }

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            "(↑/↓) select  (enter) start  (m) switch mode  (q) quit",
            italic,
        )),
        Line::from(Span::styled(history_hint(app), dim)),
    ])
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

fn lesson_row(
    id: &str,
    title: &str,
    status: LessonStatus,
    best: Option<f64>,
    selected: bool,
    width: usize,
) -> Line<'static> {
    let (glyph, glyph_style) = match status {
        LessonStatus::Locked => ("×", Style::default().add_modifier(Modifier::DIM)),
        LessonStatus::Unlocked => ("›", Style::default()),
        LessonStatus::Passed => ("✓", Style::default().fg(Color::Green)),
        LessonStatus::Failed => ("✗", Style::default().fg(Color::Red)),
    };
    let best = match best {
        Some(score) => format!("  best {}", Score::from_quarters((score * 4.0).round() as u32)),
        None => String::new(),
    };

    let marker = if selected { "▸ " } else { "  " };
    // marker + glyph + " {id}  " in cells, then the best-score suffix.
    let text_width = width.saturating_sub(6 + id.len() + best.len());
    let mut line_style = match status {
        LessonStatus::Locked => Style::default().add_modifier(Modifier::DIM),
        _ => Style::default(),
    };
    if selected {
        line_style = line_style.add_modifier(Modifier::BOLD);
    }

    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(glyph.to_string(), glyph_style),
        Span::from(format!(" {id}  ")),
        Span::from(ui::truncate_to_width(title, text_width)),
        Span::styled(best, Style::default().add_modifier(Modifier::DIM)),
    ])
    .style(line_style)
}

/// One-line summary of the attempt log for the selected lesson, blank when
/// the history database is unavailable.
fn history_hint(app: &App) -> String {
    let Some(db) = &app.history else {
        return String::new();
    };
    let Some(lesson) = app.selected_lesson() else {
        return String::new();
    };
    let count = db.attempt_count(&lesson.id).unwrap_or(0);
    if count == 0 {
        return format!("no recorded attempts on {}", lesson.id);
    }
    let noun = if count == 1 { "attempt" } else { "attempts" };
    match db.last_attempt_time().ok().flatten() {
        Some(ts) => {
            let secs = (Local::now() - ts).num_seconds().max(0) as u64;
            let ago =
                HumanTime::from(Duration::from_secs(secs)).to_text_en(Accuracy::Rough, Tense::Past);
            format!("{count} {noun} on {} · last session {ago}", lesson.id)
        }
        None => format!("{count} {noun} on {}", lesson.id),
    }
}
