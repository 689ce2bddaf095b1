use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use mathdrill::quiz::QuizMode;
use mathdrill::scoring::Score;
use mathdrill::status::PASS_MARK;

use crate::{item_list, ui, App};

/// Final score card, shown on submission. Leaving it hands the score to
/// the stores (assessment mode only) and discards the session.
pub fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let Some(session) = &app.session else {
        f.render_widget(
            Paragraph::new("no finished session").alignment(Alignment::Center),
            area,
        );
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let card = ui::centered_rect(56, 14, area);
    let inner_width = card.width.saturating_sub(2) as usize;
    let score = session.final_score().unwrap_or(Score::ZERO);
    let passed = score.value() >= PASS_MARK;

    let identity = session.identity();
    let lesson_title = app
        .current_lesson
        .as_ref()
        .map(|l| l.title.clone())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(Span::styled(
            ui::truncate_to_width(&lesson_title, inner_width),
            bold,
        )),
        Line::from(Span::styled(
            format!(
                "{} · {} · {}",
                identity.name, identity.class_name, identity.school
            ),
            dim,
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Score  {score} / 10"),
            bold.fg(if passed { Color::Green } else { Color::Red }),
        )),
    ];

    match session.mode() {
        QuizMode::Assessment => {
            lines.push(if passed {
                Line::from(Span::styled(
                    "Passed — the next lesson is unlocked",
                    Style::default().fg(Color::Green),
                ))
            } else {
                Line::from(Span::styled(
                    format!("Below the {PASS_MARK:.1} pass mark — try again"),
                    Style::default().fg(Color::Red),
                ))
            });
        }
        QuizMode::Practice => {
            lines.push(Line::from(Span::styled(
                "Practice run — nothing is recorded",
                dim.add_modifier(Modifier::ITALIC),
            )));
        }
    }

    lines.push(Line::default());
    if let Some(elapsed) = session.elapsed_secs() {
        lines.push(Line::from(Span::styled(
            format!("Time used {}", ui::format_clock(elapsed)),
            dim,
        )));
    }
    let total = item_list(session.quiz()).len();
    lines.push(Line::from(Span::styled(
        format!("{} of {total} items answered", session.sheet().answered_count()),
        dim,
    )));
    if let Some(previous) = previous_best(app) {
        lines.push(Line::from(Span::styled(previous, dim)));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(r) review answers   (enter) finish",
        italic,
    )));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(widget, card);
}

/// Best recorded score before this attempt, assessment mode only.
fn previous_best(app: &App) -> Option<String> {
    let session = app.session.as_ref()?;
    if session.mode() != QuizMode::Assessment {
        return None;
    }
    let lesson = app.current_lesson.as_ref()?;
    let best = app.history.as_ref()?.best_score(&lesson.id).ok().flatten()?;
    Some(format!(
        "Best before this attempt: {}",
        Score::from_quarters((best * 4.0).round() as u32)
    ))
}
