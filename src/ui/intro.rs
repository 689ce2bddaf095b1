use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use mathdrill::quiz::QuizMode;

use crate::{ui, App, IntroForm};

const FIELD_LABELS: [&str; IntroForm::FIELDS] = ["Name", "Class", "School"];

/// Identity card shown before a session starts. All three fields are
/// required; the engine re-checks on begin.
pub fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let card = ui::centered_rect(56, 13, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let lesson_title = app
        .current_lesson
        .as_ref()
        .map(|l| l.title.clone())
        .unwrap_or_default();
    let timing = match app.mode {
        QuizMode::Assessment => format!(
            "Timed paper — {} on the clock",
            ui::format_clock(app.config.duration_secs)
        ),
        QuizMode::Practice => "Untimed practice".to_string(),
    };

    let inner_width = card.width.saturating_sub(2) as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            ui::truncate_to_width(&lesson_title, inner_width),
            bold,
        )),
        Line::from(Span::styled(timing, dim)),
        Line::default(),
    ];
    for (idx, label) in FIELD_LABELS.iter().enumerate() {
        lines.push(field_line(label, app.intro.field(idx), idx == app.intro.focus));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(tab) next field  (enter) start  (esc) back",
        italic,
    )));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Who is taking this paper?"));
    f.render_widget(widget, card);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(Span::styled(format!("{label:>6}: {value}{cursor}"), style))
}
