use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use mathdrill::answers::{StatementKey, Verdict};
use mathdrill::scoring;
use mathdrill::session::{Phase, QuizSession};

use crate::{item_list, ui, App, Item};

const DETAIL_HEIGHT: u16 = 10;

/// The paper itself: a scrollable item list with the current item spelled
/// out below it, plus the hand-in confirmation modal.
pub fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let Some(session) = &app.session else {
        f.render_widget(
            Paragraph::new("no active session").alignment(Alignment::Center),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(2),             // topic + clock
            Constraint::Min(1),                // item list
            Constraint::Length(DETAIL_HEIGHT), // current item
            Constraint::Length(1),             // legend
        ])
        .split(area);

    render_header(session, chunks[0], f);

    let items = item_list(session.quiz());
    let height = chunks[1].height as usize;
    let view = &mut app.quiz_view;
    if view.cursor < view.scroll_offset {
        view.scroll_offset = view.cursor;
    } else if height > 0 && view.cursor >= view.scroll_offset + height {
        view.scroll_offset = view.cursor + 1 - height;
    }

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .skip(view.scroll_offset)
        .take(height)
        .map(|(idx, item)| {
            summary_line(
                session,
                *item,
                idx,
                idx == view.cursor,
                chunks[1].width as usize,
            )
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[1]);

    if let Some(item) = items.get(app.quiz_view.cursor) {
        render_detail(session, *item, chunks[2], f);
    }

    let legend = match session.phase() {
        Phase::Submitted => "(↑/↓) move  (esc) back to results".to_string(),
        _ => {
            let check = if session.instant_feedback() {
                "  (c) check"
            } else {
                ""
            };
            format!("(↑/↓) move  (1-4) pick  (t/f) judge  type numbers{check}  (esc) hand in")
        }
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        chunks[3],
    );

    if app.quiz_view.confirm_open {
        render_confirm(session, area, f);
    }
}

fn render_header(session: &QuizSession, area: Rect, f: &mut Frame) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold = bold.add_modifier(Modifier::DIM);

    let answered = session.sheet().answered_count();
    let total = item_list(session.quiz()).len();
    let title = Line::from(vec![
        Span::styled(session.quiz().topic.clone(), bold),
        Span::styled(format!("   {answered}/{total} answered"), dim_bold),
    ]);

    let status = match (session.phase(), session.remaining_secs()) {
        (Phase::Submitted, _) => Line::from(Span::styled(
            format!(
                "Review — final score {}",
                session.final_score().unwrap_or(scoring::Score::ZERO)
            ),
            bold.fg(Color::Cyan),
        )),
        (_, Some(left)) => {
            let style = if left <= 60 {
                bold.fg(Color::Red)
            } else {
                dim_bold
            };
            Line::from(Span::styled(
                format!("Time left {}", ui::format_clock(left)),
                style,
            ))
        }
        (_, None) => {
            if session.instant_feedback() {
                Line::from(Span::styled(
                    format!("Score so far {}", session.current_score()),
                    dim_bold,
                ))
            } else {
                Line::from(Span::styled("Practice — no clock", dim_bold))
            }
        }
    };

    f.render_widget(
        Paragraph::new(vec![title, status]).alignment(Alignment::Center),
        area,
    );
}

fn summary_line(
    session: &QuizSession,
    item: Item,
    idx: usize,
    selected: bool,
    width: usize,
) -> Line<'static> {
    let quiz = session.quiz();
    let sheet = session.sheet();

    let (text, state, verdict) = match item {
        Item::Choice(id) => {
            let Some(q) = quiz.choice(id) else {
                return Line::default();
            };
            let state = match sheet.choice(id) {
                Some(option) => format!("[{}]", option + 1),
                None => "[ ]".to_string(),
            };
            let verdict = session
                .choice_feedback_visible(id)
                .then(|| sheet.choice(id).map(|o| o == q.correct_answer_index))
                .flatten();
            (q.question.clone(), state, verdict)
        }
        Item::Statement { group, statement } => {
            let Some(s) = quiz
                .group(group)
                .and_then(|g| g.statements.iter().find(|s| s.id == statement))
            else {
                return Line::default();
            };
            let key = StatementKey::new(group, statement);
            let state = match sheet.verdict(key) {
                Some(Verdict::True) => "[t]".to_string(),
                Some(Verdict::False) => "[f]".to_string(),
                None => "[ ]".to_string(),
            };
            let verdict = session
                .statement_feedback_visible(key)
                .then(|| sheet.verdict(key).map(|v| v.matches(s.is_true)))
                .flatten();
            (s.statement.clone(), state, verdict)
        }
        Item::Fill(id) => {
            let Some(q) = quiz.fill(id) else {
                return Line::default();
            };
            let state = match sheet.fill(id) {
                Some(text) if !text.is_empty() => {
                    format!("[{}]", ui::truncate_to_width(text, 8))
                }
                _ => "[ ]".to_string(),
            };
            let verdict = session
                .fill_feedback_visible(id)
                .then(|| {
                    sheet
                        .fill(id)
                        .map(|text| scoring::answers_match(text, &q.correct_answer))
                })
                .flatten();
            (q.question.clone(), state, verdict)
        }
    };

    let marker = if selected { "▸ " } else { "  " };
    let state_style = match verdict {
        Some(true) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Some(false) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        None => Style::default().add_modifier(Modifier::DIM),
    };
    // marker + "nn. " + space before the state column.
    let text_width = width.saturating_sub(7 + state.len());
    let line_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Yellow)),
        Span::from(format!("{:>2}. ", idx + 1)),
        Span::from(ui::truncate_to_width(&text, text_width)),
        Span::from(" "),
        Span::styled(state, state_style),
    ])
    .style(line_style)
}

fn render_detail(session: &QuizSession, item: Item, area: Rect, f: &mut Frame) {
    let quiz = session.quiz();
    let sheet = session.sheet();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic = Style::default()
        .add_modifier(Modifier::DIM)
        .add_modifier(Modifier::ITALIC);
    let green = Style::default().fg(Color::Green);
    let red = Style::default().fg(Color::Red);

    let (title, lines) = match item {
        Item::Choice(id) => {
            let Some(q) = quiz.choice(id) else { return };
            let revealed = session.choice_feedback_visible(id);
            let chosen = sheet.choice(id);

            let mut lines = vec![Line::from(Span::styled(q.question.clone(), bold))];
            for (idx, option) in q.options.iter().enumerate() {
                let marker = if chosen == Some(idx) { "▸" } else { " " };
                let style = if revealed && idx == q.correct_answer_index {
                    green.add_modifier(Modifier::BOLD)
                } else if revealed && chosen == Some(idx) {
                    red
                } else if chosen == Some(idx) {
                    bold
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!(" {marker} {}) {option}", idx + 1),
                    style,
                )));
            }
            if revealed {
                if let Some(explanation) = &q.explanation {
                    lines.push(Line::from(Span::styled(explanation.clone(), dim_italic)));
                }
            }
            ("Part 1 · multiple choice · 0.25 points", lines)
        }
        Item::Statement { group, statement } => {
            let Some(g) = quiz.group(group) else { return };
            let Some(s) = g.statements.iter().find(|s| s.id == statement) else {
                return;
            };
            let key = StatementKey::new(group, statement);
            let revealed = session.statement_feedback_visible(key);
            let verdict = sheet.verdict(key);

            let verdict_text = match verdict {
                Some(Verdict::True) => "true",
                Some(Verdict::False) => "false",
                None => "—",
            };
            let mut lines = vec![
                Line::from(Span::styled(g.stem.clone(), bold)),
                Line::from(Span::from(s.statement.clone())),
                Line::from(Span::from(format!("Your verdict: {verdict_text}"))),
            ];
            if revealed {
                let correct = verdict.is_some_and(|v| v.matches(s.is_true));
                let truth = if s.is_true { "true" } else { "false" };
                lines.push(Line::from(Span::styled(
                    format!("This statement is {truth}"),
                    if correct { green } else { red },
                )));
                if let Some(explanation) = &s.explanation {
                    lines.push(Line::from(Span::styled(explanation.clone(), dim_italic)));
                }
            }
            ("Part 2 · true or false · 0.25 points each", lines)
        }
        Item::Fill(id) => {
            let Some(q) = quiz.fill(id) else { return };
            let revealed = session.fill_feedback_visible(id);
            let answer = sheet.fill(id).unwrap_or_default();
            let cursor = if session.phase() == Phase::Running && !revealed {
                "▏"
            } else {
                ""
            };

            let mut lines = vec![
                Line::from(Span::styled(q.question.clone(), bold)),
                Line::from(Span::from(format!("Your answer: {answer}{cursor}"))),
            ];
            if revealed {
                let correct = scoring::answers_match(answer, &q.correct_answer);
                lines.push(Line::from(Span::styled(
                    format!("Reference: {}", q.correct_answer),
                    if correct { green } else { red },
                )));
                if let Some(explanation) = &q.explanation {
                    lines.push(Line::from(Span::styled(explanation.clone(), dim_italic)));
                }
            } else if session.instant_feedback() && session.phase() == Phase::Running {
                lines.push(Line::from(Span::styled(
                    "(c) checks this answer and locks it",
                    dim_italic,
                )));
            }
            ("Part 3 · short answer · 0.5 points", lines)
        }
    };

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

fn render_confirm(session: &QuizSession, area: Rect, f: &mut Frame) {
    let rect = ui::centered_rect(46, 7, area);
    f.render_widget(Clear, rect);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let clock_line = match session.remaining_secs() {
        Some(left) => format!("{} still on the clock", ui::format_clock(left)),
        None => "Your answers will be graded now".to_string(),
    };
    let lines = vec![
        Line::default(),
        Line::from(Span::styled("Hand in your paper?", bold)),
        Line::from(Span::styled(clock_line, dim)),
        Line::default(),
        Line::from(Span::styled("(y) hand in      (n) keep working", italic)),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    f.render_widget(widget, rect);
}
