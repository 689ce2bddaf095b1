pub mod dashboard;
pub mod intro;
pub mod quiz;
pub mod results;

use ratatui::{layout::Rect, Frame};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{App, Screen};

pub fn draw(app: &mut App, f: &mut Frame) {
    match app.screen {
        Screen::Dashboard => dashboard::render(app, f),
        Screen::Intro => intro::render(app, f),
        Screen::Quiz => quiz::render(app, f),
        Screen::Results => results::render(app, f),
    }
}

/// mm:ss, the format used on the countdown and the confirm modal.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// A box of at most `width` x `height` cells centered in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Cuts a string down to `max_width` terminal cells, ellipsized. Widths are
/// display cells, not chars, so wide glyphs count double.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
