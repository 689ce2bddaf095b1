use crate::answers::{AnswerSheet, StatementKey};
use crate::quiz::QuizData;
use std::fmt;

/// Two short-answer strings count as equal when their parsed values differ
/// by less than this.
pub const NUMERIC_TOLERANCE: f64 = 1e-4;

const MAX_QUARTERS: u32 = 40;

/// Composite score in quarter points. Exact integer arithmetic internally;
/// the f64 view exists only for display and storage, so every score is a
/// member of {0, 0.25, 0.5, ..., 10}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const MAX: Score = Score(MAX_QUARTERS);

    /// Clamps at the 10.0 ceiling. Valid papers cannot reach the clamp
    /// (3 + 4 + 3 points); it guards against malformed input only.
    pub fn from_quarters(quarters: u32) -> Self {
        Score(quarters.min(MAX_QUARTERS))
    }

    pub fn quarters(&self) -> u32 {
        self.0
    }

    pub fn value(&self) -> f64 {
        f64::from(self.0) * 0.25
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole and half points print with one decimal, quarters need two.
        if self.0 % 2 == 0 {
            write!(f, "{:.1}", self.value())
        } else {
            write!(f, "{:.2}", self.value())
        }
    }
}

/// Grades a sheet against a paper. Pure and idempotent: callable live for
/// instant-feedback displays and again at submission with the same result.
pub fn grade(quiz: &QuizData, sheet: &AnswerSheet) -> Score {
    let mut quarters = 0u32;

    for q in &quiz.part1 {
        if sheet.choice(q.id) == Some(q.correct_answer_index) {
            quarters += 1;
        }
    }

    for group in &quiz.part2 {
        for s in &group.statements {
            let key = StatementKey::new(group.id, s.id);
            if sheet.verdict(key).is_some_and(|v| v.matches(s.is_true)) {
                quarters += 1;
            }
        }
    }

    for q in &quiz.part3 {
        if sheet
            .fill(q.id)
            .is_some_and(|text| answers_match(text, &q.correct_answer))
        {
            quarters += 2;
        }
    }

    Score::from_quarters(quarters)
}

/// Numeric-tolerant comparison for short answers. Both sides are trimmed
/// and comma decimal separators become periods; if both parse as floats
/// they match within NUMERIC_TOLERANCE, otherwise the normalized strings
/// must be identical (fractions like "-3/4" take this path).
pub fn answers_match(user: &str, reference: &str) -> bool {
    let user = normalize(user);
    let reference = normalize(reference);

    match (user.parse::<f64>(), reference.parse::<f64>()) {
        (Ok(u), Ok(r)) => (u - r).abs() < NUMERIC_TOLERANCE,
        _ => user == reference,
    }
}

fn normalize(s: &str) -> String {
    s.trim().replace(',', ".")
}
