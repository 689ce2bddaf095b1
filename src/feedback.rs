use crate::quiz::QuizMode;
use crate::session::Phase;

/// Decides whether correctness for one item may be shown.
///
/// Everything is visible in review (after submission). Before that,
/// assessment mode never reveals anything; practice mode reveals an item
/// once it is answered, but only when instant feedback is switched on.
/// For short-answer items the caller passes the explicit check flag as
/// `answered` — typing alone reveals nothing.
pub fn should_reveal(
    answered: bool,
    phase: Phase,
    mode: QuizMode,
    instant_feedback: bool,
) -> bool {
    match phase {
        Phase::Submitted => true,
        Phase::NotStarted | Phase::Running => {
            mode == QuizMode::Practice && instant_feedback && answered
        }
    }
}

/// Whether an item is read-only. Revealed correctness implies a write lock:
/// a student cannot change an answer after seeing the right one, short of a
/// full session restart.
pub fn is_item_locked(
    answered: bool,
    phase: Phase,
    mode: QuizMode,
    instant_feedback: bool,
) -> bool {
    should_reveal(answered, phase, mode, instant_feedback)
}
