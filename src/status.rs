use crate::curriculum::Curriculum;
use crate::progress::Progress;
use crate::quiz::QuizMode;

/// A lesson passes (and unlocks its successor) at this score or above.
pub const PASS_MARK: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LessonStatus {
    Locked,
    Unlocked,
    Passed,
    Failed,
}

impl LessonStatus {
    pub fn is_startable(&self) -> bool {
        !matches!(self, LessonStatus::Locked)
    }
}

/// Classifies one lesson. Pure over the supplied progress and curriculum;
/// no ambient state.
///
/// Practice mode bypasses gating entirely. In assessment mode a lesson is
/// locked when its flattened-order predecessor's best score is strictly
/// below the pass mark; the first lesson (and any id the curriculum does
/// not know) has no predecessor and is never locked.
pub fn resolve(
    lesson_id: &str,
    mode: QuizMode,
    progress: &Progress,
    curriculum: &Curriculum,
) -> LessonStatus {
    if mode == QuizMode::Practice {
        return LessonStatus::Unlocked;
    }

    if let Some(prev) = curriculum.predecessor_of(lesson_id) {
        if progress.best(&prev.id).unwrap_or(0.0) < PASS_MARK {
            return LessonStatus::Locked;
        }
    }

    match progress.best(lesson_id) {
        None => LessonStatus::Unlocked,
        Some(score) if score >= PASS_MARK => LessonStatus::Passed,
        Some(_) => LessonStatus::Failed,
    }
}
