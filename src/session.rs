use crate::answers::{AnswerSheet, StatementKey, Verdict};
use crate::feedback;
use crate::quiz::{QuizData, QuizError, QuizMode, OPTIONS_PER_QUESTION};
use crate::scoring::{self, Score};
use crate::timer::{ClockEvent, SessionClock};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Submitted,
}

/// Candidate details collected on the intro screen. All three fields must
/// be non-empty before a session may start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub class_name: String,
    pub school: String,
}

impl Identity {
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        school: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            school: school.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.class_name.trim().is_empty()
            && !self.school.trim().is_empty()
    }
}

/// Contract violations. None of these corrupt state; the session is
/// exactly as it was before the rejected call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has not been started")]
    NotRunning,
    #[error("session is already running")]
    AlreadyStarted,
    #[error("session is already submitted")]
    AlreadySubmitted,
    #[error("name, class and school are all required")]
    IncompleteIdentity,
    #[error("unknown question id {0}")]
    UnknownQuestion(u32),
    #[error("unknown statement {statement} in group {group}")]
    UnknownStatement { group: u32, statement: u32 },
    #[error("option index {0} out of range")]
    OptionOutOfRange(usize),
    #[error("item is read-only after its feedback was revealed")]
    ItemLocked,
    #[error("answers can only be revealed in practice mode")]
    RevealOutsidePractice,
}

/// One assessment or practice run. Owns the answer sheet and the clock;
/// discarded entirely when the student returns to the dashboard.
#[derive(Debug)]
pub struct QuizSession {
    quiz: QuizData,
    mode: QuizMode,
    instant_feedback: bool,
    duration_secs: u32,
    identity: Identity,
    sheet: AnswerSheet,
    clock: SessionClock,
    phase: Phase,
    final_score: Option<Score>,
}

impl QuizSession {
    /// Shape-checks the paper up front; a malformed paper means no session
    /// is created at all.
    pub fn new(
        quiz: QuizData,
        mode: QuizMode,
        duration_secs: u32,
        instant_feedback: bool,
    ) -> Result<Self, QuizError> {
        quiz.validate()?;
        Ok(Self {
            quiz,
            mode,
            instant_feedback: instant_feedback && mode == QuizMode::Practice,
            duration_secs,
            identity: Identity::default(),
            sheet: AnswerSheet::new(),
            clock: SessionClock::new(),
            phase: Phase::NotStarted,
            final_score: None,
        })
    }

    /// NotStarted -> Running. Arms the clock in timed mode only.
    pub fn begin(&mut self, identity: Identity) -> Result<(), SessionError> {
        match self.phase {
            Phase::NotStarted => {}
            Phase::Running => return Err(SessionError::AlreadyStarted),
            Phase::Submitted => return Err(SessionError::AlreadySubmitted),
        }
        if !identity.is_complete() {
            return Err(SessionError::IncompleteIdentity);
        }
        self.identity = identity;
        self.phase = Phase::Running;
        if self.mode.is_timed() {
            self.clock.arm(self.duration_secs);
        }
        Ok(())
    }

    pub fn select_choice(&mut self, question: u32, option: usize) -> Result<(), SessionError> {
        self.ensure_running()?;
        if option >= OPTIONS_PER_QUESTION {
            return Err(SessionError::OptionOutOfRange(option));
        }
        if self.quiz.choice(question).is_none() {
            return Err(SessionError::UnknownQuestion(question));
        }
        self.ensure_unlocked(self.sheet.choice(question).is_some())?;
        self.sheet.set_choice(question, option);
        Ok(())
    }

    pub fn judge_statement(
        &mut self,
        group: u32,
        statement: u32,
        verdict: Verdict,
    ) -> Result<(), SessionError> {
        self.ensure_running()?;
        let known = self
            .quiz
            .group(group)
            .is_some_and(|g| g.statements.iter().any(|s| s.id == statement));
        if !known {
            return Err(SessionError::UnknownStatement { group, statement });
        }
        let key = StatementKey::new(group, statement);
        self.ensure_unlocked(self.sheet.verdict(key).is_some())?;
        self.sheet.set_verdict(key, verdict);
        Ok(())
    }

    /// Free-text overwrite; no correctness check happens at write time.
    pub fn fill_answer(
        &mut self,
        question: u32,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.quiz.fill(question).is_none() {
            return Err(SessionError::UnknownQuestion(question));
        }
        // Short answers lock on reveal, not on first keystroke.
        self.ensure_unlocked(self.sheet.is_revealed(question))?;
        self.sheet.set_fill(question, text.into());
        Ok(())
    }

    /// Practice-mode check: shows the reference answer for one short-answer
    /// item without submitting. Irreversible within the session.
    pub fn reveal_answer(&mut self, question: u32) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.mode != QuizMode::Practice {
            return Err(SessionError::RevealOutsidePractice);
        }
        if self.quiz.fill(question).is_none() {
            return Err(SessionError::UnknownQuestion(question));
        }
        self.sheet.reveal(question);
        Ok(())
    }

    /// Explicit submission path. `confirmed == false` means the student
    /// declined the confirmation step: the session keeps running and `None`
    /// comes back. `confirmed == true` finalizes and returns the score.
    pub fn submit(&mut self, confirmed: bool) -> Result<Option<Score>, SessionError> {
        self.ensure_running()?;
        if !confirmed {
            return Ok(None);
        }
        Ok(Some(self.finalize()))
    }

    /// Clock advance from the event loop. An expiry auto-submits with no
    /// confirmation step. After submission the clock is disarmed, so a
    /// late tick cannot reach it at all.
    pub fn on_tick(&mut self) -> Option<Score> {
        match self.clock.tick() {
            Some(ClockEvent::Expired) => Some(self.finalize()),
            None => None,
        }
    }

    /// Live score for instant-feedback displays; identical to the final
    /// score when nothing changes in between.
    pub fn current_score(&self) -> Score {
        scoring::grade(&self.quiz, &self.sheet)
    }

    /// Cached at the moment of entering Submitted; `None` before that.
    pub fn final_score(&self) -> Option<Score> {
        self.final_score
    }

    /// `None` when untimed.
    pub fn remaining_secs(&self) -> Option<u32> {
        if !self.mode.is_timed() {
            return None;
        }
        match self.phase {
            Phase::NotStarted => Some(self.duration_secs),
            _ => Some(self.clock.remaining()),
        }
    }

    /// Seconds spent on a timed session so far (in total, once submitted).
    /// `None` when untimed.
    pub fn elapsed_secs(&self) -> Option<u32> {
        self.remaining_secs()
            .map(|left| self.duration_secs.saturating_sub(left))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn quiz(&self) -> &QuizData {
        &self.quiz
    }

    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn instant_feedback(&self) -> bool {
        self.instant_feedback
    }

    /// Whether correctness for a part-1 question may be shown right now.
    pub fn choice_feedback_visible(&self, question: u32) -> bool {
        self.reveals(self.sheet.choice(question).is_some())
    }

    pub fn statement_feedback_visible(&self, key: StatementKey) -> bool {
        self.reveals(self.sheet.verdict(key).is_some())
    }

    /// Part 3 reveals on the explicit check flag, not on mere typing.
    pub fn fill_feedback_visible(&self, question: u32) -> bool {
        self.reveals(self.sheet.is_revealed(question))
    }

    fn reveals(&self, answered: bool) -> bool {
        feedback::should_reveal(answered, self.phase, self.mode, self.instant_feedback)
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::NotStarted => Err(SessionError::NotRunning),
            Phase::Submitted => Err(SessionError::AlreadySubmitted),
        }
    }

    fn ensure_unlocked(&self, answered: bool) -> Result<(), SessionError> {
        if feedback::is_item_locked(answered, self.phase, self.mode, self.instant_feedback) {
            return Err(SessionError::ItemLocked);
        }
        Ok(())
    }

    fn finalize(&mut self) -> Score {
        // Disarm inside the transition: a tick queued behind this event
        // hits a stopped clock.
        self.clock.stop();
        self.phase = Phase::Submitted;
        let score = scoring::grade(&self.quiz, &self.sheet);
        self.final_score = Some(score);
        score
    }
}
