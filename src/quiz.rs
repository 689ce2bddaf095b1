use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Options per multiple-choice question; the producer contract is exact.
pub const OPTIONS_PER_QUESTION: usize = 4;
/// Statements per true/false group; the producer contract is exact.
pub const STATEMENTS_PER_GROUP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum QuizMode {
    /// Timed, gated, score-recording session.
    Assessment,
    /// Untimed, ungated session with optional instant feedback.
    Practice,
}

impl QuizMode {
    pub fn is_timed(&self) -> bool {
        matches!(self, QuizMode::Assessment)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub id: u32,
    pub statement: String,
    pub is_true: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatementGroup {
    pub id: u32,
    pub stem: String,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillQuestion {
    pub id: u32,
    pub question: String,
    /// Numeric literal; comma or period decimal separator, may be negative
    /// or a simple fraction string like "-3/4".
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One generated paper. Immutable for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizData {
    pub topic: String,
    pub part1: Vec<ChoiceQuestion>,
    pub part2: Vec<StatementGroup>,
    pub part3: Vec<FillQuestion>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("question {id}: expected {OPTIONS_PER_QUESTION} options, got {got}")]
    WrongOptionCount { id: u32, got: usize },
    #[error("question {id}: correct answer index {index} out of range")]
    AnswerIndexOutOfRange { id: u32, index: usize },
    #[error("group {id}: expected {STATEMENTS_PER_GROUP} statements, got {got}")]
    WrongStatementCount { id: u32, got: usize },
    #[error("duplicate question id {id} in {part}")]
    DuplicateId { part: &'static str, id: u32 },
}

impl QuizData {
    /// Shape-checks the paper against the producer contract. Runs when a
    /// session is started so violations never surface inside scoring.
    pub fn validate(&self) -> Result<(), QuizError> {
        let mut seen = HashSet::new();
        for q in &self.part1 {
            if !seen.insert(q.id) {
                return Err(QuizError::DuplicateId {
                    part: "part1",
                    id: q.id,
                });
            }
            if q.options.len() != OPTIONS_PER_QUESTION {
                return Err(QuizError::WrongOptionCount {
                    id: q.id,
                    got: q.options.len(),
                });
            }
            if q.correct_answer_index >= OPTIONS_PER_QUESTION {
                return Err(QuizError::AnswerIndexOutOfRange {
                    id: q.id,
                    index: q.correct_answer_index,
                });
            }
        }

        seen.clear();
        for group in &self.part2 {
            if !seen.insert(group.id) {
                return Err(QuizError::DuplicateId {
                    part: "part2",
                    id: group.id,
                });
            }
            if group.statements.len() != STATEMENTS_PER_GROUP {
                return Err(QuizError::WrongStatementCount {
                    id: group.id,
                    got: group.statements.len(),
                });
            }
            let mut statement_ids = HashSet::new();
            for s in &group.statements {
                if !statement_ids.insert(s.id) {
                    return Err(QuizError::DuplicateId {
                        part: "part2 statements",
                        id: s.id,
                    });
                }
            }
        }

        seen.clear();
        for q in &self.part3 {
            if !seen.insert(q.id) {
                return Err(QuizError::DuplicateId {
                    part: "part3",
                    id: q.id,
                });
            }
        }

        Ok(())
    }

    pub fn choice(&self, id: u32) -> Option<&ChoiceQuestion> {
        self.part1.iter().find(|q| q.id == id)
    }

    pub fn group(&self, id: u32) -> Option<&StatementGroup> {
        self.part2.iter().find(|g| g.id == id)
    }

    pub fn fill(&self, id: u32) -> Option<&FillQuestion> {
        self.part3.iter().find(|q| q.id == id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small valid paper used across the engine tests: 2 choice questions,
    /// 1 statement group, 2 fill questions.
    pub fn small_paper() -> QuizData {
        QuizData {
            topic: "Rational numbers".to_string(),
            part1: vec![
                ChoiceQuestion {
                    id: 1,
                    question: "Which of these is rational?".to_string(),
                    options: vec!["pi".into(), "sqrt(2)".into(), "3/4".into(), "e".into()],
                    correct_answer_index: 2,
                    explanation: None,
                },
                ChoiceQuestion {
                    id: 2,
                    question: "1/2 + 1/4 = ?".to_string(),
                    options: vec!["1/6".into(), "3/4".into(), "2/6".into(), "1/8".into()],
                    correct_answer_index: 1,
                    explanation: Some("Common denominator 4.".to_string()),
                },
            ],
            part2: vec![StatementGroup {
                id: 1,
                stem: "Consider the numbers 0.5 and -2.".to_string(),
                statements: vec![
                    Statement {
                        id: 1,
                        statement: "0.5 is rational".to_string(),
                        is_true: true,
                        explanation: None,
                    },
                    Statement {
                        id: 2,
                        statement: "-2 is a natural number".to_string(),
                        is_true: false,
                        explanation: None,
                    },
                    Statement {
                        id: 3,
                        statement: "0.5 > -2".to_string(),
                        is_true: true,
                        explanation: None,
                    },
                    Statement {
                        id: 4,
                        statement: "-2 < -3".to_string(),
                        is_true: false,
                        explanation: None,
                    },
                ],
            }],
            part3: vec![
                FillQuestion {
                    id: 1,
                    question: "Compute 1.5 + 1".to_string(),
                    correct_answer: "2.5".to_string(),
                    explanation: None,
                },
                FillQuestion {
                    id: 2,
                    question: "Write three quarters below zero as a fraction".to_string(),
                    correct_answer: "-3/4".to_string(),
                    explanation: None,
                },
            ],
        }
    }
}
