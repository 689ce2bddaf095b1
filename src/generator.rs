use crate::quiz::{
    ChoiceQuestion, FillQuestion, QuizData, Statement, StatementGroup, OPTIONS_PER_QUESTION,
    STATEMENTS_PER_GROUP,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("cannot produce an empty paper for \"{topic}\"")]
    EmptyPaper { topic: String },
}

/// A producer of quiz papers. The engine treats a failure as "no session
/// starts": lesson status is left unchanged and the student may retry.
pub trait QuizSource {
    fn generate(&self, topic: &str, course: &str) -> Result<QuizData, GenerateError>;
}

/// How many questions a generated paper carries per part. The default is
/// the full exam layout: 12 x 0.25 + 16 x 0.25 + 6 x 0.5 = 10 points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperShape {
    pub choice_questions: usize,
    pub statement_groups: usize,
    pub fill_questions: usize,
}

impl Default for PaperShape {
    fn default() -> Self {
        Self {
            choice_questions: 12,
            statement_groups: 4,
            fill_questions: 6,
        }
    }
}

/// Built-in offline paper generator: synthesizes rational-arithmetic
/// questions. Deterministic under a fixed seed, which the tests and the
/// `--seed` flag rely on.
#[derive(Debug, Clone)]
pub struct DrillGenerator {
    shape: PaperShape,
    seed: Option<u64>,
}

impl DrillGenerator {
    pub fn new(shape: PaperShape) -> Self {
        Self { shape, seed: None }
    }

    pub fn with_seed(shape: PaperShape, seed: u64) -> Self {
        Self {
            shape,
            seed: Some(seed),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl QuizSource for DrillGenerator {
    fn generate(&self, topic: &str, course: &str) -> Result<QuizData, GenerateError> {
        let shape = &self.shape;
        if shape.choice_questions == 0 && shape.statement_groups == 0 && shape.fill_questions == 0 {
            return Err(GenerateError::EmptyPaper {
                topic: topic.to_string(),
            });
        }

        let mut rng = self.rng();
        let part1 = (1..=shape.choice_questions as u32)
            .map(|id| choice_question(&mut rng, id))
            .collect();
        let part2 = (1..=shape.statement_groups as u32)
            .map(|id| statement_group(&mut rng, id))
            .collect();
        let part3 = (1..=shape.fill_questions as u32)
            .map(|id| fill_question(&mut rng, id))
            .collect();

        Ok(QuizData {
            topic: format!("{topic} ({course})"),
            part1,
            part2,
            part3,
        })
    }
}

fn choice_question(rng: &mut StdRng, id: u32) -> ChoiceQuestion {
    let a: i64 = rng.gen_range(-12..=12);
    let b: i64 = rng.gen_range(-12..=12);
    let (symbol, correct) = match rng.gen_range(0..3) {
        0 => ("+", a + b),
        1 => ("-", a - b),
        _ => ("*", a * b),
    };

    let mut values = vec![correct];
    while values.len() < OPTIONS_PER_QUESTION {
        let delta = rng.gen_range(1..=6);
        let candidate = if rng.gen_bool(0.5) {
            correct + delta
        } else {
            correct - delta
        };
        if !values.contains(&candidate) {
            values.push(candidate);
        }
    }
    values.shuffle(rng);

    let correct_answer_index = values
        .iter()
        .position(|&v| v == correct)
        .expect("correct value is always among the options");

    ChoiceQuestion {
        id,
        question: format!("Compute {} {symbol} {}", operand(a), operand(b)),
        options: values.iter().map(|v| v.to_string()).collect(),
        correct_answer_index,
        explanation: Some(format!("{} {symbol} {} = {correct}", operand(a), operand(b))),
    }
}

fn statement_group(rng: &mut StdRng, id: u32) -> StatementGroup {
    let x: i64 = rng.gen_range(-9..=9);
    let y: i64 = rng.gen_range(-9..=9);

    let sum_offset = rng.gen_range(-2..=2);
    let claimed_sum = x + y + sum_offset;
    let product_offset = rng.gen_range(-2..=2);
    let claimed_product = x * y + product_offset;
    let distance_offset = if rng.gen_bool(0.5) { 0 } else { 1 };
    let claimed_distance = x.abs() + distance_offset;

    let statements = vec![
        Statement {
            id: 1,
            statement: format!("{x} + {} = {claimed_sum}", operand(y)),
            is_true: sum_offset == 0,
            explanation: Some(format!("{x} + {} = {}", operand(y), x + y)),
        },
        Statement {
            id: 2,
            statement: format!("{x} < {y}"),
            is_true: x < y,
            explanation: None,
        },
        Statement {
            id: 3,
            statement: format!("{x} * {} = {claimed_product}", operand(y)),
            is_true: product_offset == 0,
            explanation: Some(format!("{x} * {} = {}", operand(y), x * y)),
        },
        Statement {
            id: 4,
            statement: format!("The distance from {x} to zero is {claimed_distance}"),
            is_true: distance_offset == 0,
            explanation: None,
        },
    ];
    debug_assert_eq!(statements.len(), STATEMENTS_PER_GROUP);

    StatementGroup {
        id,
        stem: format!("A number line shows the numbers {x} and {y}."),
        statements,
    }
}

fn fill_question(rng: &mut StdRng, id: u32) -> FillQuestion {
    // Work in tenths so decimal answers come out exact.
    let a: i64 = rng.gen_range(-120..=120);
    let b: i64 = rng.gen_range(-120..=120);
    let (symbol, correct) = if rng.gen_bool(0.5) {
        ("+", a + b)
    } else {
        ("-", a - b)
    };

    FillQuestion {
        id,
        question: format!("Compute {} {symbol} {}", tenths(a), tenths_operand(b)),
        correct_answer: tenths(correct),
        explanation: Some(format!(
            "{} {symbol} {} = {}",
            tenths(a),
            tenths_operand(b),
            tenths(correct)
        )),
    }
}

fn operand(n: i64) -> String {
    if n < 0 {
        format!("({n})")
    } else {
        n.to_string()
    }
}

fn tenths(t: i64) -> String {
    let sign = if t < 0 { "-" } else { "" };
    let t = t.abs();
    if t % 10 == 0 {
        format!("{sign}{}", t / 10)
    } else {
        format!("{sign}{}.{}", t / 10, t % 10)
    }
}

fn tenths_operand(t: i64) -> String {
    if t < 0 {
        format!("({})", tenths(t))
    } else {
        tenths(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{AnswerSheet, StatementKey, Verdict};
    use crate::scoring;

    fn seeded() -> DrillGenerator {
        DrillGenerator::with_seed(PaperShape::default(), 7)
    }

    #[test]
    fn generated_paper_passes_validation() {
        let paper = seeded().generate("Rational numbers", "Grade 7").unwrap();
        assert_eq!(paper.validate(), Ok(()));
        assert_eq!(paper.part1.len(), 12);
        assert_eq!(paper.part2.len(), 4);
        assert_eq!(paper.part3.len(), 6);
        assert!(paper.topic.contains("Rational numbers"));
    }

    #[test]
    fn same_seed_reproduces_the_paper() {
        let first = seeded().generate("Powers", "Grade 7").unwrap();
        let second = seeded().generate("Powers", "Grade 7").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_differ() {
        let a = DrillGenerator::with_seed(PaperShape::default(), 1)
            .generate("Powers", "Grade 7")
            .unwrap();
        let b = DrillGenerator::with_seed(PaperShape::default(), 2)
            .generate("Powers", "Grade 7")
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn fill_answers_are_numeric_literals() {
        let paper = seeded().generate("Decimals", "Grade 7").unwrap();
        for q in &paper.part3 {
            q.correct_answer
                .parse::<f64>()
                .unwrap_or_else(|_| panic!("non-numeric answer {:?}", q.correct_answer));
        }
    }

    #[test]
    fn perfect_answers_on_a_full_paper_score_ten() {
        let paper = seeded().generate("Review", "Grade 7").unwrap();
        let mut sheet = AnswerSheet::new();
        for q in &paper.part1 {
            sheet.set_choice(q.id, q.correct_answer_index);
        }
        for g in &paper.part2 {
            for s in &g.statements {
                sheet.set_verdict(StatementKey::new(g.id, s.id), Verdict::from(s.is_true));
            }
        }
        for q in &paper.part3 {
            sheet.set_fill(q.id, q.correct_answer.clone());
        }
        assert_eq!(scoring::grade(&paper, &sheet).value(), 10.0);
    }

    #[test]
    fn empty_shape_is_a_generate_error() {
        let generator = DrillGenerator::new(PaperShape {
            choice_questions: 0,
            statement_groups: 0,
            fill_questions: 0,
        });
        assert_eq!(
            generator.generate("Nothing", "Grade 7"),
            Err(GenerateError::EmptyPaper {
                topic: "Nothing".to_string()
            })
        );
    }

    #[test]
    fn custom_shapes_are_respected() {
        let generator = DrillGenerator::with_seed(
            PaperShape {
                choice_questions: 3,
                statement_groups: 1,
                fill_questions: 2,
            },
            11,
        );
        let paper = generator.generate("Short drill", "Grade 7").unwrap();
        assert_eq!(paper.validate(), Ok(()));
        assert_eq!(paper.part1.len(), 3);
        assert_eq!(paper.part2.len(), 1);
        assert_eq!(paper.part3.len(), 2);
    }

    #[test]
    fn tenths_formatting_is_exact() {
        assert_eq!(tenths(0), "0");
        assert_eq!(tenths(70), "7");
        assert_eq!(tenths(-5), "-0.5");
        assert_eq!(tenths(123), "12.3");
        assert_eq!(tenths(-120), "-12");
    }
}
