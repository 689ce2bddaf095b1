use std::collections::{HashMap, HashSet};

/// Composite key for one statement inside a true/false group. Replaces
/// stringly "group-statement" keys; no collision risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementKey {
    pub group: u32,
    pub statement: u32,
}

impl StatementKey {
    pub fn new(group: u32, statement: u32) -> Self {
        Self { group, statement }
    }
}

/// Explicit verdict for a true/false statement. "Unanswered" is the absence
/// of a key in the sheet, never a third variant mixed into comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    True,
    False,
}

impl Verdict {
    pub fn matches(&self, is_true: bool) -> bool {
        matches!(
            (self, is_true),
            (Verdict::True, true) | (Verdict::False, false)
        )
    }
}

impl From<bool> for Verdict {
    fn from(b: bool) -> Self {
        if b {
            Verdict::True
        } else {
            Verdict::False
        }
    }
}

/// A student's in-progress responses, owned exclusively by one session.
/// Keys appear only after the student interacts with an item; an absent key
/// is "unanswered" and scores zero.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    choices: HashMap<u32, usize>,
    verdicts: HashMap<StatementKey, Verdict>,
    fills: HashMap<u32, String>,
    revealed: HashSet<u32>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_choice(&mut self, question: u32, option: usize) {
        self.choices.insert(question, option);
    }

    pub fn choice(&self, question: u32) -> Option<usize> {
        self.choices.get(&question).copied()
    }

    pub fn set_verdict(&mut self, key: StatementKey, verdict: Verdict) {
        self.verdicts.insert(key, verdict);
    }

    pub fn verdict(&self, key: StatementKey) -> Option<Verdict> {
        self.verdicts.get(&key).copied()
    }

    pub fn set_fill(&mut self, question: u32, text: String) {
        self.fills.insert(question, text);
    }

    pub fn fill(&self, question: u32) -> Option<&str> {
        self.fills.get(&question).map(String::as_str)
    }

    /// Practice-mode check flag; irreversible within the session.
    pub fn reveal(&mut self, question: u32) {
        self.revealed.insert(question);
    }

    pub fn is_revealed(&self, question: u32) -> bool {
        self.revealed.contains(&question)
    }

    pub fn answered_count(&self) -> usize {
        self.choices.len() + self.verdicts.len() + self.fills.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_read_as_unanswered() {
        let sheet = AnswerSheet::new();
        assert_eq!(sheet.choice(1), None);
        assert_eq!(sheet.verdict(StatementKey::new(1, 1)), None);
        assert_eq!(sheet.fill(1), None);
        assert!(!sheet.is_revealed(1));
        assert_eq!(sheet.answered_count(), 0);
    }

    #[test]
    fn setters_overwrite_prior_values() {
        let mut sheet = AnswerSheet::new();
        sheet.set_choice(1, 0);
        sheet.set_choice(1, 3);
        assert_eq!(sheet.choice(1), Some(3));

        let key = StatementKey::new(2, 4);
        sheet.set_verdict(key, Verdict::True);
        sheet.set_verdict(key, Verdict::False);
        assert_eq!(sheet.verdict(key), Some(Verdict::False));

        sheet.set_fill(5, "1.0".to_string());
        sheet.set_fill(5, "2.0".to_string());
        assert_eq!(sheet.fill(5), Some("2.0"));
    }

    #[test]
    fn composite_keys_do_not_collide() {
        let mut sheet = AnswerSheet::new();
        // The string scheme "1-12" vs "11-2" could be made to collide; the
        // struct key keeps them distinct.
        sheet.set_verdict(StatementKey::new(1, 12), Verdict::True);
        sheet.set_verdict(StatementKey::new(11, 2), Verdict::False);
        assert_eq!(sheet.verdict(StatementKey::new(1, 12)), Some(Verdict::True));
        assert_eq!(
            sheet.verdict(StatementKey::new(11, 2)),
            Some(Verdict::False)
        );
    }

    #[test]
    fn verdict_matches_truth_value() {
        assert!(Verdict::True.matches(true));
        assert!(Verdict::False.matches(false));
        assert!(!Verdict::True.matches(false));
        assert!(!Verdict::False.matches(true));
        assert_eq!(Verdict::from(true), Verdict::True);
        assert_eq!(Verdict::from(false), Verdict::False);
    }

    #[test]
    fn reveal_is_sticky() {
        let mut sheet = AnswerSheet::new();
        sheet.reveal(3);
        assert!(sheet.is_revealed(3));
        assert!(!sheet.is_revealed(4));
    }
}
