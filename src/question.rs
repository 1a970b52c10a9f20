use serde::{Deserialize, Serialize};

/// Every question has exactly this many choices, numbered 1..=CHOICE_COUNT
pub const CHOICE_COUNT: usize = 4;

/// A single multiple-choice question as read from a question sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub category: String,
    pub question: String,
    pub choices: [String; CHOICE_COUNT],
    /// 1-based index into `choices`
    pub answer: u8,
    pub explanation: String,
}

impl QuestionRecord {
    /// Text of the choice at a 1-based index
    pub fn choice_text(&self, index: u8) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.choices.get(index as usize - 1).map(String::as_str)
    }

    pub fn answer_text(&self) -> &str {
        self.choice_text(self.answer).unwrap_or_default()
    }

    pub fn is_correct(&self, choice: u8) -> bool {
        choice == self.answer
    }

    pub fn has_explanation(&self) -> bool {
        !self.explanation.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_record(id: &str, answer: u8) -> QuestionRecord {
    QuestionRecord {
        id: id.to_string(),
        category: "test".to_string(),
        question: format!("question {id}"),
        choices: [
            format!("{id}-a"),
            format!("{id}-b"),
            format!("{id}-c"),
            format!("{id}-d"),
        ],
        answer,
        explanation: format!("because {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_text_is_one_based() {
        let q = sample_record("q1", 2);
        assert_eq!(q.choice_text(1), Some("q1-a"));
        assert_eq!(q.choice_text(4), Some("q1-d"));
        assert_eq!(q.choice_text(0), None);
        assert_eq!(q.choice_text(5), None);
    }

    #[test]
    fn test_answer_text_and_correctness() {
        let q = sample_record("q1", 3);
        assert_eq!(q.answer_text(), "q1-c");
        assert!(q.is_correct(3));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn test_explanation_presence() {
        let mut q = sample_record("q1", 1);
        assert!(q.has_explanation());
        q.explanation.clear();
        assert!(!q.has_explanation());
    }
}
