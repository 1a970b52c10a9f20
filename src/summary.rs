use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewBadge {
    Correct,
    Wrong,
    Unanswered,
}

impl ReviewBadge {
    pub fn symbol(&self) -> &'static str {
        match self {
            ReviewBadge::Correct => "✅",
            ReviewBadge::Wrong => "❌",
            ReviewBadge::Unanswered => "⏳",
        }
    }
}

/// One line of the end-of-session review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    /// 1-based deck position
    pub number: usize,
    pub question: String,
    pub your_answer: Option<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub badge: ReviewBadge,
}

/// Results of a session, with review items in deck order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub category_title: String,
    pub score: usize,
    pub total: usize,
    pub unanswered: usize,
    pub wrong: usize,
    pub items: Vec<ReviewItem>,
}

impl Summary {
    pub fn from_session(session: &Session) -> Self {
        let items = session
            .deck()
            .iter()
            .zip(session.answers())
            .enumerate()
            .map(|(idx, (entry, answer))| {
                let record = &entry.record;
                let badge = match answer {
                    None => ReviewBadge::Unanswered,
                    Some(a) if a.is_correct => ReviewBadge::Correct,
                    Some(_) => ReviewBadge::Wrong,
                };
                ReviewItem {
                    number: idx + 1,
                    question: record.question.clone(),
                    your_answer: answer
                        .and_then(|a| record.choice_text(a.choice))
                        .map(str::to_string),
                    correct_answer: record.answer_text().to_string(),
                    explanation: record.explanation.clone(),
                    badge,
                }
            })
            .collect();

        Self {
            category_title: session
                .category()
                .map(|c| c.title.clone())
                .unwrap_or_default(),
            score: session.score(),
            total: session.len(),
            unanswered: session.unanswered_count(),
            wrong: session.wrong_count(),
            items,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.score == self.total
    }

    pub fn headline(&self) -> String {
        format!("Score: {} / {}", self.score, self.total)
    }
}
