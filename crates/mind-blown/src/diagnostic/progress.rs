use serde::{Deserialize, Serialize};

use super::answers::{AnswerSheet, Choice, QuestionKey, Reaction};
use super::flow::Next;

/// Upper bound on the questions still to be asked from `from`, counting `from` itself.
///
/// Unanswered branching questions are assumed to take their longer branch: an open `R`
/// counts as "whoa", an open `Q3`/`Q4`/`Q5` counts as "yes". The estimate only shrinks as
/// answers resolve branches and is zero at [`Next::Final`].
pub fn worst_case_remaining(from: Next, answers: &AnswerSheet) -> u32 {
    use QuestionKey::*;

    let key = match from {
        Next::Final => return 0,
        Next::Question(key) => key,
    };

    let continue_on_yes = |choice: Option<Choice>, next: QuestionKey| match choice {
        Some(Choice::No) => 1,
        Some(Choice::Yes) | None => 1 + worst_case_remaining(Next::Question(next), answers),
    };

    match key {
        E => 1 + worst_case_remaining(Next::Question(R), answers),
        R => match answers.reaction {
            Some(Reaction::Shrug) => 1,
            Some(Reaction::Double) => 1 + worst_case_remaining(Next::Question(Q1), answers),
            Some(Reaction::Whoa) | None => 1 + worst_case_remaining(Next::Question(Q3), answers),
        },
        Q1 => 1,
        Q3 => continue_on_yes(answers.awe_signs, Q4),
        Q4 => continue_on_yes(answers.verification_urge, Q5),
        Q5 => continue_on_yes(answers.function_hit, Q6),
        Q6 => 1,
    }
}

pub const COMPLETE_LABEL: &str = "Complete";

/// Step counter and percentage rendered above the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub completed: u32,
    pub total: u32,
    pub percent: u8,
    pub label: String,
}

impl ProgressSnapshot {
    /// Snapshot while a question is on screen. `completed` is the number of questions
    /// already answered on the visit trail.
    pub fn in_question(completed: u32, current: QuestionKey, answers: &AnswerSheet) -> Self {
        let total = completed + worst_case_remaining(Next::Question(current), answers);
        let percent = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        } else {
            0
        };

        Self {
            completed,
            total,
            percent,
            label: format!("Step {} of {}", completed + 1, total),
        }
    }

    pub fn finished(completed: u32) -> Self {
        Self {
            completed,
            total: completed,
            percent: 100,
            label: COMPLETE_LABEL.to_string(),
        }
    }
}
