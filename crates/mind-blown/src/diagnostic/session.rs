use serde::{Deserialize, Serialize};

use super::answers::{AnswerSheet, AnswerValue, Choice, ParseAnswerError, QuestionKey};
use super::catalog::{self, QuestionPrompt};
use super::classifier::{classify, Classification};
use super::flow::{next_question, Next};
use super::progress::ProgressSnapshot;
use super::report::{share_text, ResultView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Question,
    Final,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Question => "In progress",
            Self::Final => "Complete",
        }
    }
}

/// One-question-at-a-time walk through the diagnostic.
///
/// The trail records the questions visited, seeded with `E`; its top is the question on
/// screen while in the question stage, and the last answered question once final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticSession {
    stage: Stage,
    current: QuestionKey,
    trail: Vec<QuestionKey>,
    answers: AnswerSheet,
}

impl Default for DiagnosticSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSession {
    pub fn new() -> Self {
        Self {
            stage: Stage::Question,
            current: QuestionKey::E,
            trail: vec![QuestionKey::E],
            answers: AnswerSheet::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current(&self) -> QuestionKey {
        self.current
    }

    pub fn trail(&self) -> &[QuestionKey] {
        &self.trail
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn classification(&self) -> Classification {
        classify(&self.answers)
    }

    pub fn can_go_back(&self) -> bool {
        match self.stage {
            Stage::Final => true,
            Stage::Question => self.trail.len() > 1,
        }
    }

    pub fn bonus_offered(&self) -> bool {
        self.stage == Stage::Final && self.classification().bonus_eligible()
    }

    /// Answer the question on screen, prune what it invalidates, and advance.
    pub fn answer(&mut self, key: QuestionKey, value: AnswerValue) -> Result<Next, SessionError> {
        if self.stage == Stage::Final {
            return Err(SessionError::AlreadyFinal);
        }
        if key != self.current {
            return Err(SessionError::NotCurrentQuestion {
                expected: self.current,
                received: key,
            });
        }

        self.answers.record(key, value)?;
        Ok(self.advance())
    }

    fn advance(&mut self) -> Next {
        let last = self.trail.last().copied().unwrap_or(QuestionKey::E);
        if !self.answers.is_answered(last) {
            return Next::Question(last);
        }

        let next = next_question(last, &self.answers);
        match next {
            Next::Final => self.stage = Stage::Final,
            Next::Question(key) if key != last => {
                self.current = key;
                if self.trail.last() != Some(&key) {
                    self.trail.push(key);
                }
            }
            Next::Question(_) => {}
        }
        next
    }

    /// Record the bonus answer. Only offered on the result view above level zero.
    pub fn answer_bonus(&mut self, value: Choice) -> Result<Classification, SessionError> {
        if !self.bonus_offered() {
            return Err(SessionError::BonusUnavailable);
        }
        self.answers.still_thinking = Some(value);
        Ok(self.classification())
    }

    /// Step back one screen. From the result view this re-opens the last question; on
    /// the first question it does nothing.
    pub fn go_back(&mut self) {
        match self.stage {
            Stage::Final => {
                self.stage = Stage::Question;
                self.current = self.trail.last().copied().unwrap_or(QuestionKey::E);
            }
            Stage::Question if self.trail.len() > 1 => {
                self.trail.pop();
                self.current = self.trail.last().copied().unwrap_or(QuestionKey::E);
            }
            Stage::Question => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn progress(&self) -> ProgressSnapshot {
        match self.stage {
            Stage::Final => ProgressSnapshot::finished(self.trail.len() as u32),
            Stage::Question => ProgressSnapshot::in_question(
                self.trail.len().saturating_sub(1) as u32,
                self.current,
                &self.answers,
            ),
        }
    }

    pub fn view(&self) -> SessionView {
        let classification = self.classification();
        SessionView {
            stage: self.stage,
            stage_label: self.stage.label(),
            question: match self.stage {
                Stage::Question => Some(catalog::prompt(self.current)),
                Stage::Final => None,
            },
            bonus: self.bonus_offered().then(catalog::bonus_prompt),
            answers: self.answers,
            trail: self.trail.clone(),
            progress: self.progress(),
            can_go_back: self.can_go_back(),
            share_text: share_text(&classification),
            result: ResultView::from_classification(&classification),
        }
    }
}

/// Snapshot handed to whatever renders the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub stage: Stage,
    pub stage_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionPrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<QuestionPrompt>,
    pub answers: AnswerSheet,
    pub trail: Vec<QuestionKey>,
    pub progress: ProgressSnapshot,
    pub can_go_back: bool,
    pub result: ResultView,
    pub share_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("question {received} is not on screen (current question is {expected})")]
    NotCurrentQuestion {
        expected: QuestionKey,
        received: QuestionKey,
    },
    #[error("the diagnostic is already complete; go back to change an answer")]
    AlreadyFinal,
    #[error("the bonus question is only offered on a result above level 0")]
    BonusUnavailable,
    #[error(transparent)]
    InvalidAnswer(#[from] ParseAnswerError),
}
