use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::answers::{AnswerSheet, Choice, ParseAnswerError, QuestionKey, Reaction};

/// Where the questionnaire goes after the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Next {
    Question(QuestionKey),
    Final,
}

impl Next {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question(key) => key.as_str(),
            Self::Final => "final",
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Final)
    }
}

impl From<QuestionKey> for Next {
    fn from(value: QuestionKey) -> Self {
        Self::Question(value)
    }
}

impl fmt::Display for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Next {
    type Err = ParseAnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("final") {
            return Ok(Self::Final);
        }
        raw.parse().map(Self::Question)
    }
}

impl Serialize for Next {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Next {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Route from `current` given the answers so far.
///
/// An unanswered `current` routes back to itself. The adjacency mirrors the classifier's
/// gating exactly; the two together decide which questions are ever shown.
pub fn next_question(current: QuestionKey, answers: &AnswerSheet) -> Next {
    use QuestionKey::*;

    let follow = |choice: Option<Choice>, on_yes: Next| match choice {
        None => Next::Question(current),
        Some(Choice::Yes) => on_yes,
        Some(Choice::No) => Next::Final,
    };

    match current {
        E => follow(answers.expectation, Next::Question(R)),
        R => match answers.reaction {
            None => Next::Question(R),
            Some(Reaction::Shrug) => Next::Final,
            Some(Reaction::Double) => Next::Question(Q1),
            Some(Reaction::Whoa) => Next::Question(Q3),
        },
        Q1 => follow(answers.light_signs, Next::Final),
        Q3 => follow(answers.awe_signs, Next::Question(Q4)),
        Q4 => follow(answers.verification_urge, Next::Question(Q5)),
        Q5 => follow(answers.function_hit, Next::Question(Q6)),
        Q6 => follow(answers.worldview_wobble, Next::Final),
    }
}

/// First unanswered question on the routed path from `E`, or `Final` when the path is
/// fully answered.
pub fn frontier(answers: &AnswerSheet) -> Next {
    let mut current = QuestionKey::E;
    loop {
        match next_question(current, answers) {
            Next::Question(key) if key == current => return Next::Question(key),
            Next::Question(key) => current = key,
            Next::Final => return Next::Final,
        }
    }
}

/// Questions visited on the routed path, in order, stopping at the frontier.
pub fn answered_path(answers: &AnswerSheet) -> Vec<QuestionKey> {
    let mut path = Vec::new();
    let mut current = QuestionKey::E;
    while answers.is_answered(current) {
        path.push(current);
        match next_question(current, answers) {
            Next::Question(key) => current = key,
            Next::Final => break,
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_value(Next::Question(QuestionKey::Q3)).expect("serializes"),
            serde_json::json!("Q3")
        );
        assert_eq!(
            serde_json::to_value(Next::Final).expect("serializes"),
            serde_json::json!("final")
        );
        let parsed: Next = serde_json::from_str("\"FINAL\"").expect("parses");
        assert_eq!(parsed, Next::Final);
    }

    #[test]
    fn frontier_walks_to_the_first_gap() {
        let answers = AnswerSheet::new()
            .with_expectation(Choice::Yes)
            .with_reaction(Reaction::Whoa)
            .with_awe_signs(Choice::Yes);
        assert_eq!(frontier(&answers), Next::Question(QuestionKey::Q4));
        assert_eq!(
            answered_path(&answers),
            vec![QuestionKey::E, QuestionKey::R, QuestionKey::Q3]
        );
    }

    #[test]
    fn frontier_ignores_stale_off_path_answers() {
        let answers = AnswerSheet::new()
            .with_expectation(Choice::Yes)
            .with_reaction(Reaction::Double)
            .with_awe_signs(Choice::Yes);
        assert_eq!(frontier(&answers), Next::Question(QuestionKey::Q1));
    }
}
