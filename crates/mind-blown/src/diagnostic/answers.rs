use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pruning::prune_downstream;

/// Binary answer used by every question except the reaction prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Yes,
    No,
}

impl Choice {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// Immediate reaction to the surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Shrug,
    Double,
    Whoa,
}

impl Reaction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shrug => "shrug",
            Self::Double => "double",
            Self::Whoa => "whoa",
        }
    }
}

/// Questions that can be routed to. The bonus question is handled separately on the
/// result view and never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionKey {
    E,
    R,
    Q1,
    Q3,
    Q4,
    Q5,
    Q6,
}

impl QuestionKey {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::E,
            Self::R,
            Self::Q1,
            Self::Q3,
            Self::Q4,
            Self::Q5,
            Self::Q6,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::E => "E",
            Self::R => "R",
            Self::Q1 => "Q1",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
            Self::Q5 => "Q5",
            Self::Q6 => "Q6",
        }
    }

    /// Fields invalidated when this question's answer changes.
    pub const fn downstream(self) -> &'static [QuestionKey] {
        use QuestionKey::*;
        match self {
            E => &[R, Q1, Q3, Q4, Q5, Q6],
            R => &[Q1, Q3, Q4, Q5, Q6],
            Q1 => &[Q3, Q4, Q5, Q6],
            Q3 => &[Q4, Q5, Q6],
            Q4 => &[Q5, Q6],
            Q5 => &[Q6],
            Q6 => &[],
        }
    }

    /// Whether the reaction options apply rather than yes/no.
    pub const fn takes_reaction(self) -> bool {
        matches!(self, Self::R)
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKey {
    type Err = ParseAnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseAnswerError::UnknownQuestion(trimmed.to_string()))
    }
}

/// A single answer as captured at the boundary, before it is matched to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(Choice),
    Reaction(Reaction),
}

impl AnswerValue {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Choice(choice) => choice.as_str(),
            Self::Reaction(reaction) => reaction.as_str(),
        }
    }
}

impl From<Choice> for AnswerValue {
    fn from(value: Choice) -> Self {
        Self::Choice(value)
    }
}

impl From<Reaction> for AnswerValue {
    fn from(value: Reaction) -> Self {
        Self::Reaction(value)
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerValue {
    type Err = ParseAnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Self::Choice(Choice::Yes)),
            "no" | "n" => Ok(Self::Choice(Choice::No)),
            "shrug" => Ok(Self::Reaction(Reaction::Shrug)),
            "double" => Ok(Self::Reaction(Reaction::Double)),
            "whoa" => Ok(Self::Reaction(Reaction::Whoa)),
            other => Err(ParseAnswerError::UnknownValue(other.to_string())),
        }
    }
}

/// Every answer collected so far. `None` means unanswered.
///
/// Mutate through [`AnswerSheet::record`] so downstream answers are pruned in the same
/// step; the raw setters exist for building snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerSheet {
    #[serde(rename = "E", default, skip_serializing_if = "Option::is_none")]
    pub expectation: Option<Choice>,
    #[serde(rename = "R", default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,
    #[serde(rename = "Q1", default, skip_serializing_if = "Option::is_none")]
    pub light_signs: Option<Choice>,
    #[serde(rename = "Q3", default, skip_serializing_if = "Option::is_none")]
    pub awe_signs: Option<Choice>,
    #[serde(rename = "Q4", default, skip_serializing_if = "Option::is_none")]
    pub verification_urge: Option<Choice>,
    #[serde(rename = "Q5", default, skip_serializing_if = "Option::is_none")]
    pub function_hit: Option<Choice>,
    #[serde(rename = "Q6", default, skip_serializing_if = "Option::is_none")]
    pub worldview_wobble: Option<Choice>,
    /// Bonus: still thinking about it an hour later.
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub still_thinking: Option<Choice>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    fn choice_slot(&mut self, key: QuestionKey) -> Option<&mut Option<Choice>> {
        match key {
            QuestionKey::E => Some(&mut self.expectation),
            QuestionKey::R => None,
            QuestionKey::Q1 => Some(&mut self.light_signs),
            QuestionKey::Q3 => Some(&mut self.awe_signs),
            QuestionKey::Q4 => Some(&mut self.verification_urge),
            QuestionKey::Q5 => Some(&mut self.function_hit),
            QuestionKey::Q6 => Some(&mut self.worldview_wobble),
        }
    }

    pub fn get(&self, key: QuestionKey) -> Option<AnswerValue> {
        match key {
            QuestionKey::E => self.expectation.map(AnswerValue::from),
            QuestionKey::R => self.reaction.map(AnswerValue::from),
            QuestionKey::Q1 => self.light_signs.map(AnswerValue::from),
            QuestionKey::Q3 => self.awe_signs.map(AnswerValue::from),
            QuestionKey::Q4 => self.verification_urge.map(AnswerValue::from),
            QuestionKey::Q5 => self.function_hit.map(AnswerValue::from),
            QuestionKey::Q6 => self.worldview_wobble.map(AnswerValue::from),
        }
    }

    pub fn is_answered(&self, key: QuestionKey) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` without touching any other field. Fails when the value does not
    /// belong to the question's domain.
    pub fn set(&mut self, key: QuestionKey, value: AnswerValue) -> Result<(), ParseAnswerError> {
        match (key, value) {
            (QuestionKey::R, AnswerValue::Reaction(reaction)) => {
                self.reaction = Some(reaction);
                Ok(())
            }
            (_, AnswerValue::Choice(choice)) => match self.choice_slot(key) {
                Some(slot) => {
                    *slot = Some(choice);
                    Ok(())
                }
                None => Err(ParseAnswerError::Mismatch { key, value }),
            },
            (_, AnswerValue::Reaction(_)) => Err(ParseAnswerError::Mismatch { key, value }),
        }
    }

    pub fn clear(&mut self, key: QuestionKey) {
        match self.choice_slot(key) {
            Some(slot) => *slot = None,
            None => self.reaction = None,
        }
    }

    /// Store `value` and drop every answer that depended on the previous one.
    pub fn record(&mut self, key: QuestionKey, value: AnswerValue) -> Result<(), ParseAnswerError> {
        self.set(key, value)?;
        *self = prune_downstream(key, self);
        Ok(())
    }

    // Typed builders for assembling snapshots. Each takes the only value type its field
    // accepts, so no domain check is needed.

    pub fn with_expectation(mut self, value: Choice) -> Self {
        self.expectation = Some(value);
        self
    }

    pub fn with_reaction(mut self, value: Reaction) -> Self {
        self.reaction = Some(value);
        self
    }

    pub fn with_light_signs(mut self, value: Choice) -> Self {
        self.light_signs = Some(value);
        self
    }

    pub fn with_awe_signs(mut self, value: Choice) -> Self {
        self.awe_signs = Some(value);
        self
    }

    pub fn with_verification_urge(mut self, value: Choice) -> Self {
        self.verification_urge = Some(value);
        self
    }

    pub fn with_function_hit(mut self, value: Choice) -> Self {
        self.function_hit = Some(value);
        self
    }

    pub fn with_worldview_wobble(mut self, value: Choice) -> Self {
        self.worldview_wobble = Some(value);
        self
    }

    pub fn with_bonus(mut self, value: Choice) -> Self {
        self.still_thinking = Some(value);
        self
    }
}

impl fmt::Display for AnswerSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = QuestionKey::ordered()
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| format!("{key}={value}")))
            .collect();
        if let Some(bonus) = self.still_thinking {
            parts.push(format!("A={}", bonus.as_str()));
        }
        f.write_str(&parts.join(","))
    }
}

/// Parses the compact `E=yes,R=whoa,Q3=no` form. `A` carries the bonus answer.
impl FromStr for AnswerSheet {
    type Err = ParseAnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut sheet = AnswerSheet::new();
        for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ParseAnswerError::Malformed(pair.to_string()))?;
            let value: AnswerValue = value.parse()?;

            if key.trim().eq_ignore_ascii_case("A") {
                match value {
                    AnswerValue::Choice(choice) => sheet.still_thinking = Some(choice),
                    AnswerValue::Reaction(_) => {
                        return Err(ParseAnswerError::BonusMismatch(value));
                    }
                }
                continue;
            }

            sheet.set(key.parse()?, value)?;
        }
        Ok(sheet)
    }
}

/// Rejected input at the parsing boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAnswerError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("unknown answer '{0}'")]
    UnknownValue(String),
    #[error("answer '{value}' is not an option for question {key}")]
    Mismatch { key: QuestionKey, value: AnswerValue },
    #[error("answer '{0}' is not an option for the bonus question")]
    BonusMismatch(AnswerValue),
    #[error("expected KEY=VALUE, found '{0}'")]
    Malformed(String),
}
