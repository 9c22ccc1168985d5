use std::fmt;

use serde::{Deserialize, Serialize};

use super::answers::{AnswerSheet, Choice, Reaction};

/// Placeholder label shown until the answers settle on a level.
pub const INCOMPLETE_LABEL: &str = "Need more inputs";

/// The five grades of the diagnostic, serialized as their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum BlownLevel {
    NotBlown,
    Mildly,
    Considerably,
    Thoroughly,
    ExistenceLevel,
}

impl BlownLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::NotBlown,
            Self::Mildly,
            Self::Considerably,
            Self::Thoroughly,
            Self::ExistenceLevel,
        ]
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::NotBlown => 0,
            Self::Mildly => 1,
            Self::Considerably => 2,
            Self::Thoroughly => 3,
            Self::ExistenceLevel => 4,
        }
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::NotBlown),
            1 => Some(Self::Mildly),
            2 => Some(Self::Considerably),
            3 => Some(Self::Thoroughly),
            4 => Some(Self::ExistenceLevel),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NotBlown => "Not Blown",
            Self::Mildly => "Mildly Blown",
            Self::Considerably => "Considerably Blown",
            Self::Thoroughly => "Thoroughly Blown",
            Self::ExistenceLevel => "Existence-Level Blown",
        }
    }

    pub const fn blurb(self) -> &'static str {
        match self {
            Self::NotBlown => {
                "Curiosity not engaged. Your expectations stayed intact; carry on with confidence."
            }
            Self::Mildly => "A brief delight and a second look. You probably said 'huh!' and smiled.",
            Self::Considerably => {
                "Audible 'whoa'. You shared it and maybe did a quick fact-check."
            }
            Self::Thoroughly => {
                "You needed a moment. Time dilated, priorities paused, stare engaged."
            }
            Self::ExistenceLevel => {
                "Worldview tilt. You're pacing, re-mapping assumptions. Sleep optional."
            }
        }
    }

    pub const fn quip(self) -> &'static str {
        match self {
            Self::NotBlown => "Mind intact. Engineers hate this one weird trick.",
            Self::Mildly => "A light breeze rustles your neurons.",
            Self::Considerably => "Reticulating splines of amazement...",
            Self::Thoroughly => "Brain.exe has entered dramatic pause.",
            Self::ExistenceLevel => "Your worldview just did a backflip.",
        }
    }

    /// One level up, capped at the top grade.
    pub const fn bumped(self) -> Self {
        match Self::from_index(self.index() + 1) {
            Some(level) => level,
            None => Self::ExistenceLevel,
        }
    }

    /// Share of the intensity gauge, 25 points per level.
    pub const fn intensity(self) -> u8 {
        self.index() * 25
    }
}

impl fmt::Display for BlownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Level {})", self.name(), self.index())
    }
}

impl From<BlownLevel> for u8 {
    fn from(value: BlownLevel) -> Self {
        value.index()
    }
}

impl TryFrom<u8> for BlownLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("level {value} is outside 0..=4"))
    }
}

/// Derived verdict for a set of answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub complete: bool,
    pub base_level: Option<BlownLevel>,
    /// Base level after the bonus adjustment.
    pub level: Option<BlownLevel>,
    /// One explanation per decided branch, in order.
    pub path: Vec<String>,
}

impl Classification {
    pub fn label(&self) -> String {
        match self.level {
            Some(level) => level.to_string(),
            None => INCOMPLETE_LABEL.to_string(),
        }
    }

    /// The bonus question only matters once a level above zero is settled.
    pub fn bonus_eligible(&self) -> bool {
        self.base_level
            .map(|level| level >= BlownLevel::Mildly)
            .unwrap_or(false)
    }
}

/// Classify the answers. Total over the domain: missing answers yield `complete == false`.
pub fn classify(answers: &AnswerSheet) -> Classification {
    let mut path = Vec::new();
    let base_level = base_level(answers, &mut path);
    let level = base_level.map(|base| apply_bonus(base, answers.still_thinking));

    Classification {
        complete: base_level.is_some(),
        base_level,
        level,
        path,
    }
}

fn apply_bonus(base: BlownLevel, still_thinking: Option<Choice>) -> BlownLevel {
    match still_thinking {
        Some(Choice::Yes) if base >= BlownLevel::Mildly => base.bumped(),
        _ => base,
    }
}

fn base_level(answers: &AnswerSheet, path: &mut Vec<String>) -> Option<BlownLevel> {
    let (level, reason) = match answers.expectation? {
        Choice::No => (BlownLevel::NotBlown, "No expectation challenge"),
        Choice::Yes => {
            path.push("Expectations challenged".to_string());
            match answers.reaction? {
                Reaction::Shrug => (BlownLevel::NotBlown, "Immediate shrug"),
                Reaction::Double => match answers.light_signs? {
                    Choice::Yes => (BlownLevel::Mildly, "Light signs present"),
                    Choice::No => (BlownLevel::NotBlown, "No light signs"),
                },
                Reaction::Whoa => whoa_branch(answers)?,
            }
        }
    };

    path.push(format!("{reason} → Level {}", level.index()));
    Some(level)
}

fn whoa_branch(answers: &AnswerSheet) -> Option<(BlownLevel, &'static str)> {
    if answers.awe_signs? == Choice::No {
        return Some((BlownLevel::Mildly, "No awe signs"));
    }
    if answers.verification_urge? == Choice::No {
        return Some((BlownLevel::Considerably, "No verification urge"));
    }
    if answers.function_hit? == Choice::No {
        return Some((BlownLevel::Considerably, "No function hit"));
    }
    match answers.worldview_wobble? {
        Choice::No => Some((BlownLevel::Thoroughly, "No worldview wobble")),
        Choice::Yes => Some((BlownLevel::ExistenceLevel, "Worldview wobble")),
    }
}
