use serde::Serialize;

use super::answers::{AnswerValue, Choice, QuestionKey, Reaction};

/// Key used for the bonus question in prompts and payloads.
pub const BONUS_KEY: &str = "A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub value: AnswerValue,
    pub label: &'static str,
}

/// Copy shown for a question, with the options it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionPrompt {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub options: &'static [AnswerOption],
}

impl QuestionPrompt {
    /// Resolve terminal input against this prompt's options: option number (1-based),
    /// option value, or `y`/`n` shorthand.
    pub fn match_input(&self, raw: &str) -> Option<AnswerValue> {
        let trimmed = raw.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|index| self.options.get(index))
                .map(|option| option.value);
        }

        let value: AnswerValue = trimmed.parse().ok()?;
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.value)
    }
}

const YES_NO: &[AnswerOption] = &[
    AnswerOption {
        value: AnswerValue::Choice(Choice::Yes),
        label: "Yes",
    },
    AnswerOption {
        value: AnswerValue::Choice(Choice::No),
        label: "No",
    },
];

const REACTIONS: &[AnswerOption] = &[
    AnswerOption {
        value: AnswerValue::Reaction(Reaction::Shrug),
        label: "Shrug / meh",
    },
    AnswerOption {
        value: AnswerValue::Reaction(Reaction::Double),
        label: "Double-take / \"huh?\"",
    },
    AnswerOption {
        value: AnswerValue::Reaction(Reaction::Whoa),
        label: "\"Whoa!\" / jaw drop",
    },
];

pub fn prompt(key: QuestionKey) -> QuestionPrompt {
    let (title, description) = match key {
        QuestionKey::E => (
            "Did something just challenge your expectations?",
            "Surprises, contradictions, and plot twists qualify. Your cat filing taxes does not. (Probably.)",
        ),
        QuestionKey::R => (
            "What was your immediate reaction?",
            "First instinct, before your inner fact-checker puts on glasses.",
        ),
        QuestionKey::Q1 => (
            "Light signs?",
            "Re-read once, small smile, raised brows. Side effects may include mild smugness.",
        ),
        QuestionKey::Q3 => (
            "Awe signs?",
            "Goosebumps, jaw drop, widened eyes. If your eyebrows left orbit, count it as 'yes'.",
        ),
        QuestionKey::Q4 => (
            "Verification urge?",
            "Check source, quick math, ask a friend. AKA the 'am I being bamboozled?' test.",
        ),
        QuestionKey::Q5 => (
            "Function hit?",
            "Lose track of time, need to sit, thousand-yard stare. Meeting faces may become background NPCs.",
        ),
        QuestionKey::Q6 => (
            "Worldview wobble?",
            "Rethinking assumptions; need a walk to process. Temporary reality defragmentation may occur.",
        ),
    };

    QuestionPrompt {
        key: key.as_str(),
        title,
        description,
        options: if key.takes_reaction() { REACTIONS } else { YES_NO },
    }
}

pub fn bonus_prompt() -> QuestionPrompt {
    QuestionPrompt {
        key: BONUS_KEY,
        title: "Bonus: After ~1 hour, are you still thinking about it?",
        description: "If yes, we bump your score one level (capped at Level 4).",
        options: YES_NO,
    }
}

/// Every routed question followed by the bonus question.
pub fn questions() -> Vec<QuestionPrompt> {
    QuestionKey::ordered()
        .into_iter()
        .map(prompt)
        .chain(std::iter::once(bonus_prompt()))
        .collect()
}
