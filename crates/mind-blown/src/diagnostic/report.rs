use serde::Serialize;

use super::classifier::{BlownLevel, Classification};

/// Levels at or above this one get the celebratory treatment.
const CELEBRATION_FLOOR: BlownLevel = BlownLevel::Thoroughly;

/// Result panel contents derived from a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub complete: bool,
    pub level: Option<BlownLevel>,
    pub base_level: Option<BlownLevel>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blurb: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quip: Option<&'static str>,
    /// Percentage plotted on the result gauge.
    pub intensity: u8,
    pub celebrate: bool,
    pub bonus_eligible: bool,
    pub path: Vec<String>,
}

impl ResultView {
    pub fn from_classification(classification: &Classification) -> Self {
        let level = classification.level;
        Self {
            complete: classification.complete,
            level,
            base_level: classification.base_level,
            label: classification.label(),
            name: level.map(BlownLevel::name),
            blurb: level.map(BlownLevel::blurb),
            quip: level.map(BlownLevel::quip),
            intensity: level.map(BlownLevel::intensity).unwrap_or(0),
            celebrate: level.map(|level| level >= CELEBRATION_FLOOR).unwrap_or(false),
            bonus_eligible: classification.bonus_eligible(),
            path: classification.path.clone(),
        }
    }
}

/// One-line summary suitable for pasting elsewhere.
pub fn share_text(classification: &Classification) -> String {
    let level = match classification.level {
        Some(level) => format!("Level {} – {}", level.index(), level.name()),
        None => "(incomplete)".to_string(),
    };
    format!(
        "Mind-Blown Diagnostic Result: {}. Path: {}.",
        level,
        classification.path.join(" → ")
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub level: BlownLevel,
    pub name: &'static str,
    pub blurb: &'static str,
}

pub fn legend() -> Vec<LegendEntry> {
    BlownLevel::ordered()
        .into_iter()
        .map(|level| LegendEntry {
            level,
            name: level.name(),
            blurb: level.blurb(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::answers::{AnswerSheet, Choice, Reaction};
    use crate::diagnostic::classifier::{classify, INCOMPLETE_LABEL};

    #[test]
    fn incomplete_view_has_no_level_copy() {
        let view = ResultView::from_classification(&classify(&AnswerSheet::new()));
        assert!(!view.complete);
        assert_eq!(view.label, INCOMPLETE_LABEL);
        assert_eq!(view.intensity, 0);
        assert!(view.name.is_none() && view.blurb.is_none() && view.quip.is_none());
        assert!(!view.celebrate);
    }

    #[test]
    fn thorough_results_celebrate() {
        let answers = AnswerSheet::new()
            .with_expectation(Choice::Yes)
            .with_reaction(Reaction::Whoa)
            .with_awe_signs(Choice::Yes)
            .with_verification_urge(Choice::Yes)
            .with_function_hit(Choice::Yes)
            .with_worldview_wobble(Choice::No);
        let view = ResultView::from_classification(&classify(&answers));
        assert_eq!(view.level, Some(BlownLevel::Thoroughly));
        assert_eq!(view.intensity, 75);
        assert!(view.celebrate);
        assert!(view.bonus_eligible);
    }

    #[test]
    fn share_text_joins_the_path() {
        let answers = AnswerSheet::new().with_expectation(Choice::No);
        assert_eq!(
            share_text(&classify(&answers)),
            "Mind-Blown Diagnostic Result: Level 0 – Not Blown. Path: No expectation challenge → Level 0."
        );
        assert_eq!(
            share_text(&classify(&AnswerSheet::new())),
            "Mind-Blown Diagnostic Result: (incomplete). Path: ."
        );
    }

    #[test]
    fn legend_covers_all_levels() {
        let legend = legend();
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[4].name, "Existence-Level Blown");
    }
}
