//! Personalized result view built from a finished session.

use serde::{Deserialize, Serialize};

use crate::quiz::archetype::ArchetypeBucket;
use crate::quiz::bank::Answer;

/// One small practice per answer, in answer order.
const MICRO_RITUALS: [&str; 7] = [
    "Take three deep breaths, feeling clarity flow with each exhale.",
    "Write one word that captures your highest aspiration on paper.",
    "Place your hand on your heart and speak one truth aloud.",
    "Light a candle and meditate on your inner flame for 2 minutes.",
    "Draw a simple symbol that represents your spiritual path.",
    "Spend 5 minutes in nature, feeling your connection to all life.",
    "Practice gratitude by naming three things that expand your consciousness.",
];

const FALLBACK_RITUAL: &str = "Trust your intuition in this sacred moment.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub archetype: ArchetypeBucket,
    /// Opening paragraph quoting the respondent's own choices.
    pub personal_reflection: String,
    pub micro_rituals: Vec<String>,
}

impl QuizResult {
    pub fn new(score: u32, archetype: ArchetypeBucket, answers: &[Answer]) -> Self {
        Self {
            score,
            archetype,
            personal_reflection: personal_reflection(answers),
            micro_rituals: micro_rituals(answers),
        }
    }
}

pub fn personal_reflection(answers: &[Answer]) -> String {
    let selections = answers
        .iter()
        .map(|a| format!("\"{}\"", a.label))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Your journey revealed choices of {selections}. Each selection opens a window into \
         your inner landscape, showing where light enters and where shadows still dance."
    )
}

pub fn micro_rituals(answers: &[Answer]) -> Vec<String> {
    (0..answers.len())
        .map(|i| MICRO_RITUALS.get(i).copied().unwrap_or(FALLBACK_RITUAL).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(label: &str) -> Answer {
        Answer {
            question_id: label.to_lowercase(),
            label: label.into(),
            points: 1,
        }
    }

    #[test]
    fn reflection_quotes_labels_in_order() {
        let text = personal_reflection(&[answer("Never"), answer("Lucid dreams")]);
        assert!(text.starts_with("Your journey revealed choices of \"Never\", \"Lucid dreams\"."));
    }

    #[test]
    fn one_ritual_per_answer() {
        let answers: Vec<Answer> = (0..3).map(|i| answer(&format!("A{i}"))).collect();
        let rituals = micro_rituals(&answers);
        assert_eq!(rituals.len(), 3);
        assert_eq!(rituals[0], MICRO_RITUALS[0]);
    }

    #[test]
    fn rituals_fall_back_past_the_seventh() {
        let answers: Vec<Answer> = (0..9).map(|i| answer(&format!("A{i}"))).collect();
        let rituals = micro_rituals(&answers);
        assert_eq!(rituals.len(), 9);
        assert_eq!(rituals[6], MICRO_RITUALS[6]);
        assert_eq!(rituals[7], FALLBACK_RITUAL);
        assert_eq!(rituals[8], FALLBACK_RITUAL);
    }
}
