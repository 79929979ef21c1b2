//! Scoring engine.
//!
//! Pure integer functions: total score, bucket lookup, and the rounded
//! progress percentage that drives milestone firing.

use crate::error::ConfigError;
use crate::quiz::archetype::ArchetypeBucket;
use crate::quiz::bank::Answer;

/// Sum of points across all answers.
///
/// Saturates instead of overflowing.
pub fn compute_score(answers: &[Answer]) -> u32 {
    answers
        .iter()
        .fold(0u32, |acc, a| acc.saturating_add(a.points))
}

/// First bucket, in table order, whose inclusive range contains `score`.
///
/// # Errors
///
/// Returns [`ConfigError::Unclassified`] when no bucket matches, which can
/// only happen with a table that skipped validation.
pub fn classify(score: u32, buckets: &[ArchetypeBucket]) -> Result<&ArchetypeBucket, ConfigError> {
    buckets
        .iter()
        .find(|b| b.contains(score))
        .ok_or(ConfigError::Unclassified { score })
}

/// `round(100 * answered / total)`, halves rounding up. Zero when `total` is zero.
pub fn progress_percent(answered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let answered = answered.min(total) as u64;
    let total = total as u64;
    ((200 * answered + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::archetype::{ArchetypeKind, ArchetypeTable};

    fn answers(points: &[u32]) -> Vec<Answer> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| Answer {
                question_id: format!("q{i}"),
                label: format!("option {p}"),
                points: *p,
            })
            .collect()
    }

    #[test]
    fn score_is_exact_sum() {
        assert_eq!(compute_score(&answers(&[0, 1, 2, 1, 2, 1, 3])), 10);
        assert_eq!(compute_score(&[]), 0);
    }

    #[test]
    fn score_saturates() {
        assert_eq!(compute_score(&answers(&[u32::MAX, 5])), u32::MAX);
    }

    #[test]
    fn boundary_score_resolves_to_lower_bucket() {
        let table = ArchetypeTable::default();
        let bucket = classify(5, table.buckets()).unwrap();
        assert_eq!(bucket.archetype, ArchetypeKind::Asleep);
        assert_eq!(bucket.max_score, Some(5));
    }

    #[test]
    fn classify_fails_on_uncovered_score() {
        let table = ArchetypeTable::default();
        let partial = &table.buckets()[..2];
        assert_eq!(
            classify(13, partial),
            Err(ConfigError::Unclassified { score: 13 })
        );
    }

    #[test]
    fn progress_rounds_half_up() {
        assert_eq!(progress_percent(0, 7), 0);
        assert_eq!(progress_percent(1, 7), 14);
        assert_eq!(progress_percent(2, 7), 29);
        assert_eq!(progress_percent(4, 7), 57);
        assert_eq!(progress_percent(6, 7), 86);
        assert_eq!(progress_percent(7, 7), 100);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(1, 2), 50);
    }

    #[test]
    fn progress_handles_empty_bank() {
        assert_eq!(progress_percent(0, 0), 0);
    }
}
