use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quiz::{ArchetypeKind, QuizView};

/// Every state change in a quiz session produces an Event.
/// Presentation layers render from them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    QuizStarted {
        session_id: Uuid,
        question_count: usize,
        at: DateTime<Utc>,
    },
    QuestionPresented {
        question_index: usize,
        question_id: String,
        headline: String,
        progress_pct: u32,
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        question_index: usize,
        question_id: String,
        label: String,
        points: u32,
        fragment_count: usize,
        at: DateTime<Utc>,
    },
    /// An interlude became due and is now on screen.
    MilestoneReached {
        threshold_pct: u32,
        progress_pct: u32,
        headline: String,
        at: DateTime<Utc>,
    },
    MilestoneResumed {
        threshold_pct: u32,
        at: DateTime<Utc>,
    },
    QuizCompleted {
        session_id: Uuid,
        score: u32,
        archetype: ArchetypeKind,
        title: String,
        unlocked: bool,
        at: DateTime<Utc>,
    },
    QuizReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_id: Uuid,
        view: QuizView,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Variant name, as written in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::QuizStarted { .. } => "QuizStarted",
            Event::QuestionPresented { .. } => "QuestionPresented",
            Event::AnswerRecorded { .. } => "AnswerRecorded",
            Event::MilestoneReached { .. } => "MilestoneReached",
            Event::MilestoneResumed { .. } => "MilestoneResumed",
            Event::QuizCompleted { .. } => "QuizCompleted",
            Event::QuizReset { .. } => "QuizReset",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_matches_kind() {
        let event = Event::MilestoneReached {
            threshold_pct: 25,
            progress_pct: 29,
            headline: "The portal widens...".into(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
        assert_eq!(json["threshold_pct"], 25);
    }

    #[test]
    fn completed_event_uses_archetype_id() {
        let event = Event::QuizCompleted {
            session_id: Uuid::nil(),
            score: 10,
            archetype: ArchetypeKind::Seeker,
            title: "The Seeker".into(),
            unlocked: true,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["archetype"], "seeker");
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
