//! Completion sinks.
//!
//! A sink receives the finalized session exactly once, when the flow engine
//! enters `Result`. Sinks cannot fail the transition; whatever they do with
//! the record is their own concern.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::quiz::{Answer, ArchetypeKind};

/// Finalized session payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub session_id: Uuid,
    pub score: u32,
    pub archetype: ArchetypeKind,
    pub title: String,
    pub unlocked: bool,
    pub answers: Vec<Answer>,
    /// Thresholds fired during the session, ascending.
    pub fired_milestones: Vec<u32>,
    pub completed_at: DateTime<Utc>,
}

/// Receives completed sessions.
pub trait CompletionSink: Send + Sync {
    /// Short identifier (e.g. "tracing", "null").
    fn name(&self) -> &str;

    fn on_complete(&self, record: &CompletionRecord);
}

/// Logs each completion at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl CompletionSink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn on_complete(&self, record: &CompletionRecord) {
        info!(
            session_id = %record.session_id,
            score = record.score,
            archetype = %record.archetype,
            title = %record.title,
            unlocked = record.unlocked,
            milestones = ?record.fired_milestones,
            answers = ?record.answers,
            "quiz complete"
        );
    }
}

/// Drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CompletionSink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    fn on_complete(&self, _record: &CompletionRecord) {}
}

/// Keeps records in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<CompletionRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CompletionRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CompletionSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn on_complete(&self, record: &CompletionRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
    }
}
