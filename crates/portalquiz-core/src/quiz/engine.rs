//! Quiz flow engine.
//!
//! The flow engine is a synchronous state machine driven by discrete
//! respondent events. It does not sleep or spawn anything; presentation delays
//! belong to the caller, which invokes the next command once it is ready.
//!
//! ## State Transitions
//!
//! ```text
//! Intro -> Question(0) -> [Milestone ->] Question(1) -> ... -> Result
//! ```
//!
//! Every command either completes in full or returns a [`TransitionError`]
//! without touching the session state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = QuizEngine::new(QuizTables::default());
//! engine.start()?;
//! engine.submit_option_index(2)?;
//! while engine.phase() == Phase::Milestone {
//!     engine.resume_from_milestone()?;
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::archetype::ArchetypeBucket;
use super::bank::{Answer, Question, QuizOption};
use super::milestone::Milestone;
use super::result::QuizResult;
use super::scoring;
use super::QuizTables;
use crate::error::TransitionError;
use crate::events::Event;
use crate::sink::{CompletionRecord, CompletionSink, TracingSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Intro,
    Question,
    Milestone,
    Result,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::Question => "question",
            Phase::Milestone => "milestone",
            Phase::Result => "result",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a session mutates. Only [`QuizEngine`] writes to it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowState {
    pub session_id: Uuid,
    pub phase: Phase,
    /// Questions answered so far, which is also the index of the next one.
    pub current_question_index: usize,
    pub answers: Vec<Answer>,
    /// Thresholds already fired this session. Never shrinks until reset.
    pub fired_milestones: BTreeSet<u32>,
    /// Threshold of the interlude on screen. Set only in `Milestone`.
    #[serde(default)]
    pub pending_milestone: Option<u32>,
    /// Set only in `Result`.
    #[serde(default)]
    pub result: Option<QuizResult>,
}

/// Read model handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizView {
    pub phase: Phase,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    pub progress_percent: u32,
    pub fragment_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_milestone: Option<Milestone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
}

/// Quiz flow controller. One instance per session; no shared state.
pub struct QuizEngine {
    tables: QuizTables,
    state: FlowState,
    sink: Box<dyn CompletionSink>,
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("state", &self.state)
            .field("sink", &self.sink.name())
            .finish_non_exhaustive()
    }
}

impl QuizEngine {
    /// Create an engine in the `Intro` phase. Completions go to [`TracingSink`].
    pub fn new(tables: QuizTables) -> Self {
        Self {
            tables,
            state: FlowState::default(),
            sink: Box::new(TracingSink),
        }
    }

    /// Replace the completion sink.
    pub fn with_sink(mut self, sink: impl CompletionSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn tables(&self) -> &QuizTables {
        &self.tables
    }

    pub fn question_count(&self) -> usize {
        self.tables.bank.len()
    }

    /// The question awaiting an answer. `None` outside the `Question` phase.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state.phase {
            Phase::Question => self.tables.bank.get(self.state.current_question_index),
            _ => None,
        }
    }

    /// 0 ..= 100, rounded share of questions answered.
    pub fn progress_percent(&self) -> u32 {
        scoring::progress_percent(self.state.answers.len(), self.tables.bank.len())
    }

    pub fn fragment_count(&self) -> usize {
        self.state.answers.len()
    }

    pub fn pending_milestone(&self) -> Option<&Milestone> {
        self.state
            .pending_milestone
            .and_then(|threshold| self.tables.milestones.get(threshold))
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.state.result.as_ref()
    }

    /// The classification. Defined only once the quiz reached `Result`.
    pub fn current_archetype(&self) -> Option<&ArchetypeBucket> {
        self.state.result.as_ref().map(|r| &r.archetype)
    }

    pub fn view(&self) -> QuizView {
        QuizView {
            phase: self.state.phase,
            question_count: self.question_count(),
            current_question: self.current_question().cloned(),
            progress_percent: self.progress_percent(),
            fragment_count: self.fragment_count(),
            pending_milestone: self.pending_milestone().cloned(),
            result: self.state.result.clone(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            session_id: self.state.session_id,
            view: self.view(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `Intro -> Question(0)`, with a fresh session.
    pub fn start(&mut self) -> Result<Vec<Event>, TransitionError> {
        self.expect_phase(Phase::Intro, "start the quiz")?;
        self.state = FlowState {
            session_id: Uuid::new_v4(),
            phase: Phase::Question,
            ..FlowState::default()
        };
        debug!(session_id = %self.state.session_id, questions = self.question_count(), "quiz started");

        let started = Event::QuizStarted {
            session_id: self.state.session_id,
            question_count: self.question_count(),
            at: Utc::now(),
        };
        let presented = self.question_presented();
        self.check_invariant();
        Ok(vec![started, presented])
    }

    /// Record `option` for the current question and move on.
    ///
    /// `option` must equal (label and points) one of the current question's
    /// options.
    pub fn submit_answer(&mut self, option: &QuizOption) -> Result<Vec<Event>, TransitionError> {
        let question = self.question_for("submit an answer")?;
        if !question.offers(option) {
            let err = TransitionError::ForeignOption {
                question_id: question.id.clone(),
                label: option.label.clone(),
                points: option.points,
            };
            warn!(%err, "answer rejected");
            return Err(err);
        }
        let answer = Answer::new(question, option);
        Ok(self.record(answer))
    }

    /// Same as [`submit_answer`](Self::submit_answer), picking the option by
    /// its position in the current question.
    pub fn submit_option_index(&mut self, index: usize) -> Result<Vec<Event>, TransitionError> {
        let question = self.question_for("submit an answer")?;
        let Some(option) = question.option(index) else {
            let err = TransitionError::OptionOutOfRange {
                question_id: question.id.clone(),
                index,
                len: question.options.len(),
            };
            warn!(%err, "answer rejected");
            return Err(err);
        };
        let answer = Answer::new(question, option);
        Ok(self.record(answer))
    }

    /// Leave the interlude on screen. Fires the next due milestone, if any,
    /// otherwise advances to the next question or the result.
    pub fn resume_from_milestone(&mut self) -> Result<Vec<Event>, TransitionError> {
        self.expect_phase(Phase::Milestone, "resume from a milestone")?;
        let resumed = Event::MilestoneResumed {
            threshold_pct: self.state.pending_milestone.unwrap_or_default(),
            at: Utc::now(),
        };
        let next = self.advance();
        self.check_invariant();
        Ok(vec![resumed, next])
    }

    /// Back to `Intro` from any phase, discarding the session.
    pub fn reset(&mut self) -> Event {
        debug!(session_id = %self.state.session_id, phase = %self.state.phase, "quiz reset");
        self.state = FlowState::default();
        Event::QuizReset { at: Utc::now() }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expect_phase(&self, expected: Phase, operation: &'static str) -> Result<(), TransitionError> {
        if self.state.phase == expected {
            return Ok(());
        }
        let err = TransitionError::WrongPhase {
            operation,
            phase: self.state.phase,
        };
        warn!(%err, "transition rejected");
        Err(err)
    }

    fn question_for(&self, operation: &'static str) -> Result<&Question, TransitionError> {
        self.expect_phase(Phase::Question, operation)?;
        self.tables
            .bank
            .get(self.state.current_question_index)
            .ok_or(TransitionError::WrongPhase {
                operation,
                phase: self.state.phase,
            })
    }

    fn record(&mut self, answer: Answer) -> Vec<Event> {
        let question_index = self.state.current_question_index;
        debug!(question_id = %answer.question_id, points = answer.points, "answer recorded");
        let recorded = Event::AnswerRecorded {
            question_index,
            question_id: answer.question_id.clone(),
            label: answer.label.clone(),
            points: answer.points,
            fragment_count: question_index + 1,
            at: Utc::now(),
        };
        self.state.answers.push(answer);
        self.state.current_question_index += 1;
        let next = self.advance();
        self.check_invariant();
        vec![recorded, next]
    }

    /// Fire the lowest due milestone, else present the next question, else
    /// finish. No milestone fires once every question is answered.
    fn advance(&mut self) -> Event {
        if self.state.answers.len() >= self.tables.bank.len() {
            return self.complete();
        }

        let progress = self.progress_percent();
        let due = self
            .tables
            .milestones
            .next_due(progress, &self.state.fired_milestones)
            .map(|m| (m.threshold_percent, m.content.headline.clone()));

        match due {
            Some((threshold, headline)) => {
                self.state.fired_milestones.insert(threshold);
                self.state.pending_milestone = Some(threshold);
                self.state.phase = Phase::Milestone;
                debug!(threshold, progress, "milestone reached");
                Event::MilestoneReached {
                    threshold_pct: threshold,
                    progress_pct: progress,
                    headline,
                    at: Utc::now(),
                }
            }
            None => {
                self.state.pending_milestone = None;
                self.state.phase = Phase::Question;
                self.question_presented()
            }
        }
    }

    fn complete(&mut self) -> Event {
        let score = scoring::compute_score(&self.state.answers);
        let bucket = self.tables.archetypes.classify(score).clone();
        let record = CompletionRecord {
            session_id: self.state.session_id,
            score,
            archetype: bucket.archetype,
            title: bucket.title.clone(),
            unlocked: bucket.unlocked,
            answers: self.state.answers.clone(),
            fired_milestones: self.state.fired_milestones.iter().copied().collect(),
            completed_at: Utc::now(),
        };

        self.state.phase = Phase::Result;
        self.state.pending_milestone = None;
        self.state.result = Some(QuizResult::new(score, bucket, &self.state.answers));
        self.sink.on_complete(&record);

        Event::QuizCompleted {
            session_id: record.session_id,
            score,
            archetype: record.archetype,
            title: record.title,
            unlocked: record.unlocked,
            at: record.completed_at,
        }
    }

    fn question_presented(&self) -> Event {
        let index = self.state.current_question_index;
        let question = self.tables.bank.get(index);
        Event::QuestionPresented {
            question_index: index,
            question_id: question.map(|q| q.id.clone()).unwrap_or_default(),
            headline: question.map(|q| q.headline.clone()).unwrap_or_default(),
            progress_pct: self.progress_percent(),
            at: Utc::now(),
        }
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.state.answers.len(),
            self.state.current_question_index,
            "recorded answers must match the question index"
        );
    }
}
