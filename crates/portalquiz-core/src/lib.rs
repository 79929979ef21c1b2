//! # Portal Quiz Core Library
//!
//! This library provides the core logic for the Portal Quiz: a sequential
//! questionnaire that scores a respondent, pauses for milestone interludes
//! along the way, and ends on a personalized archetype result. Presentation
//! layers (the CLI in this workspace, or any GUI) drive it and render from
//! its read model; none of them make flow decisions of their own.
//!
//! ## Architecture
//!
//! - **Flow Engine**: A synchronous state machine; each command completes
//!   atomically or is rejected without side effects
//! - **Static Tables**: Question bank, archetype buckets and milestone
//!   thresholds, validated once at startup
//! - **Scoring**: Pure integer scoring and classification
//! - **Sinks**: Receive each completed session exactly once
//!
//! ## Key Components
//!
//! - [`QuizEngine`]: Core flow state machine
//! - [`QuizTables`]: Validated static tables
//! - [`Config`]: Application configuration management
//! - [`CompletionSink`]: Trait for completion consumers

pub mod config;
pub mod error;
pub mod events;
pub mod quiz;
pub mod sink;

pub use config::Config;
pub use error::{ConfigError, CoreError, TransitionError};
pub use events::Event;
pub use quiz::{
    Answer, ArchetypeBucket, ArchetypeKind, ArchetypeTable, CallToAction, FlowState, Milestone,
    MilestoneContent, MilestoneTable, Phase, Question, QuestionBank, QuizEngine, QuizOption,
    QuizResult, QuizTables, QuizView, RitualStep,
};
pub use sink::{CompletionRecord, CompletionSink, NullSink, RecordingSink, TracingSink};
