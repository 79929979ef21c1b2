//! Core error types for portalquiz-core.
//!
//! Two families matter to callers:
//!
//! - [`ConfigError`]: malformed static tables or an unreadable config file.
//!   Raised once at startup and never from a transition.
//! - [`TransitionError`]: an operation the flow controller rejected. The
//!   session state is left untouched, so the caller may retry.

use std::path::PathBuf;
use thiserror::Error;

use crate::quiz::Phase;

/// Core error type for portalquiz-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration or static table errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected flow transitions
    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
///
/// Table validation failures land here as well as file handling failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The question bank has no questions
    #[error("Question bank is empty")]
    EmptyQuestionBank,

    /// Two questions share an id
    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(String),

    /// A question offers nothing to pick
    #[error("Question '{question_id}' has no options")]
    EmptyOptions { question_id: String },

    /// The archetype table has no buckets
    #[error("Archetype table is empty")]
    EmptyArchetypeTable,

    /// Buckets leave a score uncovered
    #[error("Archetype table gap: expected a bucket starting at {expected}, found {found}")]
    ArchetypeGap { expected: u32, found: u32 },

    /// Buckets cover a score twice
    #[error("Archetype table overlap: bucket starting at {found} overlaps scores up to {previous_max}")]
    ArchetypeOverlap { previous_max: u32, found: u32 },

    /// A bucket whose upper bound lies below its lower bound
    #[error("Archetype bucket [{min}, {max}] is inverted")]
    InvertedBucket { min: u32, max: u32 },

    /// Only the top bucket may be open-ended
    #[error("Archetype bucket starting at {min} is unbounded but is not the last bucket")]
    UnboundedBucketNotLast { min: u32 },

    /// The top bucket must be open-ended
    #[error("Top archetype bucket ends at {max}; it must be unbounded")]
    BoundedTopBucket { max: u32 },

    /// Milestone threshold outside (0, 100]
    #[error("Milestone threshold {threshold}% is outside (0, 100]")]
    ThresholdOutOfRange { threshold: u32 },

    /// Milestone thresholds must be strictly ascending
    #[error("Milestone threshold {threshold}% does not follow {previous}% in ascending order")]
    ThresholdNotAscending { previous: u32, threshold: u32 },

    /// No bucket contains the score
    #[error("No archetype bucket contains score {score}")]
    Unclassified { score: u32 },

    /// Failed to determine or create the data directory
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Transition errors.
///
/// Returned before any mutation happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Operation not valid in the current phase
    #[error("cannot {operation} during the {phase} phase")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// The option is not one of the current question's options
    #[error("option '{label}' ({points} points) does not belong to question '{question_id}'")]
    ForeignOption {
        question_id: String,
        label: String,
        points: u32,
    },

    /// Option index past the end of the current question's options
    #[error("option {index} out of range for question '{question_id}' ({len} options)")]
    OptionOutOfRange {
        question_id: String,
        index: usize,
        len: usize,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_names_phase() {
        let err = TransitionError::WrongPhase {
            operation: "submit an answer",
            phase: Phase::Milestone,
        };
        assert_eq!(
            err.to_string(),
            "cannot submit an answer during the milestone phase"
        );
    }

    #[test]
    fn core_error_wraps_io_and_json() {
        let io: CoreError = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed").into();
        assert!(matches!(io, CoreError::Io(_)));
        assert_eq!(io.to_string(), "IO error: closed");

        let json: CoreError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(json, CoreError::Json(_)));
    }

    #[test]
    fn core_error_wraps_config_error() {
        let err: CoreError = ConfigError::DuplicateQuestionId("fog".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Duplicate question id: fog"
        );
    }
}
