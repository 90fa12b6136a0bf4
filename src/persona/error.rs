//! Failure values carried inside [`PersonaAnalysisResult`](super::PersonaAnalysisResult).
//!
//! Orchestrator failures are never returned as `Err`: they travel in the
//! result's `error` field so a fan-out can keep going and callers can tell
//! "user abandoned" apart from "service failed".
//!
//! # Categories
//!
//! - Local validation (unknown persona, integration disabled, empty text)
//! - Cancellation (in-flight cancel, queued task removed)
//! - Backend failures (network, HTTP status, invalid response)

use serde::{Serialize, Serializer};
use std::fmt;

use crate::llm::CompletionError;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisFailure {
    /// No persona with this id is registered.
    PersonaNotFound {
        /// The id that was requested
        persona_id: String,
    },

    /// The completion integration is switched off.
    Disabled,

    /// Nothing to analyze after trimming.
    EmptyText,

    /// The running analysis was cancelled, or the queue was cleared.
    Cancelled,

    /// This queued task was removed before it started.
    QueuedTaskRemoved,

    /// The backend failed on one of the chunks.
    Backend {
        /// 1-based part number, present when the text was chunked
        part: Option<usize>,
        /// Backend error message
        message: String,
    },
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisFailure::PersonaNotFound { persona_id } => {
                write!(f, "Persona '{}' not found", persona_id)
            }
            AnalysisFailure::Disabled => write!(f, "Ollama is disabled in settings"),
            AnalysisFailure::EmptyText => write!(f, "No text to analyze"),
            AnalysisFailure::Cancelled => write!(f, "Analysis cancelled by user"),
            AnalysisFailure::QueuedTaskRemoved => write!(f, "Queued task removed by user"),
            AnalysisFailure::Backend {
                part: Some(part),
                message,
            } => write!(f, "Part {} failed: {}", part, message),
            AnalysisFailure::Backend {
                part: None,
                message,
            } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AnalysisFailure {}

impl Serialize for AnalysisFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl AnalysisFailure {
    /// Map a backend error for the given chunk (`part` is 1-based; `None` for single-chunk runs).
    pub fn from_completion_error(part: Option<usize>, error: &CompletionError) -> Self {
        match error {
            CompletionError::Cancelled => AnalysisFailure::Cancelled,
            CompletionError::Disabled => AnalysisFailure::Disabled,
            other => AnalysisFailure::Backend {
                part,
                message: other.to_string(),
            },
        }
    }

    /// Whether the user abandoned the work (as opposed to it failing).
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            AnalysisFailure::Cancelled | AnalysisFailure::QueuedTaskRemoved
        )
    }

    /// Whether the failure was detected locally, without any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AnalysisFailure::PersonaNotFound { .. }
                | AnalysisFailure::Disabled
                | AnalysisFailure::EmptyText
        )
    }
}
