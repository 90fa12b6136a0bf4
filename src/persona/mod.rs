//! Persona-based LLM review.
//!
//! A [`Persona`] is a named system prompt. The [`PersonaOrchestrator`] runs
//! one persona at a time against a completion backend, chunking long texts,
//! queueing waiting callers in FIFO order and supporting cancellation.
//!
//! # Module Structure
//!
//! - [`library`] - the built-in persona table
//! - [`catalog`] - registry of built-in and custom personas
//! - [`chunk`] - text chunking and prompt framing
//! - [`orchestrator`] - single-flight execution, queue and fan-out
//! - [`report`] - markdown rendering of results
//! - [`error`] - failure values carried in results

pub mod catalog;
pub mod chunk;
pub mod error;
pub mod library;
pub mod orchestrator;
pub mod report;

pub use catalog::{CatalogError, PersonaCatalog};
pub use error::AnalysisFailure;
pub use orchestrator::{
    AnalysisOutcome, AnalysisRequest, FanOutReport, OrchestratorSettings, OrchestratorStatus,
    PersonaOrchestrator, QueuedTaskInfo,
};

use serde::{Deserialize, Serialize};

/// Longest accepted persona id.
const MAX_ID_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub system_prompt: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    "🤖".to_string()
}

impl Persona {
    /// Check the fields a custom persona must get right.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() || self.id.len() > MAX_ID_LENGTH {
            return Err(format!(
                "persona id must be 1-{} characters, got '{}'",
                MAX_ID_LENGTH, self.id
            ));
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(format!(
                "persona id '{}' may only contain lowercase letters, digits and '-'",
                self.id
            ));
        }
        if self.name.trim().is_empty() {
            return Err(format!("persona '{}' needs a name", self.id));
        }
        if self.system_prompt.trim().is_empty() {
            return Err(format!("persona '{}' needs a system prompt", self.id));
        }
        Ok(())
    }
}

/// Outcome of one persona review. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaAnalysisResult {
    pub persona_id: String,
    pub persona_name: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AnalysisFailure>,
}

impl PersonaAnalysisResult {
    pub fn success(persona: &Persona, analysis: String) -> Self {
        Self {
            persona_id: persona.id.clone(),
            persona_name: persona.name.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            analysis,
            error: None,
        }
    }

    pub fn failure(
        persona_id: impl Into<String>,
        persona_name: impl Into<String>,
        error: AnalysisFailure,
    ) -> Self {
        Self {
            persona_id: persona_id.into(),
            persona_name: persona_name.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            analysis: String::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_cancelled(&self) -> bool {
        self.error.as_ref().is_some_and(AnalysisFailure::is_cancelled)
    }
}
