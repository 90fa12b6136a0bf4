//! Language-model completion backends.
//!
//! [`CompletionBackend`] is the only seam between the persona/translation
//! layers and the network. [`OllamaBackend`] talks to a local Ollama server;
//! tests substitute their own implementations.

mod ollama;

pub use ollama::{OllamaBackend, OllamaSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for completion calls.
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Backend that turns a prompt plus system prompt into text.
///
/// Implementors must be thread-safe: calls run on worker threads.
pub trait CompletionBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Whether the integration is switched on in settings.
    fn is_enabled(&self) -> bool;

    /// Whether the service answers right now.
    fn is_available(&self) -> bool;

    /// Run one completion. Implementations should check `cancel` before
    /// and after any blocking work and return [`CompletionError::Cancelled`].
    fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
        cancel: &CancelToken,
    ) -> CompletionResult<String>;
}

/// Cooperative cancellation flag shared between a caller and its worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Errors from completion backends.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Ollama is disabled in settings")]
    Disabled,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Cancelled)
    }
}
