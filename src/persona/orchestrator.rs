//! Single-flight persona analysis with a FIFO wait queue.
//!
//! At most one analysis talks to the completion backend at a time. The
//! state lives in a mutex-guarded slot: either idle, or running one task
//! with its cancel token and progress. A caller that finds the slot taken
//! either gets [`AnalysisOutcome::Busy`] back or parks on a channel in the
//! wait queue. The finishing task hands the slot directly to the queue head
//! under the lock, so "check busy" and "set busy" can never race.
//!
//! Each completion call runs on its own worker thread. The caller polls the
//! worker's channel and checks its cancel token between polls, so a
//! cancellation returns promptly even when the HTTP request cannot be
//! interrupted.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::chunk::{
    build_system_prompt, build_user_prompt, combine_parts, split_into_chunks, DEFAULT_CHUNK_SIZE,
};
use super::{AnalysisFailure, CatalogError, Persona, PersonaAnalysisResult, PersonaCatalog};
use crate::language::{Language, LanguageSetting};
use crate::llm::{CancelToken, CompletionBackend};

/// Characters from the end of the text sent for quick feedback.
const QUICK_FEEDBACK_CHARS: usize = 5_000;

const QUICK_TEMPLATE: &str = include_str!("prompts/quick.txt");

/// Progress callback: status message and percentage (0-100).
pub type ProgressFn<'a> = &'a dyn Fn(&str, u8);

/// Fan-out callback: 1-based persona index, persona count, persona name.
pub type FanOutProgressFn<'a> = &'a dyn Fn(usize, usize, &str);

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    /// Chunk budget in characters.
    pub chunk_size: usize,
    /// Default output language; `Auto` leaves the persona prompt untouched.
    pub output_language: LanguageSetting,
    /// How often a waiting caller checks its cancel token.
    pub poll_interval: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_language: LanguageSetting::Auto,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// One analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub persona_id: String,
    pub text: String,
    /// Output language override; `None` uses the orchestrator default.
    pub language: Option<LanguageSetting>,
    /// Queue behind a running task instead of returning `Busy`.
    pub wait_if_busy: bool,
}

impl AnalysisRequest {
    pub fn new(persona_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            text: text.into(),
            language: None,
            wait_if_busy: false,
        }
    }

    pub fn language(mut self, language: LanguageSetting) -> Self {
        self.language = Some(language);
        self
    }

    pub fn wait_if_busy(mut self, wait: bool) -> Self {
        self.wait_if_busy = wait;
        self
    }
}

/// What `analyze_text` hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(PersonaAnalysisResult),
    /// Another task holds the slot and the caller chose not to wait.
    Busy { persona_name: String },
}

impl AnalysisOutcome {
    pub fn is_busy(&self) -> bool {
        matches!(self, AnalysisOutcome::Busy { .. })
    }

    pub fn into_result(self) -> Option<PersonaAnalysisResult> {
        match self {
            AnalysisOutcome::Completed(result) => Some(result),
            AnalysisOutcome::Busy { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestratorStatus {
    pub is_busy: bool,
    pub task_name: Option<String>,
    pub progress_percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueuedTaskInfo {
    pub index: usize,
    pub persona_name: String,
}

/// Results of running every enabled persona.
#[derive(Debug, Clone, Default)]
pub struct FanOutReport {
    /// Finished results, in persona order. Never includes the cancelled one.
    pub results: Vec<PersonaAnalysisResult>,
    /// True when the run stopped early because of a cancellation.
    pub cancelled: bool,
}

/// Handle given to the task that owns the slot.
struct Ticket {
    id: u64,
    cancel: CancelToken,
    progress: Arc<AtomicU8>,
}

struct RunningTask {
    id: u64,
    persona_name: String,
    cancel: CancelToken,
    progress: Arc<AtomicU8>,
}

enum Grant {
    Run(Ticket),
    Abandoned(AnalysisFailure),
}

struct QueuedTask {
    persona_name: String,
    grant: mpsc::Sender<Grant>,
}

#[derive(Default)]
struct Slot {
    next_task_id: u64,
    running: Option<RunningTask>,
    queue: VecDeque<QueuedTask>,
    /// Bumped by every `cancel_analysis`, lets fan-outs notice cancellation
    /// that happened between two personas.
    cancel_epoch: u64,
}

impl Slot {
    fn start(&mut self, persona_name: &str) -> Ticket {
        self.next_task_id += 1;
        let cancel = CancelToken::new();
        let progress = Arc::new(AtomicU8::new(0));
        self.running = Some(RunningTask {
            id: self.next_task_id,
            persona_name: persona_name.to_string(),
            cancel: cancel.clone(),
            progress: Arc::clone(&progress),
        });
        Ticket {
            id: self.next_task_id,
            cancel,
            progress,
        }
    }
}

enum Acquire {
    Granted(Ticket),
    Busy,
    Abandoned(AnalysisFailure),
}

/// Releases the slot when the owning task ends, however it ends.
struct SlotGuard<'a> {
    orchestrator: &'a PersonaOrchestrator,
    id: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.release(self.id);
    }
}

pub struct PersonaOrchestrator {
    backend: Arc<dyn CompletionBackend>,
    catalog: RwLock<PersonaCatalog>,
    settings: OrchestratorSettings,
    slot: Mutex<Slot>,
}

impl PersonaOrchestrator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        catalog: PersonaCatalog,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            backend,
            catalog: RwLock::new(catalog),
            settings,
            slot: Mutex::new(Slot::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------

    /// Enabled personas.
    pub fn list_personas(&self) -> Vec<Persona> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog.list_personas().into_iter().cloned().collect()
    }

    pub fn list_all_personas(&self) -> Vec<Persona> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog.list_all_personas().to_vec()
    }

    pub fn get_persona(&self, id: &str) -> Option<Persona> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog.get_persona(id).cloned()
    }

    pub fn register_custom_persona(&self, persona: Persona) -> Result<(), CatalogError> {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        catalog.register_custom_persona(persona)
    }

    pub fn set_enabled_personas(&self, ids: Vec<String>) {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        catalog.set_enabled_personas(ids);
    }

    // ------------------------------------------------------------
    // Status
    // ------------------------------------------------------------

    pub fn status(&self) -> OrchestratorStatus {
        let slot = self.lock();
        match &slot.running {
            Some(task) => OrchestratorStatus {
                is_busy: true,
                task_name: Some(task.persona_name.clone()),
                progress_percent: task.progress.load(Ordering::SeqCst),
            },
            None => OrchestratorStatus {
                is_busy: false,
                task_name: None,
                progress_percent: 0,
            },
        }
    }

    pub fn queue(&self) -> Vec<QueuedTaskInfo> {
        self.lock()
            .queue
            .iter()
            .enumerate()
            .map(|(index, task)| QueuedTaskInfo {
                index,
                persona_name: task.persona_name.clone(),
            })
            .collect()
    }

    // ------------------------------------------------------------
    // Cancellation
    // ------------------------------------------------------------

    /// Abandon the running task and everything queued behind it.
    ///
    /// The running caller stops waiting and receives `Cancelled`; every
    /// queued caller receives `Cancelled` too. The slot is idle afterwards.
    pub fn cancel_analysis(&self) {
        let mut slot = self.lock();
        slot.cancel_epoch += 1;
        if let Some(task) = slot.running.take() {
            info!(persona = %task.persona_name, "Cancelling analysis");
            task.cancel.cancel();
        }
        for task in slot.queue.drain(..) {
            // A dropped receiver means the caller already gave up
            let _ = task.grant.send(Grant::Abandoned(AnalysisFailure::Cancelled));
        }
    }

    /// Remove one queued task. Returns false when `index` is out of range.
    pub fn cancel_queued_task(&self, index: usize) -> bool {
        let mut slot = self.lock();
        match slot.queue.remove(index) {
            Some(task) => {
                debug!(persona = %task.persona_name, index, "Removing queued task");
                let _ = task
                    .grant
                    .send(Grant::Abandoned(AnalysisFailure::QueuedTaskRemoved));
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------
    // Slot handling
    // ------------------------------------------------------------

    /// Take the slot, or queue for it when `wait` is set.
    ///
    /// With `epoch`, a `cancel_analysis` since that epoch abandons the
    /// request. The comparison happens under the same lock that starts it.
    fn acquire(&self, persona_name: &str, wait: bool, epoch: Option<u64>) -> Acquire {
        let receiver = {
            let mut slot = self.lock();
            if epoch.map_or(false, |epoch| epoch != slot.cancel_epoch) {
                return Acquire::Abandoned(AnalysisFailure::Cancelled);
            }
            if slot.running.is_none() {
                return Acquire::Granted(slot.start(persona_name));
            }
            if !wait {
                return Acquire::Busy;
            }
            let (sender, receiver) = mpsc::channel();
            slot.queue.push_back(QueuedTask {
                persona_name: persona_name.to_string(),
                grant: sender,
            });
            debug!(persona = %persona_name, position = slot.queue.len(), "Queued analysis");
            receiver
        };

        match receiver.recv() {
            Ok(Grant::Run(ticket)) => Acquire::Granted(ticket),
            Ok(Grant::Abandoned(failure)) => Acquire::Abandoned(failure),
            Err(_) => Acquire::Abandoned(AnalysisFailure::Cancelled),
        }
    }

    /// Free the slot if `id` still owns it and hand it to the next live waiter.
    fn release(&self, id: u64) {
        let mut slot = self.lock();
        if slot.running.as_ref().map(|task| task.id) != Some(id) {
            return;
        }
        slot.running = None;
        while let Some(next) = slot.queue.pop_front() {
            let ticket = slot.start(&next.persona_name);
            if next.grant.send(Grant::Run(ticket)).is_ok() {
                break;
            }
            slot.running = None;
        }
    }

    // ------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------

    /// Run one persona over the request text.
    ///
    /// Failures come back inside the result, never as a panic or `Err`.
    pub fn analyze_text(
        &self,
        request: AnalysisRequest,
        on_progress: Option<ProgressFn<'_>>,
    ) -> AnalysisOutcome {
        self.run_analysis(request, on_progress, None)
    }

    fn run_analysis(
        &self,
        request: AnalysisRequest,
        on_progress: Option<ProgressFn<'_>>,
        epoch: Option<u64>,
    ) -> AnalysisOutcome {
        let persona = match self.get_persona(&request.persona_id) {
            Some(persona) => persona,
            None => {
                return AnalysisOutcome::Completed(PersonaAnalysisResult::failure(
                    request.persona_id.clone(),
                    "Unknown",
                    AnalysisFailure::PersonaNotFound {
                        persona_id: request.persona_id,
                    },
                ))
            }
        };
        if !self.backend.is_enabled() {
            return AnalysisOutcome::Completed(PersonaAnalysisResult::failure(
                &persona.id,
                &persona.name,
                AnalysisFailure::Disabled,
            ));
        }
        if request.text.trim().is_empty() {
            return AnalysisOutcome::Completed(PersonaAnalysisResult::failure(
                &persona.id,
                &persona.name,
                AnalysisFailure::EmptyText,
            ));
        }

        let ticket = match self.acquire(&persona.name, request.wait_if_busy, epoch) {
            Acquire::Granted(ticket) => ticket,
            Acquire::Busy => {
                return AnalysisOutcome::Busy {
                    persona_name: persona.name,
                }
            }
            Acquire::Abandoned(failure) => {
                return AnalysisOutcome::Completed(PersonaAnalysisResult::failure(
                    &persona.id,
                    &persona.name,
                    failure,
                ))
            }
        };
        let _guard = SlotGuard {
            orchestrator: self,
            id: ticket.id,
        };

        let language = self.output_language(request.language);
        info!(
            persona = %persona.id,
            backend = self.backend.name(),
            chars = request.text.chars().count(),
            "Starting analysis"
        );

        let result = match self.run_chunks(&ticket, &persona, &request.text, language, on_progress)
        {
            Ok(analysis) => PersonaAnalysisResult::success(&persona, analysis),
            Err(failure) => {
                if failure.is_cancelled() {
                    info!(persona = %persona.id, "Analysis cancelled");
                } else {
                    warn!(persona = %persona.id, error = %failure, "Analysis failed");
                }
                PersonaAnalysisResult::failure(&persona.id, &persona.name, failure)
            }
        };
        AnalysisOutcome::Completed(result)
    }

    /// Run every enabled persona in turn, waiting for the slot each time.
    ///
    /// A cancellation stops the remaining personas; results gathered so far
    /// are kept.
    pub fn analyze_all(
        &self,
        text: &str,
        language: Option<LanguageSetting>,
        on_persona: Option<FanOutProgressFn<'_>>,
    ) -> FanOutReport {
        let personas = self.list_personas();
        let total = personas.len();
        let epoch = self.lock().cancel_epoch;
        let mut report = FanOutReport::default();

        for (i, persona) in personas.iter().enumerate() {
            if self.lock().cancel_epoch != epoch {
                report.cancelled = true;
                break;
            }
            if let Some(callback) = on_persona {
                callback(i + 1, total, &persona.name);
            }

            let mut request = AnalysisRequest::new(&persona.id, text).wait_if_busy(true);
            request.language = language;
            match self.run_analysis(request, None, Some(epoch)) {
                AnalysisOutcome::Completed(result) if result.is_cancelled() => {
                    report.cancelled = true;
                    break;
                }
                AnalysisOutcome::Completed(result) => report.results.push(result),
                AnalysisOutcome::Busy { .. } => continue,
            }
        }

        debug!(
            finished = report.results.len(),
            total,
            cancelled = report.cancelled,
            "Fan-out done"
        );
        report
    }

    /// Short "3 focal points" feedback over the end of the text.
    ///
    /// Returns `None` instead of waiting when the slot is taken, and on any
    /// failure.
    pub fn quick_feedback(
        &self,
        persona_id: &str,
        text: &str,
        language: Option<LanguageSetting>,
    ) -> Option<String> {
        let persona = self.get_persona(persona_id)?;
        if !self.backend.is_enabled() || text.trim().is_empty() {
            return None;
        }
        let ticket = match self.acquire(&persona.name, false, None) {
            Acquire::Granted(ticket) => ticket,
            Acquire::Busy | Acquire::Abandoned(_) => return None,
        };
        let _guard = SlotGuard {
            orchestrator: self,
            id: ticket.id,
        };

        let char_count = text.chars().count();
        let tail: String = text
            .chars()
            .skip(char_count.saturating_sub(QUICK_FEEDBACK_CHARS))
            .collect();
        let prompt = QUICK_TEMPLATE.replace("{text}", &tail);
        let system = build_system_prompt(&persona.system_prompt, self.output_language(language));

        match self.complete(&ticket, prompt, system, None) {
            Ok(feedback) => Some(feedback),
            Err(failure) => {
                debug!(persona = %persona.id, error = %failure, "Quick feedback failed");
                None
            }
        }
    }

    fn output_language(&self, requested: Option<LanguageSetting>) -> Option<Language> {
        match requested.unwrap_or(self.settings.output_language) {
            LanguageSetting::Auto => None,
            LanguageSetting::Fixed(lang) => Some(lang),
        }
    }

    fn run_chunks(
        &self,
        ticket: &Ticket,
        persona: &Persona,
        text: &str,
        language: Option<Language>,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<String, AnalysisFailure> {
        let report = |message: &str, percent: u8| {
            ticket.progress.store(percent, Ordering::SeqCst);
            if let Some(callback) = on_progress {
                callback(message, percent);
            }
        };

        report("Initializing analysis...", 0);
        let chunks = split_into_chunks(text, self.settings.chunk_size);
        let total = chunks.len();
        let system = build_system_prompt(&persona.system_prompt, language);
        let mut parts = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            let percent = ((i as f64 / total as f64) * 100.0).round() as u8;
            report(&format!("Analyzing part {} of {}...", i + 1, total), percent);

            let part = (total > 1).then_some(i + 1);
            let prompt = build_user_prompt(chunk, i + 1, total);
            parts.push(self.complete(ticket, prompt, system.clone(), part)?);
        }

        report("Finalizing...", 100);
        Ok(combine_parts(&parts))
    }

    /// One completion on a worker thread, abandoned as soon as the ticket is cancelled.
    fn complete(
        &self,
        ticket: &Ticket,
        prompt: String,
        system: String,
        part: Option<usize>,
    ) -> Result<String, AnalysisFailure> {
        if ticket.cancel.is_cancelled() {
            return Err(AnalysisFailure::Cancelled);
        }

        let (sender, receiver) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        let cancel = ticket.cancel.clone();
        thread::Builder::new()
            .name("smartwrite-completion".to_string())
            .spawn(move || {
                let _ = sender.send(backend.complete(&prompt, &system, &cancel));
            })
            .map_err(|e| AnalysisFailure::Backend {
                part,
                message: format!("Failed to start completion worker: {}", e),
            })?;

        loop {
            if ticket.cancel.is_cancelled() {
                return Err(AnalysisFailure::Cancelled);
            }
            match receiver.recv_timeout(self.settings.poll_interval) {
                Ok(Ok(answer)) => return Ok(answer),
                Ok(Err(error)) => return Err(AnalysisFailure::from_completion_error(part, &error)),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(AnalysisFailure::Backend {
                        part,
                        message: "Completion worker stopped unexpectedly".to_string(),
                    })
                }
            }
        }
    }
}
