//! Test helper utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use smartwrite::llm::{CancelToken, CompletionBackend, CompletionError, CompletionResult};

/// How long helpers wait for background work before failing the test.
const WAIT_LIMIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub prompt: String,
    pub system: String,
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    released: bool,
}

/// Scriptable completion backend.
///
/// Answers call `n` (1-based) with `reply n`. Calls numbered from
/// `block_from` onwards wait until [`MockBackend::release`] or cancellation.
pub struct MockBackend {
    enabled: bool,
    block_from: Option<usize>,
    fail_on_call: Option<usize>,
    state: Mutex<MockState>,
    changed: Condvar,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            enabled: true,
            block_from: None,
            fail_on_call: None,
            state: Mutex::new(MockState::default()),
            changed: Condvar::new(),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Every call blocks until released.
    pub fn blocking() -> Self {
        Self::new().block_from(1)
    }

    pub fn block_from(mut self, call: usize) -> Self {
        self.block_from = Some(call);
        self
    }

    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Highest number of calls that were in flight at the same time.
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Let blocked and future calls finish.
    pub fn release(&self) {
        self.state.lock().unwrap().released = true;
        self.changed.notify_all();
    }

    /// Block until at least `n` calls have started.
    pub fn wait_for_calls(&self, n: usize) {
        let deadline = Instant::now() + WAIT_LIMIT;
        let mut state = self.state.lock().unwrap();
        while state.calls.len() < n {
            let now = Instant::now();
            assert!(now < deadline, "timed out waiting for {} calls", n);
            state = self.changed.wait_timeout(state, deadline - now).unwrap().0;
        }
    }
}

impl CompletionBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_available(&self) -> bool {
        self.enabled
    }

    fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
        cancel: &CancelToken,
    ) -> CompletionResult<String> {
        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }
        let n = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call {
                prompt: prompt.to_string(),
                system: system_prompt.to_string(),
            });
            state.calls.len()
        };
        self.changed.notify_all();

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        if self.block_from.is_some_and(|from| n >= from) {
            let mut state = self.state.lock().unwrap();
            while !state.released {
                if cancel.is_cancelled() {
                    self.active.fetch_sub(1, Ordering::SeqCst);
                    return Err(CompletionError::Cancelled);
                }
                state = self
                    .changed
                    .wait_timeout(state, Duration::from_millis(10))
                    .unwrap()
                    .0;
            }
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on_call == Some(n) {
            return Err(CompletionError::Network("connection refused".to_string()));
        }
        Ok(format!("reply {}", n))
    }
}

/// Poll `condition` until it holds, failing the test after a few seconds.
pub fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + WAIT_LIMIT;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for condition");
        std::thread::sleep(Duration::from_millis(5));
    }
}
