//! Unit tests for the persona orchestrator

use std::cell::RefCell;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use smartwrite::persona::{
    AnalysisFailure, AnalysisOutcome, AnalysisRequest, OrchestratorSettings, Persona,
    PersonaCatalog, PersonaOrchestrator,
};
use smartwrite::{Language, LanguageSetting};

use super::helpers::{wait_until, MockBackend};

fn settings() -> OrchestratorSettings {
    OrchestratorSettings {
        poll_interval: Duration::from_millis(10),
        ..OrchestratorSettings::default()
    }
}

fn orchestrator(backend: &Arc<MockBackend>) -> Arc<PersonaOrchestrator> {
    Arc::new(PersonaOrchestrator::new(
        Arc::clone(backend) as _,
        PersonaCatalog::default(),
        settings(),
    ))
}

fn name_of(orchestrator: &PersonaOrchestrator, id: &str) -> String {
    orchestrator.get_persona(id).unwrap().name
}

fn spawn_analysis(
    orchestrator: &Arc<PersonaOrchestrator>,
    request: AnalysisRequest,
) -> thread::JoinHandle<AnalysisOutcome> {
    let orchestrator = Arc::clone(orchestrator);
    thread::spawn(move || orchestrator.analyze_text(request, None))
}

fn completed(outcome: AnalysisOutcome) -> smartwrite::PersonaAnalysisResult {
    outcome.into_result().expect("expected a completed outcome")
}

// ============================================================================
// Single-flight
// ============================================================================

#[test]
fn second_request_while_busy_returns_busy_without_calling_backend() {
    let backend = Arc::new(MockBackend::blocking());
    let orch = orchestrator(&backend);

    let first = spawn_analysis(&orch, AnalysisRequest::new("critical-editor", "Some text."));
    backend.wait_for_calls(1);

    let status = orch.status();
    assert!(status.is_busy);
    assert_eq!(status.task_name, Some(name_of(&orch, "critical-editor")));

    let second = orch.analyze_text(AnalysisRequest::new("common-reader", "Other text."), None);
    assert_eq!(
        second,
        AnalysisOutcome::Busy {
            persona_name: name_of(&orch, "common-reader")
        }
    );
    assert_eq!(backend.call_count(), 1);

    backend.release();
    let result = completed(first.join().unwrap());
    assert!(result.is_success());
    assert_eq!(result.analysis, "reply 1");
    assert!(!orch.status().is_busy);
}

#[test]
fn queued_requests_run_in_fifo_order_one_at_a_time() {
    let backend = Arc::new(MockBackend::blocking());
    let orch = orchestrator(&backend);

    let first = spawn_analysis(&orch, AnalysisRequest::new("critical-editor", "One."));
    backend.wait_for_calls(1);
    let second = spawn_analysis(
        &orch,
        AnalysisRequest::new("common-reader", "Two.").wait_if_busy(true),
    );
    wait_until(|| orch.queue().len() == 1);
    let third = spawn_analysis(
        &orch,
        AnalysisRequest::new("technical-reviewer", "Three.").wait_if_busy(true),
    );
    wait_until(|| orch.queue().len() == 2);

    let queue = orch.queue();
    assert_eq!(queue[0].index, 0);
    assert_eq!(queue[0].persona_name, name_of(&orch, "common-reader"));
    assert_eq!(queue[1].persona_name, name_of(&orch, "technical-reviewer"));

    backend.release();
    assert!(completed(first.join().unwrap()).is_success());
    assert!(completed(second.join().unwrap()).is_success());
    assert!(completed(third.join().unwrap()).is_success());

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[1].prompt.contains("Two."));
    assert!(calls[2].prompt.contains("Three."));
    assert_eq!(backend.max_concurrent(), 1);
    assert!(orch.queue().is_empty());
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn cancel_stops_running_task_and_drains_queue() {
    let backend = Arc::new(MockBackend::blocking());
    let orch = orchestrator(&backend);

    let running = spawn_analysis(&orch, AnalysisRequest::new("critical-editor", "Text."));
    backend.wait_for_calls(1);
    let queued = spawn_analysis(
        &orch,
        AnalysisRequest::new("common-reader", "Text.").wait_if_busy(true),
    );
    wait_until(|| orch.queue().len() == 1);

    orch.cancel_analysis();

    let running = completed(running.join().unwrap());
    assert_eq!(running.error, Some(AnalysisFailure::Cancelled));
    assert!(running.analysis.is_empty());
    let queued = completed(queued.join().unwrap());
    assert_eq!(queued.error, Some(AnalysisFailure::Cancelled));

    assert!(!orch.status().is_busy);
    assert!(orch.queue().is_empty());
    assert_eq!(backend.call_count(), 1);
}

#[test]
fn cancel_when_idle_is_harmless() {
    let backend = Arc::new(MockBackend::new());
    let orch = orchestrator(&backend);
    orch.cancel_analysis();

    let result = completed(orch.analyze_text(AnalysisRequest::new("critical-editor", "Hi."), None));
    assert!(result.is_success());
}

#[test]
fn removing_a_queued_task_resolves_it_without_running() {
    let backend = Arc::new(MockBackend::blocking());
    let orch = orchestrator(&backend);

    let running = spawn_analysis(&orch, AnalysisRequest::new("critical-editor", "Text."));
    backend.wait_for_calls(1);
    let queued = spawn_analysis(
        &orch,
        AnalysisRequest::new("common-reader", "Text.").wait_if_busy(true),
    );
    wait_until(|| orch.queue().len() == 1);

    assert!(!orch.cancel_queued_task(5));
    assert!(orch.cancel_queued_task(0));

    let queued = completed(queued.join().unwrap());
    assert_eq!(queued.error, Some(AnalysisFailure::QueuedTaskRemoved));
    assert!(queued.is_cancelled());

    backend.release();
    assert!(completed(running.join().unwrap()).is_success());
    assert_eq!(backend.call_count(), 1);
}

// ============================================================================
// Local validation
// ============================================================================

#[test]
fn local_failures_never_reach_the_backend() {
    let backend = Arc::new(MockBackend::new());
    let orch = orchestrator(&backend);

    let unknown = completed(orch.analyze_text(AnalysisRequest::new("nobody", "Text."), None));
    assert_eq!(
        unknown.error,
        Some(AnalysisFailure::PersonaNotFound {
            persona_id: "nobody".to_string()
        })
    );

    let empty = completed(orch.analyze_text(AnalysisRequest::new("critical-editor", "  \n "), None));
    assert_eq!(empty.error, Some(AnalysisFailure::EmptyText));
    assert!(empty.error.unwrap().is_local());

    assert_eq!(backend.call_count(), 0);
    assert!(!orch.status().is_busy);
}

#[test]
fn disabled_backend_is_reported() {
    let backend = Arc::new(MockBackend::disabled());
    let orch = orchestrator(&backend);

    let result = completed(orch.analyze_text(AnalysisRequest::new("critical-editor", "Text."), None));
    assert_eq!(result.error, Some(AnalysisFailure::Disabled));
    assert_eq!(backend.call_count(), 0);
}

// ============================================================================
// Chunking
// ============================================================================

#[test]
fn long_text_is_sent_in_labelled_parts() {
    let backend = Arc::new(MockBackend::new());
    let orch = orchestrator(&backend);
    let progress = RefCell::new(Vec::new());
    let on_progress = |message: &str, percent: u8| {
        progress.borrow_mut().push((message.to_string(), percent));
    };

    let text = "a".repeat(30_000);
    let result = completed(orch.analyze_text(
        AnalysisRequest::new("critical-editor", text),
        Some(&on_progress),
    ));

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    for (i, call) in calls.iter().enumerate() {
        assert!(call.prompt.starts_with(&format!("[PART {}/3]", i + 1)));
    }
    assert!(result
        .analysis
        .starts_with("**Note:** This text was analyzed in 3 parts."));
    assert!(result.analysis.contains("### Part 3 analysis\nreply 3"));

    let progress = progress.into_inner();
    let percents: Vec<u8> = progress.iter().map(|(_, p)| *p).collect();
    assert_eq!(percents, vec![0, 0, 33, 67, 100]);
    assert_eq!(progress[0].0, "Initializing analysis...");
    assert_eq!(progress[2].0, "Analyzing part 2 of 3...");
    assert_eq!(progress[4].0, "Finalizing...");
}

#[test]
fn short_text_is_sent_without_part_label() {
    let backend = Arc::new(MockBackend::new());
    let orch = orchestrator(&backend);

    let result = completed(orch.analyze_text(AnalysisRequest::new("critical-editor", "Short."), None));
    assert_eq!(result.analysis, "reply 1");
    let calls = backend.calls();
    assert!(calls[0].prompt.starts_with("Please analyze the following text:"));
    assert!(!calls[0].prompt.contains("[PART"));
}

#[test]
fn backend_failure_names_the_part() {
    let backend = Arc::new(MockBackend::new().fail_on_call(2));
    let orch = orchestrator(&backend);

    let result = completed(orch.analyze_text(
        AnalysisRequest::new("critical-editor", "b".repeat(30_000)),
        None,
    ));
    assert_eq!(
        result.error,
        Some(AnalysisFailure::Backend {
            part: Some(2),
            message: "Network error: connection refused".to_string()
        })
    );
    assert_eq!(backend.call_count(), 2);
    assert!(!orch.status().is_busy);
}

// ============================================================================
// Output language
// ============================================================================

#[test]
fn output_language_is_appended_to_system_prompt() {
    let backend = Arc::new(MockBackend::new());
    let orch = Arc::new(PersonaOrchestrator::new(
        Arc::clone(&backend) as _,
        PersonaCatalog::default(),
        OrchestratorSettings {
            output_language: LanguageSetting::Fixed(Language::Portuguese),
            ..settings()
        },
    ));
    let persona_prompt = orch.get_persona("critical-editor").unwrap().system_prompt;

    completed(orch.analyze_text(AnalysisRequest::new("critical-editor", "Text."), None));
    completed(orch.analyze_text(
        AnalysisRequest::new("critical-editor", "Text.").language(LanguageSetting::Auto),
        None,
    ));

    let calls = backend.calls();
    assert!(calls[0].system.starts_with(&persona_prompt));
    assert!(calls[0]
        .system
        .contains("you MUST write your response in Portuguese (Brazil)"));
    assert_eq!(calls[1].system, persona_prompt);
}

// ============================================================================
// Fan-out
// ============================================================================

#[test]
fn analyze_all_runs_enabled_personas_in_order() {
    let backend = Arc::new(MockBackend::new());
    let catalog = PersonaCatalog::new(
        vec![],
        vec!["common-reader".to_string(), "critical-editor".to_string()],
    );
    let orch = PersonaOrchestrator::new(Arc::clone(&backend) as _, catalog, settings());

    let report = orch.analyze_all("Some text.", None, None);
    assert!(!report.cancelled);
    let ids: Vec<&str> = report.results.iter().map(|r| r.persona_id.as_str()).collect();
    // Catalog order, not the order of the enabled list
    assert_eq!(ids, vec!["critical-editor", "common-reader"]);
    assert_eq!(backend.call_count(), 2);
}

#[test]
fn analyze_all_keeps_finished_results_on_cancel() {
    let backend = Arc::new(MockBackend::new().block_from(2));
    let catalog = PersonaCatalog::new(
        vec![],
        vec![
            "critical-editor".to_string(),
            "common-reader".to_string(),
            "technical-reviewer".to_string(),
        ],
    );
    let orch = Arc::new(PersonaOrchestrator::new(
        Arc::clone(&backend) as _,
        catalog,
        settings(),
    ));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let handle = {
        let orch = Arc::clone(&orch);
        let seen = Arc::clone(&seen);
        thread::spawn(move || {
            let on_persona = |index: usize, total: usize, _name: &str| {
                seen.lock().unwrap().push((index, total));
            };
            orch.analyze_all("Some text.", None, Some(&on_persona))
        })
    };
    backend.wait_for_calls(2);
    orch.cancel_analysis();

    let report = handle.join().unwrap();
    assert!(report.cancelled);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].persona_id, "critical-editor");
    assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3)]);
    assert_eq!(backend.call_count(), 2);
}

#[test]
fn analyze_all_stops_when_cancelled_between_personas() {
    let backend = Arc::new(MockBackend::new());
    let catalog = PersonaCatalog::new(
        vec![],
        vec!["critical-editor".to_string(), "common-reader".to_string()],
    );
    let orch = PersonaOrchestrator::new(Arc::clone(&backend) as _, catalog, settings());

    // The slot is idle here: the first persona finished, the second has not started
    let on_persona = |index: usize, _total: usize, _name: &str| {
        if index == 2 {
            orch.cancel_analysis();
        }
    };
    let report = orch.analyze_all("Some text.", None, Some(&on_persona));

    assert!(report.cancelled);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].persona_id, "critical-editor");
    assert_eq!(backend.call_count(), 1);
    assert!(!orch.status().is_busy);
}

// ============================================================================
// Quick feedback
// ============================================================================

#[test]
fn quick_feedback_uses_the_end_of_the_text() {
    let backend = Arc::new(MockBackend::new());
    let orch = orchestrator(&backend);
    let text = format!("{}{}", "a".repeat(1_000), "b".repeat(5_000));

    let feedback = orch.quick_feedback("critical-editor", &text, None);
    assert_eq!(feedback.as_deref(), Some("reply 1"));

    let calls = backend.calls();
    assert!(calls[0]
        .prompt
        .starts_with("Briefly analyze this text and provide 3 focal points"));
    assert!(calls[0].prompt.contains(&"b".repeat(5_000)));
    assert!(!calls[0].prompt.contains("aa"));
}

#[test]
fn quick_feedback_does_not_wait_for_a_busy_slot() {
    let backend = Arc::new(MockBackend::blocking());
    let orch = orchestrator(&backend);

    let running = spawn_analysis(&orch, AnalysisRequest::new("critical-editor", "Text."));
    backend.wait_for_calls(1);

    assert_eq!(orch.quick_feedback("common-reader", "More text.", None), None);
    assert_eq!(orch.quick_feedback("nobody", "More text.", None), None);
    assert_eq!(backend.call_count(), 1);

    backend.release();
    assert!(completed(running.join().unwrap()).is_success());
}

// ============================================================================
// Catalog
// ============================================================================

#[test]
fn registered_custom_persona_can_be_used() {
    let backend = Arc::new(MockBackend::new());
    let orch = orchestrator(&backend);
    let persona = Persona {
        id: "pirate".to_string(),
        name: "Pirate Editor".to_string(),
        description: String::new(),
        system_prompt: "Answer like a pirate.".to_string(),
        icon: "🏴".to_string(),
    };

    orch.register_custom_persona(persona).unwrap();
    assert!(orch.list_personas().iter().any(|p| p.id == "pirate"));

    let result = completed(orch.analyze_text(AnalysisRequest::new("pirate", "Ahoy."), None));
    assert_eq!(result.persona_name, "Pirate Editor");
    assert_eq!(backend.calls()[0].system, "Answer like a pirate.");
}

#[test]
fn set_enabled_personas_limits_fan_out() {
    let backend = Arc::new(MockBackend::new());
    let orch = orchestrator(&backend);
    orch.set_enabled_personas(vec!["ghostwriter".to_string()]);

    assert_eq!(orch.list_personas().len(), 1);
    assert_eq!(orch.list_all_personas().len(), 20);
    let report = orch.analyze_all("Text.", None, None);
    assert_eq!(report.results.len(), 1);
}
