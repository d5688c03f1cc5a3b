//! Tests for the gate machine.

use super::*;
use crate::state::GateStatus;
use tempfile::TempDir;

/// Creates a test machine with a logger in a temp directory.
fn create_test_machine() -> (GateMachine, watch::Receiver<GateSnapshot>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logs_dir = temp_dir.path().join("logs");
    std::fs::create_dir_all(&logs_dir).expect("Failed to create logs dir");

    let logger =
        Arc::new(StructuredLogger::new("test-session", &logs_dir).expect("Failed to create logger"));

    let project = ProjectGates::new("test-project");
    let (machine, snapshot_rx) = GateMachine::new(project, logger);
    (machine, snapshot_rx, temp_dir)
}

fn step_command(step_id: &str, event: StepEvent) -> GateCommand {
    GateCommand::Step {
        step_id: step_id.to_string(),
        event,
    }
}

#[test]
fn test_work_completed_then_approve_advances() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    // dirty[none] --work_completed--> clean[pending]
    let events = machine
        .apply(step_command("step_0", StepEvent::WorkCompleted))
        .expect("WorkCompleted should succeed");
    assert_eq!(events.len(), 1);
    match &events[0] {
        GateEvent::StatusChanged { step_id, from, to } => {
            assert_eq!(step_id, "step_0");
            assert_eq!(*from, GateStatus::Dirty);
            assert_eq!(*to, GateStatus::Clean);
        }
        other => panic!("Expected StatusChanged event, got {:?}", other),
    }

    // clean[pending] --user_approves--> terminal; frontier advances.
    let events = machine
        .apply(step_command("step_0", StepEvent::UserApproves))
        .expect("UserApproves should succeed");
    assert_eq!(events.len(), 2);
    match &events[0] {
        GateEvent::DecisionRecorded { step_id, decision } => {
            assert_eq!(step_id, "step_0");
            assert_eq!(*decision, ApprovalDecision::Approved);
        }
        other => panic!("Expected DecisionRecorded event, got {:?}", other),
    }
    match &events[1] {
        GateEvent::StepAdvanced { from, to } => {
            assert_eq!(from, "step_0");
            assert_eq!(to, "step_1");
        }
        other => panic!("Expected StepAdvanced event, got {:?}", other),
    }

    let snapshot = snapshot_rx.borrow();
    assert_eq!(snapshot.active_step.as_deref(), Some("step_1"));
    assert_eq!(snapshot.archived, 1);
    assert!(!snapshot.complete);
}

#[test]
fn test_approve_while_dirty_is_rejected() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    let err = machine
        .apply(step_command("step_0", StepEvent::UserApproves))
        .unwrap_err();
    assert!(matches!(err, GateError::InvalidTransition { .. }));

    // State unchanged: still dirty, still on step_0.
    let snapshot = snapshot_rx.borrow();
    assert_eq!(snapshot.active_step.as_deref(), Some("step_0"));
    assert_eq!(snapshot.gates[0].status, GateStatus::Dirty);
    assert_eq!(snapshot.gates[0].decision, None);
}

#[test]
fn test_double_approve_is_rejected() {
    let (mut machine, _snapshot_rx, _temp) = create_test_machine();

    machine
        .apply(step_command("step_0", StepEvent::WorkCompleted))
        .unwrap();
    machine
        .apply(step_command("step_0", StepEvent::UserApproves))
        .unwrap();

    // The approved gate is terminal and retired; a second approval fails and
    // mutates nothing.
    let err = machine
        .apply(step_command("step_0", StepEvent::UserApproves))
        .unwrap_err();
    assert!(matches!(err, GateError::StepNotActive { .. }));

    let archived = machine.project().archived_gate("step_0").unwrap();
    assert_eq!(archived.status, GateStatus::Clean);
    assert_eq!(archived.decision, Some(ApprovalDecision::Approved));
}

#[test]
fn test_reject_returns_to_dirty_without_advancing() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    machine
        .apply(step_command("step_0", StepEvent::WorkCompleted))
        .unwrap();
    let events = machine
        .apply(step_command("step_0", StepEvent::UserRejects))
        .expect("UserRejects should succeed");

    assert_eq!(events.len(), 2);
    match &events[0] {
        GateEvent::DecisionRecorded { decision, .. } => {
            assert_eq!(*decision, ApprovalDecision::Rejected);
        }
        other => panic!("Expected DecisionRecorded event, got {:?}", other),
    }
    match &events[1] {
        GateEvent::StatusChanged { from, to, .. } => {
            assert_eq!(*from, GateStatus::Clean);
            assert_eq!(*to, GateStatus::Dirty);
        }
        other => panic!("Expected StatusChanged event, got {:?}", other),
    }

    // Decision cleared (not retained as rejected); frontier unchanged.
    let snapshot = snapshot_rx.borrow();
    assert_eq!(snapshot.active_step.as_deref(), Some("step_0"));
    assert_eq!(snapshot.gates[0].status, GateStatus::Dirty);
    assert_eq!(snapshot.gates[0].decision, None);
    assert_eq!(snapshot.archived, 0);
}

#[test]
fn test_work_invalidated_resets_clean_gate() {
    let (mut machine, _snapshot_rx, _temp) = create_test_machine();

    machine
        .apply(step_command("step_0", StepEvent::WorkCompleted))
        .unwrap();
    let events = machine
        .apply(step_command("step_0", StepEvent::WorkInvalidated))
        .expect("WorkInvalidated should succeed");

    assert_eq!(events.len(), 1);
    match &events[0] {
        GateEvent::StatusChanged { from, to, .. } => {
            assert_eq!(*from, GateStatus::Clean);
            assert_eq!(*to, GateStatus::Dirty);
        }
        other => panic!("Expected StatusChanged event, got {:?}", other),
    }
    assert_eq!(machine.project().gate("step_0").unwrap().decision, None);
}

#[test]
fn test_unknown_step_is_rejected() {
    let (mut machine, _snapshot_rx, _temp) = create_test_machine();

    let err = machine
        .apply(step_command("step_42", StepEvent::WorkCompleted))
        .unwrap_err();
    assert!(matches!(err, GateError::UnknownStep { .. }));
}

#[test]
fn test_event_for_not_yet_started_step_is_rejected() {
    let (mut machine, _snapshot_rx, _temp) = create_test_machine();

    // step_3 is a known step but its gate has not been opened yet.
    let err = machine
        .apply(step_command("step_3", StepEvent::WorkCompleted))
        .unwrap_err();
    assert!(matches!(err, GateError::StepNotActive { .. }));
}

#[test]
fn test_full_pipeline_completes_project() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    let mut completed = false;
    for step in crate::steps::STEP_SEQUENCE {
        machine
            .apply(step_command(step.name, StepEvent::WorkCompleted))
            .expect("WorkCompleted should succeed");
        let events = machine
            .apply(step_command(step.name, StepEvent::UserApproves))
            .expect("UserApproves should succeed");
        if matches!(events.last(), Some(GateEvent::ProjectCompleted)) {
            completed = true;
        }
    }
    assert!(completed);

    let snapshot = snapshot_rx.borrow();
    assert!(snapshot.complete);
    assert_eq!(snapshot.active_step, None);
    assert!(snapshot.gates.is_empty());
    assert_eq!(snapshot.archived, crate::steps::STEP_SEQUENCE.len());
}

#[test]
fn test_reopen_prior_step() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    machine
        .apply(step_command("step_0", StepEvent::WorkCompleted))
        .unwrap();
    machine
        .apply(step_command("step_0", StepEvent::UserApproves))
        .unwrap();

    let events = machine
        .apply(GateCommand::Reopen {
            step_id: "step_0".to_string(),
        })
        .expect("Reopen should succeed");
    assert!(matches!(&events[0], GateEvent::StepReopened { step_id } if step_id == "step_0"));

    // Two live gates now; frontier stays on step_1.
    let snapshot = snapshot_rx.borrow().clone();
    assert_eq!(snapshot.gates.len(), 2);
    assert_eq!(snapshot.active_step.as_deref(), Some("step_1"));
    drop(snapshot);

    // Approving the reopened gate retires it again without moving the
    // frontier.
    machine
        .apply(step_command("step_0", StepEvent::WorkCompleted))
        .unwrap();
    let events = machine
        .apply(step_command("step_0", StepEvent::UserApproves))
        .unwrap();
    assert!(!events
        .iter()
        .any(|event| matches!(event, GateEvent::StepAdvanced { .. })));
    let snapshot = snapshot_rx.borrow();
    assert_eq!(snapshot.active_step.as_deref(), Some("step_1"));
    assert_eq!(snapshot.archived, 2);
}

#[test]
fn test_reopen_live_step_is_rejected() {
    let (mut machine, _snapshot_rx, _temp) = create_test_machine();

    let err = machine
        .apply(GateCommand::Reopen {
            step_id: "step_0".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, GateError::StepAlreadyOpen { .. }));
}

#[test]
fn test_failed_command_does_not_broadcast() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    let before = snapshot_rx.borrow().gates[0].status;
    let result = machine.apply(step_command("step_0", StepEvent::UserApproves));
    assert!(result.is_err());

    assert!(!snapshot_rx.has_changed().unwrap());
    assert_eq!(snapshot_rx.borrow().gates[0].status, before);
}

#[test]
fn test_watch_receiver_dropped() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    drop(snapshot_rx);

    // Applying commands must not panic without receivers.
    let result = machine.apply(step_command("step_0", StepEvent::WorkCompleted));
    assert!(result.is_ok());
    assert_eq!(
        machine.project().gate("step_0").unwrap().status,
        GateStatus::Clean
    );
}

#[test]
fn test_active_prompt_appears_when_pending() {
    let (mut machine, snapshot_rx, _temp) = create_test_machine();

    assert_eq!(snapshot_rx.borrow().active_prompt(), None);

    machine
        .apply(step_command("step_0", StepEvent::WorkCompleted))
        .unwrap();
    let snapshot = snapshot_rx.borrow();
    assert_eq!(
        snapshot.active_prompt(),
        Some("Proceed to Step 1 (Discovery & Intent)?")
    );
}
