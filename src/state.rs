//! Gate state for orchestration steps.
//!
//! A [`StepGate`] records the Clean/Dirty completion status of one step plus
//! the pending approval decision. Gates validate their own transitions; the
//! [`crate::gate::GateMachine`] is the only caller that mutates them.

use crate::steps;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Completion status of a step's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Work in progress, or rejected and awaiting rework.
    Dirty,
    /// Output complete and ready for review.
    Clean,
}

impl GateStatus {
    /// Uppercase label for chips and headers.
    pub fn label(self) -> &'static str {
        match self {
            GateStatus::Dirty => "DIRTY",
            GateStatus::Clean => "CLEAN",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateStatus::Dirty => "dirty",
            GateStatus::Clean => "clean",
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's answer to a clean gate's approval prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalDecision::Pending => "pending",
            ApprovalDecision::Approved => "approved",
            ApprovalDecision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The gate-event vocabulary pushed by the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    WorkCompleted,
    UserApproves,
    UserRejects,
    WorkInvalidated,
}

impl StepEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            StepEvent::WorkCompleted => "work_completed",
            StepEvent::UserApproves => "user_approves",
            StepEvent::UserRejects => "user_rejects",
            StepEvent::WorkInvalidated => "work_invalidated",
        }
    }
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by gate transitions and gate lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The event is not legal for the gate's current state. State unchanged.
    InvalidTransition {
        step_id: String,
        status: GateStatus,
        decision: Option<ApprovalDecision>,
        event: StepEvent,
    },
    /// The step id is not in the step registry at all.
    UnknownStep { step_id: String },
    /// The step is known but has no live gate (not started yet, or retired).
    StepNotActive { step_id: String },
    /// Reopen was requested for a step with no archived gate.
    StepNotRetired { step_id: String },
    /// Reopen was requested for a step that already has a live gate.
    StepAlreadyOpen { step_id: String },
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition {
                step_id,
                status,
                decision,
                event,
            } => {
                let decision = decision.map(ApprovalDecision::as_str).unwrap_or("none");
                write!(
                    f,
                    "invalid gate transition: event `{}` on {} [{}, {}]",
                    event, step_id, status, decision
                )
            }
            Self::UnknownStep { step_id } => write!(f, "unknown step `{}`", step_id),
            Self::StepNotActive { step_id } => {
                write!(f, "step `{}` has no live gate", step_id)
            }
            Self::StepNotRetired { step_id } => {
                write!(f, "step `{}` has no archived gate to reopen", step_id)
            }
            Self::StepAlreadyOpen { step_id } => {
                write!(f, "step `{}` already has a live gate", step_id)
            }
        }
    }
}

impl std::error::Error for GateError {}

/// Per-step gate record: `{step_id, status, decision}`.
///
/// The decision is `None` while dirty; `workCompleted` opens it at
/// `Some(Pending)`. A gate at `clean[approved]` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepGate {
    pub step_id: String,
    pub status: GateStatus,
    pub decision: Option<ApprovalDecision>,
    pub created_at: String,
    pub updated_at: String,
}

impl StepGate {
    /// Opens a new gate at `dirty[none]`.
    pub fn new(step_id: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            step_id: step_id.into(),
            status: GateStatus::Dirty,
            decision: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// A terminal gate accepts no further events.
    pub fn is_terminal(&self) -> bool {
        self.status == GateStatus::Clean && self.decision == Some(ApprovalDecision::Approved)
    }

    /// Applies one gate event, enforcing the transition table:
    ///
    /// - `dirty --workCompleted--> clean[pending]`
    /// - `clean[pending] --userApproves--> clean[approved]` (terminal)
    /// - `clean[pending] --userRejects--> dirty[none]`
    /// - `clean[pending] --workInvalidated--> dirty[none]`
    ///
    /// Anything else fails with an invalid-transition error and does not
    /// mutate the gate.
    pub fn transition(&mut self, event: StepEvent) -> Result<(), GateError> {
        let (status, decision) = match (self.status, self.decision, event) {
            (GateStatus::Dirty, None, StepEvent::WorkCompleted) => {
                (GateStatus::Clean, Some(ApprovalDecision::Pending))
            }
            (GateStatus::Clean, Some(ApprovalDecision::Pending), StepEvent::UserApproves) => {
                (GateStatus::Clean, Some(ApprovalDecision::Approved))
            }
            (GateStatus::Clean, Some(ApprovalDecision::Pending), StepEvent::UserRejects) => {
                (GateStatus::Dirty, None)
            }
            (GateStatus::Clean, Some(ApprovalDecision::Pending), StepEvent::WorkInvalidated) => {
                (GateStatus::Dirty, None)
            }
            _ => {
                return Err(GateError::InvalidTransition {
                    step_id: self.step_id.clone(),
                    status: self.status,
                    decision: self.decision,
                    event,
                })
            }
        };
        self.status = status;
        self.decision = decision;
        self.updated_at = Utc::now().to_rfc3339();
        Ok(())
    }
}

/// A project's ordered gate state: the live gates, the archive of retired
/// gates, and the frontier ("active") step.
///
/// Usually one live gate exists, but a reopened prior step makes two, so the
/// model never assumes a single non-terminal gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGates {
    pub project_name: String,
    pub session_id: String,
    pub gates: Vec<StepGate>,
    pub archived: Vec<StepGate>,
    /// Frontier step id. `None` once the final step was approved.
    pub active_step: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl ProjectGates {
    /// Starts a project with the first step's gate open at `dirty[none]`.
    pub fn new(project_name: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        let first = steps::first_step();
        Self {
            project_name: project_name.to_string(),
            session_id: Uuid::new_v4().to_string(),
            gates: vec![StepGate::new(first.name)],
            archived: Vec::new(),
            active_step: Some(first.name.to_string()),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn gate(&self, step_id: &str) -> Option<&StepGate> {
        self.gates.iter().find(|gate| gate.step_id == step_id)
    }

    pub fn gate_mut(&mut self, step_id: &str) -> Option<&mut StepGate> {
        self.gates.iter_mut().find(|gate| gate.step_id == step_id)
    }

    pub fn archived_gate(&self, step_id: &str) -> Option<&StepGate> {
        self.archived
            .iter()
            .rev()
            .find(|gate| gate.step_id == step_id)
    }

    pub fn is_complete(&self) -> bool {
        self.active_step.is_none()
    }

    pub fn set_updated_at(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Moves the gate for `step_id` into the archive. If it was the frontier
    /// gate, opens the next step's gate and returns the new frontier step id;
    /// returns `None` otherwise.
    ///
    /// Archived gates are kept verbatim, never deleted.
    pub(crate) fn retire(&mut self, step_id: &str) -> Option<String> {
        if let Some(index) = self.gates.iter().position(|gate| gate.step_id == step_id) {
            let gate = self.gates.remove(index);
            self.archived.push(gate);
        }
        if self.active_step.as_deref() != Some(step_id) {
            return None;
        }
        match steps::next_step(step_id) {
            Some(next) => {
                self.gates.push(StepGate::new(next.name));
                self.active_step = Some(next.name.to_string());
                Some(next.name.to_string())
            }
            None => {
                self.active_step = None;
                None
            }
        }
    }

    /// Reopens a retired step with a fresh `dirty[none]` gate. The archived
    /// gate stays in the archive.
    pub(crate) fn reopen(&mut self, step_id: &str) -> Result<(), GateError> {
        if steps::get_step(step_id).is_none() {
            return Err(GateError::UnknownStep {
                step_id: step_id.to_string(),
            });
        }
        if self.gate(step_id).is_some() {
            return Err(GateError::StepAlreadyOpen {
                step_id: step_id.to_string(),
            });
        }
        if self.archived_gate(step_id).is_none() {
            return Err(GateError::StepNotRetired {
                step_id: step_id.to_string(),
            });
        }
        self.gates.push(StepGate::new(step_id));
        Ok(())
    }

    /// Saves session state atomically using write-then-rename.
    pub fn save_atomic(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialize session to JSON")?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content).with_context(|| {
            format!("Failed to write temp session file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;
        Ok(())
    }

    /// Loads session state if the file exists.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let session: Self =
            serde_json::from_str(&content).with_context(|| "Failed to parse session file")?;
        Ok(Some(session))
    }
}
