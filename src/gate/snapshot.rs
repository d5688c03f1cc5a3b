//! Read-only snapshot of project gate state for display.
//!
//! Renderers never mutate this; they receive new snapshots via the watch
//! channel after every successful command.

use crate::state::{ApprovalDecision, GateStatus, ProjectGates};
use crate::steps;
use serde::Serialize;

/// Display projection of one live gate.
#[derive(Debug, Clone, Serialize)]
pub struct StepGateView {
    pub step_id: String,
    /// Step title from the registry; the raw id if the registry lacks it.
    pub title: String,
    pub status: GateStatus,
    pub decision: Option<ApprovalDecision>,
}

/// Read-only snapshot of a project's gate state.
#[derive(Debug, Clone, Serialize)]
pub struct GateSnapshot {
    pub project_name: String,
    pub session_id: String,
    pub active_step: Option<String>,
    pub gates: Vec<StepGateView>,
    /// Number of retired gates in the archive.
    pub archived: usize,
    pub complete: bool,
}

impl GateSnapshot {
    /// The approval prompt for the frontier step, once its gate is clean.
    pub fn active_prompt(&self) -> Option<&'static str> {
        let active = self.active_step.as_deref()?;
        let gate = self.gates.iter().find(|gate| gate.step_id == active)?;
        if gate.status == GateStatus::Clean && gate.decision == Some(ApprovalDecision::Pending) {
            steps::get_step(active).map(|step| step.gate_prompt)
        } else {
            None
        }
    }
}

impl From<&ProjectGates> for GateSnapshot {
    fn from(project: &ProjectGates) -> Self {
        let gates = project
            .gates
            .iter()
            .map(|gate| StepGateView {
                step_id: gate.step_id.clone(),
                title: steps::get_step(&gate.step_id)
                    .map(|step| step.title.to_string())
                    .unwrap_or_else(|| gate.step_id.clone()),
                status: gate.status,
                decision: gate.decision,
            })
            .collect();
        Self {
            project_name: project.project_name.clone(),
            session_id: project.session_id.clone(),
            active_step: project.active_step.clone(),
            gates,
            archived: project.archived.len(),
            complete: project.is_complete(),
        }
    }
}
