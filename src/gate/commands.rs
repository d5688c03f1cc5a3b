//! Commands that can mutate gate state.
//!
//! All gate mutations go through [`super::GateMachine::apply`]. The four
//! step events mirror the wire-level gate-event stream; `Reopen` is the one
//! machine-local command with no wire counterpart.

use crate::state::StepEvent;
use serde::{Deserialize, Serialize};

/// A command for the gate machine.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum GateCommand {
    /// Apply one gate event to the matching step gate.
    Step { step_id: String, event: StepEvent },
    /// Reopen a retired step with a fresh gate.
    Reopen { step_id: String },
}

/// Wire form of a gate-event message as produced by the orchestration layer:
/// `{"step_id": "step_2", "event": "work_completed"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateEnvelope {
    pub step_id: String,
    pub event: StepEvent,
}

impl From<GateEnvelope> for GateCommand {
    fn from(envelope: GateEnvelope) -> Self {
        GateCommand::Step {
            step_id: envelope.step_id,
            event: envelope.event,
        }
    }
}
