//! Events emitted by the gate machine after processing commands.
//!
//! These are for logging and notification only. Consumers observe state via
//! the watch channel's [`super::GateSnapshot`].

use crate::state::{ApprovalDecision, GateStatus};
use serde::Serialize;

/// An event emitted by a successful command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum GateEvent {
    /// A gate moved between dirty and clean.
    StatusChanged {
        step_id: String,
        from: GateStatus,
        to: GateStatus,
    },
    /// The user answered an approval prompt.
    DecisionRecorded {
        step_id: String,
        decision: ApprovalDecision,
    },
    /// The frontier moved past an approved step.
    StepAdvanced { from: String, to: String },
    /// A retired step was reopened with a fresh gate.
    StepReopened { step_id: String },
    /// The final step was approved.
    ProjectCompleted,
}
