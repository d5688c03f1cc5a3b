//! Centralized gate machine for step gate state.
//!
//! This is the ONLY place gate transitions happen. The machine owns the
//! project's gate aggregate, validates commands against the transition
//! table, emits events for logging, and broadcasts read-only snapshots to
//! subscribers via a watch channel. A rejected command emits nothing,
//! broadcasts nothing, and leaves state untouched.

mod commands;
mod events;
mod snapshot;

pub use commands::{GateCommand, GateEnvelope};
pub use events::GateEvent;
pub use snapshot::{GateSnapshot, StepGateView};

use crate::state::{ApprovalDecision, GateError, ProjectGates, StepEvent};
use crate::steps;
use crate::structured_logger::StructuredLogger;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the gate aggregate; validates commands, emits events, broadcasts
/// snapshots.
pub struct GateMachine {
    project: ProjectGates,
    snapshot_tx: watch::Sender<GateSnapshot>,
    logger: Arc<StructuredLogger>,
    seq: u64,
}

impl GateMachine {
    /// Creates a machine over an existing aggregate.
    ///
    /// Returns the machine and a watch receiver for snapshots; renderers
    /// poll the receiver for state updates.
    pub fn new(
        project: ProjectGates,
        logger: Arc<StructuredLogger>,
    ) -> (Self, watch::Receiver<GateSnapshot>) {
        let snapshot = GateSnapshot::from(&project);
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot);

        let machine = Self {
            project,
            snapshot_tx,
            logger,
            seq: 0,
        };

        (machine, snapshot_rx)
    }

    /// All gate mutations go through this single method.
    ///
    /// Returns the emitted events; broadcasts a fresh snapshot on success.
    pub fn apply(&mut self, command: GateCommand) -> Result<Vec<GateEvent>, GateError> {
        self.seq += 1;
        self.logger.log_gate_command(self.seq, &command);

        let events = self.apply_internal(command)?;

        for event in &events {
            self.logger.log_gate_event(self.seq, event);
        }

        self.project.set_updated_at();
        let _ = self.snapshot_tx.send(GateSnapshot::from(&self.project));

        Ok(events)
    }

    fn apply_internal(&mut self, command: GateCommand) -> Result<Vec<GateEvent>, GateError> {
        match command {
            GateCommand::Step { step_id, event } => self.apply_step_event(step_id, event),
            GateCommand::Reopen { step_id } => {
                self.project.reopen(&step_id)?;
                Ok(vec![GateEvent::StepReopened { step_id }])
            }
        }
    }

    fn apply_step_event(
        &mut self,
        step_id: String,
        event: StepEvent,
    ) -> Result<Vec<GateEvent>, GateError> {
        if steps::get_step(&step_id).is_none() {
            return Err(GateError::UnknownStep { step_id });
        }
        let was_active = self.project.active_step.as_deref() == Some(step_id.as_str());
        let gate = self
            .project
            .gate_mut(&step_id)
            .ok_or_else(|| GateError::StepNotActive {
                step_id: step_id.clone(),
            })?;

        let from = gate.status;
        gate.transition(event)?;
        let to = gate.status;

        let mut out = Vec::new();
        match event {
            StepEvent::UserApproves => out.push(GateEvent::DecisionRecorded {
                step_id: step_id.clone(),
                decision: ApprovalDecision::Approved,
            }),
            StepEvent::UserRejects => out.push(GateEvent::DecisionRecorded {
                step_id: step_id.clone(),
                decision: ApprovalDecision::Rejected,
            }),
            _ => {}
        }
        if from != to {
            out.push(GateEvent::StatusChanged {
                step_id: step_id.clone(),
                from,
                to,
            });
        }

        // Approval retires the gate; if it was the frontier, the project
        // advances to the next step (or completes).
        if event == StepEvent::UserApproves {
            let next = self.project.retire(&step_id);
            if was_active {
                match next {
                    Some(to_step) => out.push(GateEvent::StepAdvanced {
                        from: step_id,
                        to: to_step,
                    }),
                    None => out.push(GateEvent::ProjectCompleted),
                }
            }
        }

        Ok(out)
    }

    /// Immutable view of the aggregate (for saving to disk).
    pub fn project(&self) -> &ProjectGates {
        &self.project
    }

    /// Saves the aggregate atomically.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.project.save_atomic(path)
    }

    /// Re-broadcasts the current snapshot to all watchers.
    pub fn broadcast_snapshot(&self) {
        let _ = self.snapshot_tx.send(GateSnapshot::from(&self.project));
    }
}

#[cfg(test)]
mod tests;
