//! Step metadata for the orchestrator pipeline.
//!
//! The step sequence is fixed: gate state is tracked per step id, and
//! approving a step's gate advances the project to the next definition.

/// A single orchestration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub gate_prompt: &'static str,
}

/// The ordered pipeline, first step to last.
pub const STEP_SEQUENCE: &[StepDefinition] = &[
    StepDefinition {
        name: "step_0",
        title: "Project Handshake",
        description: "Capture initial project metadata and ensure persistence folders exist.",
        gate_prompt: "Proceed to Step 1 (Discovery & Intent)?",
    },
    StepDefinition {
        name: "step_1",
        title: "Discovery & Intent",
        description: "Draft the solution charter capturing vision, goals, non-goals, and metrics.",
        gate_prompt: "Approve the Solution Charter and proceed to Step 2 (Architecture & UI Foundations)?",
    },
    StepDefinition {
        name: "step_2",
        title: "Architecture & UI Foundations",
        description: "Outline architecture, workplan, and establish UI design artifacts.",
        gate_prompt: "Approve the architecture and UI foundations to proceed to Step 3 (Scaffold)?",
    },
    StepDefinition {
        name: "step_3",
        title: "Scaffold",
        description: "Provide backend/frontend scaffolding, design-system primitives, and CI plumbing.",
        gate_prompt: "Scaffold validated. Proceed to Step 4 (Feature Iteration 1)?",
    },
    StepDefinition {
        name: "step_4",
        title: "Feature Iteration 1",
        description: "First feature delivery iteration.",
        gate_prompt: "Continue to Step 5 (Feature Iteration 2)?",
    },
    StepDefinition {
        name: "step_5",
        title: "Feature Iteration 2",
        description: "Continued feature iteration.",
        gate_prompt: "Continue to Step 6 (Integration & E2E)?",
    },
    StepDefinition {
        name: "step_6",
        title: "Integration & E2E",
        description: "Integration and end-to-end validation.",
        gate_prompt: "Continue to Step 7 (Release Prep)?",
    },
    StepDefinition {
        name: "step_7",
        title: "Release Prep",
        description: "Release preparation and summary.",
        gate_prompt: "Mark project as ready for release?",
    },
];

/// Returns the definition for `name`, if it is a known step.
pub fn get_step(name: &str) -> Option<&'static StepDefinition> {
    STEP_SEQUENCE.iter().find(|step| step.name == name)
}

/// The first step of the pipeline.
pub fn first_step() -> &'static StepDefinition {
    &STEP_SEQUENCE[0]
}

/// The step after `name`, or `None` if `name` is the last step or unknown.
pub fn next_step(name: &str) -> Option<&'static StepDefinition> {
    let index = STEP_SEQUENCE.iter().position(|step| step.name == name)?;
    STEP_SEQUENCE.get(index + 1)
}
