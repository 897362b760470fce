use serde::Serialize;

use crate::{
    agent::agent_model::{RunOutcome, Termination},
    trace::trace::StepRecord,
};

// ============================================================================
// Run report — one agent run as seen by the surrounding harness
// ============================================================================

/// Result of one agent run, consumed by the console and JUnit reporters.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub goal: String,
    pub outcome: RunOutcome,

    /// Steps on which the model flagged truncated text, with its location hint
    pub truncation_findings: Vec<TruncationFinding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TruncationFinding {
    pub step: u32,
    pub location: Option<String>,
}

impl RunReport {
    pub fn new(goal: &str, outcome: RunOutcome, records: &[StepRecord]) -> Self {
        let truncation_findings = records
            .iter()
            .filter(|r| r.decision.has_truncated_text)
            .map(|r| TruncationFinding {
                step: r.step,
                location: r.decision.visual_description.clone(),
            })
            .collect();

        Self {
            goal: goal.to_string(),
            outcome,
            truncation_findings,
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn passed(&self) -> bool {
        self.outcome.passed()
    }

    pub fn status_label(&self) -> &'static str {
        match self.outcome.termination {
            Termination::Goal => "SUCCEEDED",
            Termination::AgentFailure => "FAILED BY AGENT",
            Termination::Timeout => "TIMED OUT",
        }
    }
}
