use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_STEPS: u32 = 15;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;
pub const DEFAULT_TRANSPORT_RETRIES: u32 = 0;

/// Symbolic action chosen by the model for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Tap,
    Type,
    Done,
    Fail,
    Unknown,
}

impl ActionKind {
    /// Map the wire `type` string. Anything outside the vocabulary is `Unknown`.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "tap" => ActionKind::Tap,
            "type" => ActionKind::Type,
            "done" => ActionKind::Done,
            "fail" => ActionKind::Fail,
            _ => ActionKind::Unknown,
        }
    }
}

/// Decision JSON exactly as the model is instructed to emit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionWire {
    #[serde(rename = "hasTruncatedText")]
    pub has_truncated_text: bool,
    #[serde(rename = "visualDescription", default)]
    pub visual_description: Option<String>,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(rename = "elementID", default)]
    pub element_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub reasoning: String,
}

/// One fully-formed model decision. There is no partially valid Decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action_kind: ActionKind,
    pub element_id: Option<String>,
    pub text: Option<String>,
    pub reasoning: String,
    pub has_truncated_text: bool,
    pub visual_description: Option<String>,
}

impl From<DecisionWire> for Decision {
    fn from(wire: DecisionWire) -> Self {
        Decision {
            action_kind: ActionKind::from_wire(&wire.action_type),
            element_id: wire.element_id,
            text: wire.text,
            reasoning: wire.reasoning,
            has_truncated_text: wire.has_truncated_text,
            visual_description: wire.visual_description,
        }
    }
}

impl Decision {
    pub fn tap(element_id: &str, reasoning: &str) -> Self {
        Self::bare(ActionKind::Tap, reasoning).with_element(element_id)
    }

    pub fn type_text(text: &str, reasoning: &str) -> Self {
        Decision {
            text: Some(text.to_string()),
            ..Self::bare(ActionKind::Type, reasoning)
        }
    }

    pub fn done(reasoning: &str) -> Self {
        Self::bare(ActionKind::Done, reasoning)
    }

    pub fn fail(reasoning: &str) -> Self {
        Self::bare(ActionKind::Fail, reasoning)
    }

    pub fn unknown(reasoning: &str) -> Self {
        Self::bare(ActionKind::Unknown, reasoning)
    }

    pub fn with_element(mut self, element_id: &str) -> Self {
        self.element_id = Some(element_id.to_string());
        self
    }

    pub fn with_truncation(mut self, description: &str) -> Self {
        self.has_truncated_text = true;
        self.visual_description = Some(description.to_string());
        self
    }

    fn bare(action_kind: ActionKind, reasoning: &str) -> Self {
        Decision {
            action_kind,
            element_id: None,
            text: None,
            reasoning: reasoning.to_string(),
            has_truncated_text: false,
            visual_description: None,
        }
    }
}

/// Why a finished loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    Goal,
    AgentFailure,
    Timeout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Running(u32),
    Succeeded,
    FailedByAgent(String),
    TimedOut,
}

impl LoopState {
    pub fn termination(&self) -> Option<Termination> {
        match self {
            LoopState::Running(_) => None,
            LoopState::Succeeded => Some(Termination::Goal),
            LoopState::FailedByAgent(_) => Some(Termination::AgentFailure),
            LoopState::TimedOut => Some(Termination::Timeout),
        }
    }
}

/// Terminal result handed back to the surrounding harness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub termination: Termination,
    pub steps: u32,
    /// Agent's explanation when it gave up.
    pub reason: Option<String>,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.termination == Termination::Goal
    }
}

/// Loop tunables, passed in rather than hardcoded so tests can use zero delay.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub max_steps: u32,
    pub settle_delay: Duration,
    pub transport_retries: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            transport_retries: DEFAULT_TRANSPORT_RETRIES,
        }
    }
}
