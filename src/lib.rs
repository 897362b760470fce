pub mod agent;
pub mod cli;
pub mod driver;
pub mod report;
pub mod state;
pub mod trace;

pub use agent::{
    agent::Agent,
    agent_model::{ActionKind, Decision, LoopConfig, LoopState, RunOutcome, Termination},
    ai_model::{DecisionClient, GeminiClient, GeminiConfig, ScriptedClient},
    error::AgentError,
};
pub use driver::ui_driver::{ElementCategory, UiDriver};
pub use state::normalize::normalize_hierarchy;
