pub mod agent;
pub mod agent_model;
pub mod ai_model;
pub mod budget;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod payload;
pub mod prompt;
