use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::{
    agent::{
        agent_model::{Decision, DecisionWire},
        envelope::{GenerateRequest, parse_response},
        error::AgentError,
        payload::{JPEG_QUALITY, MAX_IMAGE_DIMENSION, prepare_image},
        prompt::build_prompt,
    },
    state::state_model::Observation,
};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Source of one decision per observation.
///
/// The model is a non-deterministic black box; everything the loop needs from
/// it goes through this one method so scripted clients can stand in.
pub trait DecisionClient {
    fn decide(&self, observation: &Observation, goal: &str) -> Result<Decision, AgentError>;
}

// ============================================================================
// Gemini backend
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
    pub max_image_dimension: u32,
    pub jpeg_quality: u8,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_image_dimension: MAX_IMAGE_DIMENSION,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    api_key: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(api_key: &str, config: GeminiConfig) -> Result<Self, AgentError> {
        if api_key.trim().is_empty() {
            return Err(AgentError::MissingCredential("API key".into()));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            api_key: api_key.to_string(),
            http,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    pub fn build_request(&self, observation: &Observation, goal: &str) -> Result<GenerateRequest, AgentError> {
        let image = prepare_image(
            &observation.screenshot.bytes,
            self.config.max_image_dimension,
            self.config.jpeg_quality,
        )?;
        let prompt = build_prompt(goal, &observation.hierarchy);

        tracing::debug!(
            width = image.width,
            height = image.height,
            kb = image.jpeg_bytes / 1024,
            "outgoing screenshot"
        );
        tracing::debug!("outgoing prompt:\n{}", prompt);

        Ok(GenerateRequest::new(prompt, &image))
    }
}

impl DecisionClient for GeminiClient {
    fn decide(&self, observation: &Observation, goal: &str) -> Result<Decision, AgentError> {
        let request = self.build_request(observation, goal)?;

        let body = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()?
            .text()?;

        tracing::debug!("provider response:\n{}", body);

        let decision = parse_response(&body)?;

        if decision.has_truncated_text {
            tracing::info!(
                location = decision.visual_description.as_deref().unwrap_or("unknown"),
                "truncated text detected"
            );
        }

        Ok(decision)
    }
}

// ============================================================================
// Scripted backend (deterministic runs without a model)
// ============================================================================

/// Replays a fixed list of results in order. Once the script runs out, the
/// last entry repeats (or `Unknown` if the script was empty).
pub struct ScriptedClient {
    script: RefCell<VecDeque<Result<Decision, AgentError>>>,
    last: RefCell<Option<Decision>>,
    calls: RefCell<u32>,
}

impl ScriptedClient {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self::from_results(decisions.into_iter().map(Ok).collect())
    }

    pub fn from_results(results: Vec<Result<Decision, AgentError>>) -> Self {
        Self {
            script: RefCell::new(results.into()),
            last: RefCell::new(None),
            calls: RefCell::new(0),
        }
    }

    /// Load a YAML (or JSON) list of decisions in wire format.
    pub fn from_yaml(text: &str) -> Result<Self, AgentError> {
        let wires: Vec<DecisionWire> = serde_yaml::from_str(text)
            .map_err(|e| AgentError::Config(format!("invalid decision script: {}", e)))?;
        Ok(Self::new(wires.into_iter().map(Decision::from).collect()))
    }

    pub fn calls(&self) -> u32 {
        *self.calls.borrow()
    }
}

impl DecisionClient for ScriptedClient {
    fn decide(&self, _observation: &Observation, _goal: &str) -> Result<Decision, AgentError> {
        *self.calls.borrow_mut() += 1;

        match self.script.borrow_mut().pop_front() {
            Some(Ok(decision)) => {
                *self.last.borrow_mut() = Some(decision.clone());
                Ok(decision)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self
                .last
                .borrow()
                .clone()
                .unwrap_or_else(|| Decision::unknown("script exhausted"))),
        }
    }
}
