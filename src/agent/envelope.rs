use serde::{Deserialize, Serialize};

use crate::agent::{
    agent_model::{Decision, DecisionWire},
    error::AgentError,
    payload::{EncodedImage, IMAGE_MIME_TYPE},
};

// ============================================================================
// Request body
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: &'static str,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
}

impl GenerateRequest {
    /// One user message: prompt text first, then the inline screenshot.
    pub fn new(prompt: String, image: &EncodedImage) -> Self {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: IMAGE_MIME_TYPE,
                            data: image.base64.clone(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

// ============================================================================
// Response envelope
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    pub error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    pub code: i64,
    pub message: String,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

/// Drop one surrounding ```json fence if the model added it anyway.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    trimmed
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse decision JSON text into a Decision.
pub fn parse_decision(text: &str) -> Result<Decision, AgentError> {
    serde_json::from_str::<DecisionWire>(strip_code_fence(text))
        .map(Decision::from)
        .map_err(|e| AgentError::MalformedDecision {
            source: e,
            raw: text.to_string(),
        })
}

/// Turn a raw provider body into a Decision, classifying each failure point.
pub fn parse_response(body: &str) -> Result<Decision, AgentError> {
    let envelope: GenerateResponse =
        serde_json::from_str(body).map_err(|e| AgentError::MalformedEnvelope {
            source: e,
            raw: body.to_string(),
        })?;

    let Some(text) = envelope.first_text() else {
        return Err(match envelope.error {
            Some(err) => AgentError::Provider {
                code: err.code,
                message: err.message,
            },
            None => AgentError::EmptyResponse,
        });
    };

    parse_decision(text)
}
