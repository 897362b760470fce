use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Network or HTTP failure talking to the model provider (includes deadline expiry)
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider answered with an explicit error object
    #[error("provider error {code}: {message}")]
    Provider { code: i64, message: String },

    /// Provider envelope parsed, but carried neither candidate text nor an error
    #[error("provider returned no candidate text")]
    EmptyResponse,

    /// Provider body did not match the expected envelope shape
    #[error("malformed provider envelope: {source} (body: {raw})")]
    MalformedEnvelope {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    /// Candidate text was not a valid decision object
    #[error("malformed decision: {source} (text: {raw})")]
    MalformedDecision {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    /// Screenshot could not be decoded, resized or re-encoded
    #[error("image processing failed: {0}")]
    Image(String),

    /// UI driver subprocess failed to spawn
    #[error("failed to spawn UI driver '{command}': {source}")]
    DriverSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from / writing to the UI driver failed
    #[error("UI driver I/O: {0}")]
    DriverIo(String),

    /// UI driver answered a command with ok=false or an unexpected shape
    #[error("UI driver command '{command}' failed: {error}")]
    DriverProtocol { command: String, error: String },

    /// JSON (de)serialization outside the provider protocol
    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem access for config, fixtures or scripts
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// No API key available before the loop starts; holds what was missing
    #[error("missing credential: {0} is unset or empty")]
    MissingCredential(String),
}

impl AgentError {
    /// Only transport failures are plausibly transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, AgentError::Transport(_))
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AgentError::Transport(format!("request deadline exceeded: {}", e))
        } else {
            AgentError::Transport(e.to_string())
        }
    }
}
