use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::agent::{
    agent_model::{DEFAULT_MAX_STEPS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_TRANSPORT_RETRIES, LoopConfig},
    ai_model::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GeminiConfig},
    error::AgentError,
    payload::{JPEG_QUALITY, MAX_IMAGE_DIMENSION},
};

pub const DEFAULT_CONFIG_PATH: &str = "vlm-explorer.yaml";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_GOAL: &str = "Try and find any truncated text within this application.";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "vlm-explorer",
    version,
    about = "Autonomous UI exploration driven by a vision-language model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model provider base URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Path to config file (default: vlm-explorer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive a live application until the goal is met, the agent gives up,
    /// or the step budget runs out
    Run(RunArgs),

    /// Ask for a single decision about a saved screenshot and hierarchy dump
    Decide(DecideArgs),

    /// Print the normalized form of a raw hierarchy dump
    Normalize {
        /// Raw hierarchy dump file
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Natural-language goal for the agent
    #[arg(long, default_value = DEFAULT_GOAL)]
    pub goal: String,

    /// UI driver helper executable (overrides driver.command)
    #[arg(long)]
    pub driver: Option<String>,

    /// Argument passed to the driver helper (repeatable)
    #[arg(long = "driver-arg", allow_hyphen_values = true)]
    pub driver_args: Vec<String>,

    /// Maximum loop iterations
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Pause after each action, in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Decision source: gemini or scripted
    #[arg(long, default_value = "gemini")]
    pub client: String,

    /// Decision script (YAML list in wire format) for --client scripted
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// JSONL step trace path (overrides trace.path)
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Directory for per-step screenshots (overrides trace.artifacts_dir)
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Write a JUnit XML report here
    #[arg(long)]
    pub junit: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// Natural-language goal for the agent
    #[arg(long, default_value = DEFAULT_GOAL)]
    pub goal: String,

    /// Screenshot file (PNG or JPEG)
    #[arg(long)]
    pub screenshot: PathBuf,

    /// Raw hierarchy dump file
    #[arg(long)]
    pub hierarchy: PathBuf,

    /// Decision source: gemini or scripted
    #[arg(long, default_value = "gemini")]
    pub client: String,

    /// Decision script for --client scripted
    #[arg(long)]
    pub script: Option<PathBuf>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `vlm-explorer.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_transport_retries")]
    pub transport_retries: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            transport_retries: DEFAULT_TRANSPORT_RETRIES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_image_dimension: MAX_IMAGE_DIMENSION,
            jpeg_quality: JPEG_QUALITY,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverConfig {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_path")]
    pub path: PathBuf,

    pub artifacts_dir: Option<PathBuf>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: default_trace_path(),
            artifacts_dir: None,
        }
    }
}

// Serde default helpers
fn default_max_steps() -> u32 { DEFAULT_MAX_STEPS }
fn default_settle_delay_ms() -> u64 { DEFAULT_SETTLE_DELAY_MS }
fn default_transport_retries() -> u32 { DEFAULT_TRANSPORT_RETRIES }
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_max_image_dimension() -> u32 { MAX_IMAGE_DIMENSION }
fn default_jpeg_quality() -> u8 { JPEG_QUALITY }
fn default_api_key_env() -> String { DEFAULT_API_KEY_ENV.to_string() }
fn default_trace_path() -> PathBuf { PathBuf::from("agent_trace.jsonl") }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. A missing file yields defaults; a file that
/// exists but does not parse is an error.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, AgentError> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content)
            .map_err(|e| AgentError::Config(format!("{}: {}", config_path, e))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && path.is_none() => {
            Ok(AppConfig::default())
        }
        Err(e) => Err(AgentError::Io {
            context: format!("reading config {}", config_path),
            source: e,
        }),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// CLI flags win over the config file.
pub fn build_loop_config(agent: &AgentConfig, max_steps: Option<u32>, settle_ms: Option<u64>) -> Result<LoopConfig, AgentError> {
    let max_steps = max_steps.unwrap_or(agent.max_steps);
    if max_steps == 0 {
        return Err(AgentError::Config("max_steps must be at least 1".into()));
    }

    Ok(LoopConfig {
        max_steps,
        settle_delay: Duration::from_millis(settle_ms.unwrap_or(agent.settle_delay_ms)),
        transport_retries: agent.transport_retries,
    })
}

pub fn build_gemini_config(model: &ModelConfig, endpoint: Option<&str>, model_name: Option<&str>) -> Result<GeminiConfig, AgentError> {
    if model.max_image_dimension == 0 {
        return Err(AgentError::Config("max_image_dimension must be positive".into()));
    }
    if !(1..=100).contains(&model.jpeg_quality) {
        return Err(AgentError::Config("jpeg_quality must be within 1..=100".into()));
    }

    Ok(GeminiConfig {
        endpoint: endpoint.unwrap_or(&model.endpoint).to_string(),
        model: model_name.unwrap_or(&model.model).to_string(),
        timeout: Duration::from_secs(model.timeout_secs),
        max_image_dimension: model.max_image_dimension,
        jpeg_quality: model.jpeg_quality,
    })
}

/// Read the API key from the environment (after loading `.env` if present).
/// Absence is fatal before the loop starts.
pub fn load_api_key(env_name: &str) -> Result<String, AgentError> {
    dotenvy::dotenv().ok();
    match std::env::var(env_name) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AgentError::MissingCredential(format!("environment variable {}", env_name))),
    }
}
