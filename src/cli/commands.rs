use std::path::Path;

use crate::agent::agent::Agent;
use crate::agent::ai_model::{DecisionClient, GeminiClient, GeminiConfig, ScriptedClient};
use crate::agent::error::AgentError;
use crate::agent::executor::{TAP_PROBE_ORDER, resolve_element};
use crate::cli::config::{
    AppConfig, Cli, DecideArgs, RunArgs, TraceConfig, build_gemini_config, build_loop_config,
    load_api_key,
};
use crate::driver::fixture::FileDriver;
use crate::driver::session::ProcessDriver;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::RunReport;
use crate::state::normalize::normalize_hierarchy;
use crate::state::state_model::capture_observation;
use crate::trace::logger::{MemoryRecorder, StepRecorder, TeeRecorder, TraceLogger};

// ============================================================================
// run subcommand
// ============================================================================

/// Run the agent against a live application and return whether the goal was met.
pub fn cmd_run(cli: &Cli, args: &RunArgs, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let loop_config = build_loop_config(&config.agent, args.max_steps, args.settle_ms)?;
    let gemini = build_gemini_config(&config.model, cli.endpoint.as_deref(), cli.model.as_deref())?;
    let client = build_client(
        &args.client,
        args.script.as_deref(),
        gemini,
        &config.model.api_key_env,
    )?;

    let command = args
        .driver
        .as_deref()
        .or(config.driver.command.as_deref())
        .ok_or_else(|| AgentError::Config("no UI driver configured (use --driver or driver.command)".into()))?;
    let driver_args = if args.driver_args.is_empty() {
        config.driver.args.clone()
    } else {
        args.driver_args.clone()
    };

    let trace = build_trace_logger(&config.trace, args.trace.as_deref(), args.artifacts.as_deref());
    let memory = MemoryRecorder::new();
    let recorder = TeeRecorder::new(vec![&trace as &dyn StepRecorder, &memory]);

    let mut driver = ProcessDriver::launch(command, &driver_args)?;
    let start = std::time::Instant::now();

    let mut agent = Agent::new(&args.goal, loop_config, client.as_ref(), &recorder);
    let outcome = agent.run(&mut driver);
    driver.quit();
    let outcome = outcome?;

    let report = RunReport::new(&args.goal, outcome, &memory.records())
        .with_duration(start.elapsed().as_millis());

    print!("{}", format_console_report(&report));

    if let Some(path) = &args.junit {
        std::fs::write(path, generate_junit_xml(&report))?;
        tracing::info!("wrote JUnit report to {}", path.display());
    }

    Ok(report.passed())
}

// ============================================================================
// decide subcommand
// ============================================================================

/// Ask for one decision about a saved screen and print it as JSON.
pub fn cmd_decide(cli: &Cli, args: &DecideArgs, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let gemini = build_gemini_config(&config.model, cli.endpoint.as_deref(), cli.model.as_deref())?;
    let client = build_client(
        &args.client,
        args.script.as_deref(),
        gemini,
        &config.model.api_key_env,
    )?;

    let mut driver = FileDriver::open(&args.screenshot, &args.hierarchy)?;
    let observation = capture_observation(&mut driver)?;
    let decision = client.decide(&observation, &args.goal)?;

    println!("{}", serde_json::to_string_pretty(&decision)?);

    if let Some(id) = decision.element_id.as_deref() {
        if resolve_element(&mut driver, id, &TAP_PROBE_ORDER)?.is_none() {
            tracing::warn!(id, "elementID does not appear in the hierarchy dump");
        }
    }

    Ok(())
}

// ============================================================================
// normalize subcommand
// ============================================================================

pub fn cmd_normalize(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(input)?;
    println!("{}", normalize_hierarchy(&raw));
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Open the step trace; CLI paths win over the config file.
pub fn build_trace_logger(trace: &TraceConfig, path: Option<&Path>, artifacts: Option<&Path>) -> TraceLogger {
    let path = path.unwrap_or(trace.path.as_path());
    let artifacts = artifacts.or(trace.artifacts_dir.as_deref());
    TraceLogger::new(path, artifacts)
}

/// Build the decision source named on the command line.
pub fn build_client(
    name: &str,
    script: Option<&Path>,
    gemini: GeminiConfig,
    api_key_env: &str,
) -> Result<Box<dyn DecisionClient>, AgentError> {
    match name {
        "gemini" => {
            let api_key = load_api_key(api_key_env)?;
            Ok(Box::new(GeminiClient::new(&api_key, gemini)?))
        }
        "scripted" => {
            let path = script
                .ok_or_else(|| AgentError::Config("--client scripted requires --script".into()))?;
            let text = std::fs::read_to_string(path).map_err(|e| AgentError::Io {
                context: format!("reading decision script {}", path.display()),
                source: e,
            })?;
            Ok(Box::new(ScriptedClient::from_yaml(&text)?))
        }
        other => Err(AgentError::Config(format!(
            "unknown client '{}' (expected gemini or scripted)",
            other
        ))),
    }
}
