use std::io::Write;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use vlm_explorer::{
    agent::{
        agent_model::{DEFAULT_MAX_STEPS, DEFAULT_SETTLE_DELAY_MS},
        ai_model::{DEFAULT_MODEL, GeminiConfig},
        error::AgentError,
    },
    cli::{
        commands::build_client,
        config::{
            AgentConfig, AppConfig, Cli, Commands, DEFAULT_GOAL, ModelConfig, build_gemini_config,
            build_loop_config, load_api_key, load_config,
        },
    },
};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_run_minimal() {
    let cli = Cli::parse_from(["vlm-explorer", "run", "--driver", "ui-helper"]);
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.goal, DEFAULT_GOAL);
            assert_eq!(args.driver.as_deref(), Some("ui-helper"));
            assert_eq!(args.client, "gemini");
            assert!(args.driver_args.is_empty());
            assert!(args.max_steps.is_none());
            assert!(args.junit.is_none());
        }
        _ => panic!("Expected Run command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_run_all_args() {
    let cli = Cli::parse_from([
        "vlm-explorer",
        "-vv",
        "--model",
        "other-model",
        "run",
        "--goal",
        "Find clipped labels",
        "--driver",
        "ui-helper",
        "--driver-arg",
        "--udid",
        "--driver-arg",
        "ABC",
        "--max-steps",
        "5",
        "--settle-ms",
        "0",
        "--client",
        "scripted",
        "--script",
        "plan.yaml",
        "--trace",
        "out.jsonl",
        "--artifacts",
        "shots",
        "--junit",
        "report.xml",
    ]);

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.model.as_deref(), Some("other-model"));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.goal, "Find clipped labels");
            assert_eq!(args.driver_args, vec!["--udid", "ABC"]);
            assert_eq!(args.max_steps, Some(5));
            assert_eq!(args.settle_ms, Some(0));
            assert_eq!(args.client, "scripted");
            assert_eq!(args.script.as_deref(), Some(Path::new("plan.yaml")));
            assert_eq!(args.trace.as_deref(), Some(Path::new("out.jsonl")));
            assert_eq!(args.artifacts.as_deref(), Some(Path::new("shots")));
            assert_eq!(args.junit.as_deref(), Some(Path::new("report.xml")));
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_decide() {
    let cli = Cli::parse_from([
        "vlm-explorer",
        "decide",
        "--screenshot",
        "screen.png",
        "--hierarchy",
        "dump.txt",
    ]);
    match cli.command {
        Commands::Decide(args) => {
            assert_eq!(args.screenshot, Path::new("screen.png"));
            assert_eq!(args.hierarchy, Path::new("dump.txt"));
            assert_eq!(args.goal, DEFAULT_GOAL);
        }
        _ => panic!("Expected Decide command"),
    }
}

#[test]
fn cli_parse_normalize() {
    let cli = Cli::parse_from(["vlm-explorer", "normalize", "--input", "dump.txt"]);
    assert!(matches!(cli.command, Commands::Normalize { input } if input == Path::new("dump.txt")));
}

#[test]
fn cli_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "vlm-explorer",
        "normalize",
        "--input",
        "dump.txt",
        "--config",
        "custom.yaml",
        "-v",
    ]);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    assert_eq!(cli.verbose, 1);
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.agent.max_steps, DEFAULT_MAX_STEPS);
    assert_eq!(config.agent.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
    assert_eq!(config.agent.transport_retries, 0);
    assert_eq!(config.model.model, DEFAULT_MODEL);
    assert_eq!(config.model.timeout_secs, 60);
    assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
    assert!(config.driver.command.is_none());
    assert_eq!(config.trace.path, Path::new("agent_trace.jsonl"));
}

#[test]
fn config_partial_yaml_fills_defaults() {
    let yaml = r#"
agent:
  max_steps: 30
driver:
  command: ./ui-helper
  args: ["--bundle", "com.example.demo"]
"#;
    let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.agent.max_steps, 30);
    assert_eq!(config.agent.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
    assert_eq!(config.driver.command.as_deref(), Some("./ui-helper"));
    assert_eq!(config.driver.args, vec!["--bundle", "com.example.demo"]);
    assert_eq!(config.model.jpeg_quality, 60);
    assert_eq!(config.model.max_image_dimension, 1024);
}

#[test]
fn load_config_reads_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "model:\n  model: custom-model\n  timeout_secs: 5").unwrap();

    let config = load_config(file.path().to_str()).unwrap();
    assert_eq!(config.model.model, "custom-model");
    assert_eq!(config.model.timeout_secs, 5);
}

#[test]
fn load_config_rejects_malformed_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "agent:\n  max_steps: [not, a, number]").unwrap();

    assert!(matches!(
        load_config(file.path().to_str()),
        Err(AgentError::Config(_))
    ));
}

#[test]
fn load_config_missing_explicit_file_is_error() {
    assert!(matches!(
        load_config(Some("/nonexistent/vlm-explorer.yaml")),
        Err(AgentError::Io { .. })
    ));
}

// ============================================================================
// Config Builder Tests
// ============================================================================

#[test]
fn loop_config_cli_overrides_file() {
    let agent = AgentConfig {
        max_steps: 20,
        settle_delay_ms: 500,
        transport_retries: 2,
    };

    let from_file = build_loop_config(&agent, None, None).unwrap();
    assert_eq!(from_file.max_steps, 20);
    assert_eq!(from_file.settle_delay, Duration::from_millis(500));
    assert_eq!(from_file.transport_retries, 2);

    let overridden = build_loop_config(&agent, Some(3), Some(0)).unwrap();
    assert_eq!(overridden.max_steps, 3);
    assert!(overridden.settle_delay.is_zero());
}

#[test]
fn loop_config_rejects_zero_steps() {
    assert!(matches!(
        build_loop_config(&AgentConfig::default(), Some(0), None),
        Err(AgentError::Config(_))
    ));
}

#[test]
fn gemini_config_overrides_and_validation() {
    let model = ModelConfig::default();
    let config = build_gemini_config(&model, Some("http://localhost:9999"), Some("m2")).unwrap();
    assert_eq!(config.endpoint, "http://localhost:9999");
    assert_eq!(config.model, "m2");
    assert_eq!(config.timeout, Duration::from_secs(60));

    let bad_quality = ModelConfig {
        jpeg_quality: 0,
        ..ModelConfig::default()
    };
    assert!(build_gemini_config(&bad_quality, None, None).is_err());

    let bad_dimension = ModelConfig {
        max_image_dimension: 0,
        ..ModelConfig::default()
    };
    assert!(build_gemini_config(&bad_dimension, None, None).is_err());
}

// ============================================================================
// Client + credential Tests
// ============================================================================

#[test]
fn missing_api_key_env_is_missing_credential() {
    let name = "VLM_EXPLORER_TEST_KEY_THAT_IS_NEVER_SET";
    match load_api_key(name) {
        Err(err @ AgentError::MissingCredential(_)) => assert_eq!(
            err.to_string(),
            format!("missing credential: environment variable {} is unset or empty", name)
        ),
        other => panic!("expected MissingCredential, got {:?}", other),
    }
}

#[test]
fn gemini_client_without_key_fails_before_loop() {
    let result = build_client(
        "gemini",
        None,
        GeminiConfig::default(),
        "VLM_EXPLORER_TEST_KEY_THAT_IS_NEVER_SET",
    );
    assert!(matches!(result, Err(AgentError::MissingCredential(_))));
}

#[test]
fn scripted_client_requires_script() {
    assert!(matches!(
        build_client("scripted", None, GeminiConfig::default(), "UNUSED"),
        Err(AgentError::Config(_))
    ));
}

#[test]
fn unknown_client_name_is_config_error() {
    assert!(matches!(
        build_client("ollama", None, GeminiConfig::default(), "UNUSED"),
        Err(AgentError::Config(_))
    ));
}

#[test]
fn scripted_client_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "- hasTruncatedText: false\n  type: done\n  reasoning: nothing to find"
    )
    .unwrap();

    assert!(build_client("scripted", Some(file.path()), GeminiConfig::default(), "UNUSED").is_ok());
}
