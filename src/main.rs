use clap::Parser;
use tracing_subscriber::EnvFilter;
use vlm_explorer::cli::commands::{cmd_decide, cmd_normalize, cmd_run};
use vlm_explorer::cli::config::{Cli, Commands, load_config};

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Run(args) => {
            let config = load_config(cli.config.as_deref())?;
            let passed = cmd_run(&cli, args, &config)?;
            if !passed {
                std::process::exit(1);
            }
        }
        Commands::Decide(args) => {
            let config = load_config(cli.config.as_deref())?;
            cmd_decide(&cli, args, &config)?;
        }
        Commands::Normalize { input } => {
            cmd_normalize(input)?;
        }
    }

    Ok(())
}
