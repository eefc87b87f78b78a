use anyhow::{Context, Result};
use clap::Parser;
use stampede_config::{parse_duration, ConfigLoader, StampedeConfig};
use stampede_core::ScenarioRunner;
use stampede_http::ApiClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands, ConfigCommands};

/// Load configuration from file or environment
fn load_config(config_path: Option<&PathBuf>) -> Result<StampedeConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            loader
                .from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            debug!("No config file given, using defaults with environment overrides");
            loader.from_env().context("Failed to load config from environment")
        }
    }
}

/// Initialize tracing with environment variable override support
fn init_tracing(log_level: Option<&String>, config: &StampedeConfig) -> Result<()> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{}', falling back to 'info'", level);
            EnvFilter::new("info")
        }),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str())),
    };

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    debug!("Tracing initialized");
    Ok(())
}

async fn run_scenario(
    mut config: StampedeConfig,
    workers: Option<usize>,
    duration: Option<String>,
    order_count: Option<usize>,
    base_url: Option<String>,
) -> Result<bool> {
    // CLI flags beat both file and environment
    if let Some(workers) = workers {
        config.scenario.workers = workers;
    }
    if let Some(duration) = duration {
        config.scenario.duration =
            parse_duration(&duration).map_err(|e| anyhow::anyhow!("Invalid --duration: {}", e))?;
    }
    if let Some(order_count) = order_count {
        config.scenario.order_count = order_count;
    }
    if let Some(base_url) = base_url {
        config.target.base_url = base_url;
    }
    config
        .validate_all()
        .context("Configuration is invalid after CLI overrides")?;

    info!(
        workers = config.scenario.workers,
        duration_secs = config.scenario.duration.as_secs_f64(),
        orders = config.scenario.order_count,
        base_url = %config.target.base_url,
        "Starting contention run"
    );

    let api = Arc::new(
        ApiClient::new(config.target.base_url.clone(), &config.http)
            .context("Failed to build API client")?,
    );

    let runner = ScenarioRunner::new(config);
    let report = runner.run(api).await.context("Scenario run failed")?;

    println!("{}", report.render());
    Ok(report.passed())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_tracing(cli.log_level.as_ref(), &config)?;

    match cli.command {
        Commands::Run {
            workers,
            duration,
            order_count,
            base_url,
        } => {
            let passed = run_scenario(config, workers, duration, order_count, base_url).await?;
            if !passed {
                // Threshold violations and reconciliation mismatches are
                // already itemized in the rendered report
                std::process::exit(1);
            }
        }
        Commands::Config { config_cmd } => match config_cmd {
            ConfigCommands::Generate => {
                print!("{}", StampedeConfig::sample_yaml());
            }
            ConfigCommands::Validate { config_file } => {
                ConfigLoader::new()
                    .from_file(&config_file)
                    .with_context(|| format!("{} is invalid", config_file.display()))?;
                println!("{} is valid", config_file.display());
            }
        },
    }

    Ok(())
}
