//! CLI entrypoint for doxa
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod scenarios;

use anyhow::{Context, Result, bail};
use clap::Parser;
use doxa_application::{BeliefObserver, CompositeObserver};
use doxa_infrastructure::{
    ConfigLoader, FileConfig, JsonlEventLogger, SingleStepPlanner, build_scorer,
};
use doxa_presentation::{Cli, ConsoleObserver, Scenario, formatter_for};
use scenarios::ScenarioEnv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        print_config_sources(&cli);
        return Ok(());
    }

    let config = load_config(&cli)?;

    info!("Starting doxa scenario '{}'", cli.scenario.as_str());

    // === Dependency Injection ===
    let mut settings = config.agent_settings();
    if let Some(significance) = cli.significance {
        settings = settings.with_significance(significance);
    }
    if let Some(influence) = cli.influence {
        settings = settings.with_influence(influence);
    }
    let mut params = config.negotiation_params();
    if let Some(rounds) = cli.rounds {
        params = params.with_max_rounds(rounds);
    }

    let scorer =
        build_scorer(&config.scorer_settings()).context("Cannot build evidence scorer")?;
    let observer = build_observer(&cli, &config);

    let env = ScenarioEnv {
        config,
        settings,
        params,
        scorer,
        observer,
        planner: Arc::new(SingleStepPlanner::new()),
    };

    let frame_a = cli.frame_a.as_deref();
    let frame_b = cli.frame_b.as_deref();
    let report = match cli.scenario {
        Scenario::Conflict => scenarios::conflict(&env, frame_a, frame_b).await?,
        Scenario::Debate => scenarios::debate(&env, frame_a, frame_b).await?,
        Scenario::FrameSwitch => scenarios::frame_switch(&env, &cli.frames).await?,
    };

    println!("{}", formatter_for(cli.output).format(&report));

    Ok(())
}

fn print_config_sources(cli: &Cli) {
    println!("Configuration sources (highest priority first):");
    for source in ConfigLoader::sources(cli.config.as_ref()) {
        let status = if source.found { "found" } else { "not found" };
        println!("  {:<9} {} ({})", source.label, source.path.display(), status);
    }
    println!("  {:<9} DOXA_* environment variables", "Env");
    if cli.no_config {
        println!("\n--no-config is set: only built-in defaults are used");
    }
}

/// Load, validate, and report configuration issues. Errors abort the run;
/// warnings are printed and the fallback values are used.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("Error: {}", issue);
        } else {
            eprintln!("Warning: {}", issue);
        }
    }
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("Configuration has {} error(s)", errors);
    }

    Ok(config)
}

fn build_observer(cli: &Cli, config: &FileConfig) -> Arc<dyn BeliefObserver> {
    let mut composite = CompositeObserver::default();

    if !cli.quiet {
        composite = composite.with(Arc::new(ConsoleObserver::new().verbose(cli.verbose > 0)));
    }

    let events_path = cli
        .events
        .clone()
        .or_else(|| config.logging.events_path());
    if let Some(path) = events_path {
        match JsonlEventLogger::new(&path) {
            Some(logger) => {
                info!("Writing events to {}", logger.path().display());
                composite = composite.with(Arc::new(logger));
            }
            None => warn!(
                "Cannot open event log {}, events will not be recorded",
                path.display()
            ),
        }
    }

    Arc::new(composite)
}
