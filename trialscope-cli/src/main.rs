//! TrialScope CLI: analyze a clinical-research question from the terminal.
//!
//! Prints the resulting report as JSON on stdout; logs go to stderr and to a
//! rolling JSON file.

mod commands;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use trialscope_core::TrialScopeEngine;

/// TrialScope: clinical trial evidence at a glance
#[derive(Parser, Debug)]
#[command(name = "trialscope", version, about, long_about = None)]
struct Cli {
    /// Clinical-research question, e.g. "pembrolizumab vs nivolumab in NSCLC safety"
    query: Option<String>,

    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Additional configuration file, merged over the workspace config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for synthetic metrics (reproducible output)
    #[arg(long)]
    seed: Option<u64>,

    /// Skip all network sources and use fallback evidence
    #[arg(long)]
    offline: bool,

    /// Skip sentiment enrichment
    #[arg(long)]
    no_enrich: bool,

    /// Print the report as a single line of JSON
    #[arg(long)]
    compact: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "trialscope", "trialscope")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "trialscope.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if let Some(command) = cli.command {
        return commands::handle_command(command, &workspace, cli.config.as_deref()).await;
    }

    let mut config = commands::load(&workspace, cli.config.as_deref())?;
    if cli.no_enrich {
        config.enrichment.enabled = false;
    }
    if cli.seed.is_some() {
        config.synthesis.seed = cli.seed;
    }

    let engine = if cli.offline {
        TrialScopeEngine::offline()
    } else {
        TrialScopeEngine::from_config(&config)
            .map_err(|e| anyhow::anyhow!("Failed to start: {}", e))?
    };

    let mut rng = match config.synthesis.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let query = cli.query.unwrap_or_default();
    match engine.analyze(&query, &mut rng).await {
        Ok(report) => {
            let json = if cli.compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{}", json);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            anyhow::bail!("{}", e.user_message())
        }
    }
}
