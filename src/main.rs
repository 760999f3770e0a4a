use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use genealogy_grapher::{
    config::Config,
    reports::{DotFormatter, NodeOrder, ReportFormatter},
    resolver::GenealogyClient,
    GraphTraversal, TraversalDirections,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "genealogy-grapher")]
#[command(about = "Build an academic genealogy graph and print it as Graphviz DOT")]
#[command(version)]
struct Cli {
    /// Record identifiers to start from
    #[arg(required = true, value_name = "ID")]
    ids: Vec<u64>,

    /// Follow advisors of the seeds
    #[arg(short = 'a', long)]
    with_ancestors: bool,

    /// Follow students of the seeds
    #[arg(short = 'd', long)]
    with_descendants: bool,

    /// Write the DOT output to this file instead of stdout
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Report progress while fetching records
    #[arg(short, long)]
    verbose: bool,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node order in the output
    #[arg(long, value_enum, default_value_t = OutputOrder::Descending)]
    order: OutputOrder,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputOrder {
    /// Highest id first
    Descending,
    /// Walk outwards from the seeds
    FromSeeds,
}

impl From<OutputOrder> for NodeOrder {
    fn from(order: OutputOrder) -> Self {
        match order {
            OutputOrder::Descending => NodeOrder::Descending,
            OutputOrder::FromSeeds => NodeOrder::FromSeeds,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "info" } else { cli.log_level.as_str() };
    init_tracing(log_level)?;

    let config = load_config(cli.config.as_ref()).await?;
    config.validate().context("Invalid configuration")?;

    let client = GenealogyClient::new(&config.resolver)?;
    let directions = TraversalDirections::new(cli.with_ancestors, cli.with_descendants);
    let mut traversal = GraphTraversal::new(client, directions);

    let graph = traversal
        .build(&cli.ids)
        .await
        .context("Failed to build genealogy graph")?;

    let unresolved = traversal.unresolved();
    if !unresolved.is_empty() {
        warn!(
            "{} identifier(s) could not be resolved: {:?}",
            unresolved.len(),
            unresolved
        );
    }

    let dot = DotFormatter::new(cli.with_ancestors, cli.with_descendants)
        .with_order(cli.order.into())
        .format(&graph)
        .context("Failed to render graph")?;

    write_output(&dot, cli.file.as_ref()).await
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Load configuration from file, falling back to environment and defaults
async fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
    if let Some(path) = config_path {
        if path.exists() {
            info!("Loading configuration from: {:?}", path);
            let mut config = Config::load_from_file(path)
                .await
                .with_context(|| format!("Failed to load config file: {:?}", path))?;
            config.apply_env()?;
            return Ok(config);
        }
        warn!("Configuration file not found: {:?}. Using defaults.", path);
    }

    Config::load_from_env()
}

/// Write the DOT text to a file or stdout
async fn write_output(dot: &str, output_file: Option<&PathBuf>) -> Result<()> {
    if let Some(file_path) = output_file {
        tokio::fs::write(file_path, dot)
            .await
            .with_context(|| format!("Failed to write output to: {:?}", file_path))?;
        info!("Graph written to: {:?}", file_path);
    } else {
        print!("{}", dot);
    }

    Ok(())
}
