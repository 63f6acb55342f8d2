use std::sync::Arc;

use clap::{Parser, Subcommand};
use queue_watch::{
    cmd::{PollOnceArgs, StatsArgs, poll_once, stats},
    config::AppConfig,
    notification::create_notifier,
    persistence::TextFileStatisticsSink,
    providers::CheckpointApiFetcher,
    supervisor::Supervisor,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing `app.yaml`.
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the queue monitor and the command API.
    Run,
    /// Prints the hourly departure statistics for a date range.
    Stats(StatsArgs),
    /// Fetches one snapshot and prints it.
    PollOnce(PollOnceArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config_dir = cli.config_dir.as_deref();

    match cli.command {
        Commands::Run => run_supervisor(config_dir).await?,
        Commands::Stats(args) => stats::execute(args, config_dir).await?,
        Commands::PollOnce(args) => poll_once::execute(args, config_dir).await?,
    }

    Ok(())
}

async fn run_supervisor(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(config_dir)?;
    tracing::debug!(
        checkpoint_url = %config.checkpoint_url,
        statistics_path = %config.statistics_path.display(),
        notifier = ?config.notifier,
        "Configuration loaded."
    );

    let fetcher = CheckpointApiFetcher::new(&config.checkpoint_url, config.fetch_timeout_secs)?;
    let notifier = create_notifier(&config)?;
    let statistics = TextFileStatisticsSink::new(config.statistics_path.clone());

    let supervisor = Supervisor::builder()
        .config(config)
        .fetcher(Arc::new(fetcher))
        .notifier(notifier)
        .statistics(Arc::new(statistics))
        .build()?;

    tracing::info!("Supervisor initialized, starting monitoring...");

    supervisor.run().await?;

    Ok(())
}
