use anyhow::{Context, Result, anyhow};
use arcade_snake::game::GameConfig;
use arcade_snake::modes::{BoxedStore, HumanMode};
use arcade_snake::store::{JsonScoreStore, MemoryScoreStore, json::DEFAULT_SCORE_FILE};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Snake with levels, walls, bonus and hazard food")]
struct Cli {
    /// JSON file with game settings; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Seed for food, wall and special item placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where the best score is kept
    #[arg(long, default_value = DEFAULT_SCORE_FILE)]
    score_file: PathBuf,

    /// Keep the best score in memory only
    #[arg(long)]
    no_save: bool,

    /// Log file; filtering follows RUST_LOG (default: warn)
    #[arg(long, default_value = "arcade_snake.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    config.validate()?;

    let store: BoxedStore = if cli.no_save {
        Box::new(MemoryScoreStore::new())
    } else {
        Box::new(JsonScoreStore::new(&cli.score_file))
    };

    info!(
        width = config.grid_width,
        height = config.grid_height,
        seed = ?cli.seed,
        "starting session"
    );

    let mut human_mode = HumanMode::new(config, store, cli.seed);
    human_mode.run().await?;

    Ok(())
}

/// Logs go to a file so they never tear the terminal UI
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to install log subscriber: {err}"))
}
