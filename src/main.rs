use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use swipe_snake::game::GameConfig;
use swipe_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "swipe_snake")]
#[command(version, about = "Snake steered by mouse drags or the keyboard")]
struct Cli {
    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum board width in cells
    #[arg(long)]
    cols: Option<u16>,

    /// Initial milliseconds between moves
    #[arg(long)]
    speed: Option<u64>,

    /// End the round when the snake runs into itself
    #[arg(long)]
    self_collision: bool,

    /// Write log output to this file (defaults to the temp directory when
    /// RUST_LOG is set)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Where log records go. The terminal UI owns stderr, so records are only
/// ever written to a file: the one given on the command line or, when
/// `RUST_LOG` asks for output without one, a file in the temp directory.
fn log_destination(log_file: Option<&Path>, rust_log_set: bool) -> Option<PathBuf> {
    match log_file {
        Some(path) => Some(path.to_path_buf()),
        None if rust_log_set => Some(std::env::temp_dir().join("swipe_snake.log")),
        None => None,
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::from_default_env();

    match log_destination(log_file, rust_log_set) {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            if !rust_log_set {
                builder.filter_level(log::LevelFilter::Info);
            }
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    // A logger may already be installed by an embedding host
    let _ = builder.try_init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(cols) = cli.cols {
        config.layout.cols = cols;
    }
    if let Some(speed) = cli.speed {
        config.initial_speed = speed;
    }
    if cli.self_collision {
        config.self_collision = true;
    }

    if let Err(msg) = config.validate() {
        bail!("Invalid configuration: {}", msg);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;
    let config = load_config(&cli)?;
    log::info!("starting with {:?}", config);

    let mut human_mode = HumanMode::for_terminal(config)?;
    human_mode.run().await?;

    Ok(())
}
