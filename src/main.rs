use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_board::game::{Direction, GameConfig};
use snake_board::modes::HumanMode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snake_board")]
#[command(version, about = "Snake on a grid, steered from the terminal")]
struct Cli {
    /// TOML file with board settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between two moves
    #[arg(long)]
    speed: Option<u64>,

    /// Starting column of the head
    #[arg(long)]
    start_x: Option<usize>,

    /// Starting row of the head, counted from the bottom
    #[arg(long)]
    start_y: Option<usize>,

    /// Starting direction
    #[arg(long, value_enum)]
    direction: Option<Heading>,

    /// Initial snake length (at least 3)
    #[arg(long)]
    length: Option<usize>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl From<Heading> for Direction {
    fn from(heading: Heading) -> Self {
        match heading {
            Heading::Up => Direction::Up,
            Heading::Down => Direction::Down,
            Heading::Left => Direction::Left,
            Heading::Right => Direction::Right,
        }
    }
}

impl Cli {
    /// Defaults, then the config file, then command line flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(speed) = self.speed {
            config.tick_interval_ms = speed;
        }
        if let Some(x) = self.start_x {
            config.start_x = x;
        }
        if let Some(y) = self.start_y {
            config.start_y = y;
        }
        if let Some(direction) = self.direction {
            config.start_direction = direction.into();
        }
        if let Some(length) = self.length {
            config.snake_length = length;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        Ok(config)
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "snake_board=info".into());

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let config = cli.game_config()?;
    tracing::info!(?config, "starting session");

    let mut human_mode = HumanMode::new(config);
    human_mode.run().await?;

    Ok(())
}
