use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::error::ConfigError;
use super::snake::MIN_SNAKE_LENGTH;

/// Largest grid side whose coordinates fit in an `i32`
const MAX_GRID_SIDE: usize = i32::MAX as usize;

/// Configuration for a board session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Time between two ticks, in milliseconds
    pub tick_interval_ms: u64,
    /// Column of the snake's head when the game starts
    pub start_x: usize,
    /// Row of the snake's head when the game starts
    pub start_y: usize,
    /// Direction the snake faces when the game starts
    pub start_direction: Direction,
    /// Initial length of the snake
    pub snake_length: usize,
    /// Seed for food placement. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 10,
            grid_height: 20,
            tick_interval_ms: 500,
            start_x: 0,
            start_y: 0,
            start_direction: Direction::Up,
            snake_length: MIN_SNAKE_LENGTH,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Clamp out-of-range values into something a board can run with.
    ///
    /// The grid is at least 1x1 and at most `i32::MAX` cells per side so every
    /// cell has an `i32` coordinate. Ticks are at least 1ms apart, the snake
    /// has at least `MIN_SNAKE_LENGTH` segments and starts inside the grid.
    pub fn normalized(&self) -> Self {
        let grid_width = self.grid_width.clamp(1, MAX_GRID_SIDE);
        let grid_height = self.grid_height.clamp(1, MAX_GRID_SIDE);

        Self {
            grid_width,
            grid_height,
            tick_interval_ms: self.tick_interval_ms.max(1),
            start_x: self.start_x.min(grid_width - 1),
            start_y: self.start_y.min(grid_height - 1),
            start_direction: self.start_direction,
            snake_length: self.snake_length.max(MIN_SNAKE_LENGTH),
            seed: self.seed,
        }
    }
}
