use std::path::PathBuf;

use thiserror::Error;

use super::board::CrashCause;

/// A move would make the snake overlap itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("snake body collides with itself after segment {index}")]
pub struct CollisionError {
    /// Traversal index of the segment whose step entered an occupied cell
    pub index: usize,
}

impl CollisionError {
    pub fn collision_index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("game is over ({0}), start a new board to play again")]
    GameOver(CrashCause),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
