//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The snake body is stored as a list of shape segments; the board anchors it on
//! the grid, drains queued turns once per tick and projects everything onto a
//! grid of cells for whoever renders it.

pub mod board;
pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod snake;

// Re-export commonly used types
pub use board::{Board, BoardStatus, CrashCause, TickOutcome};
pub use config::GameConfig;
pub use direction::{Direction, TurnDirection};
pub use error::{BoardError, CollisionError, ConfigError};
pub use grid::{Cell, Grid, Position};
pub use snake::{Segment, SegmentRole, Snake};
