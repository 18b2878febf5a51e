//! Snake Board - a snake game whose body is a list of shape segments
//!
//! This library provides:
//! - Core game logic: directions, the segment-encoded snake, the board (game module)
//! - Keyboard mapping for the terminal front end (input module)
//! - TUI rendering of board snapshots (render module)
//! - The interactive terminal session (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
