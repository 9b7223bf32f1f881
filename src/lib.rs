//! Conway's Game of Life on a fixed-size toroidal grid.
//!
//! The grid is N×N with N a power of two; edges wrap around. [`Engine`] owns
//! two equally sized cell buffers and advances them one generation at a time
//! under the B3/S23 rule.

pub mod config;
pub mod error;
pub mod simulation;

pub use error::{ConfigError, GridError};
pub use simulation::{Cell, Engine, Grid, StepStats, Transition};
