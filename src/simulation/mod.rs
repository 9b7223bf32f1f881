mod buffers;
mod cell;
mod engine;
mod grid;
pub mod patterns;

pub use buffers::GridBuffers;
pub use cell::{Cell, Transition};
pub use engine::{Engine, StepStats};
pub use grid::{validate_dimension, Grid, NEIGHBOR_OFFSETS};
pub use patterns::Pattern;
