use thiserror::Error;

/// Errors raised when constructing, seeding or rebuilding a grid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    /// Grid dimension must be at least 1.
    #[error("grid dimension must be non-zero")]
    ZeroDimension,
    /// Wraparound uses a bitmask, so the dimension must be a power of two.
    #[error("grid dimension {0} is not a power of two")]
    NotPowerOfTwo(usize),
    /// N² cells would not fit in memory addressing.
    #[error("grid dimension {0} is too large: its cell count overflows usize")]
    DimensionTooLarge(usize),
    /// The pattern would overlap itself on the torus.
    #[error("pattern {name} spans {extent} cells, larger than a {dimension}x{dimension} grid")]
    PatternTooLarge {
        name: &'static str,
        extent: usize,
        dimension: usize,
    },
    #[error("cell index {index} is out of range for a grid of {len} cells")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cell ({row}, {col}) is out of range for a {dimension}x{dimension} grid")]
    CoordOutOfRange {
        row: usize,
        col: usize,
        dimension: usize,
    },
    #[error("buffer holds {actual} cells, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    /// Raw cell bytes may only be 0 (dead) or 1 (alive).
    #[error("invalid cell byte {value:#04x} at index {index}")]
    InvalidCellByte { index: usize, value: u8 },
    #[error("random fill density {0} is outside 0.0..=1.0")]
    InvalidDensity(f64),
}

/// Errors raised while reading the run configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid value: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}
