use std::fmt;

use rand::Rng;

use crate::error::GridError;
use crate::simulation::cell::{Cell, Transition};

/// Row/column offsets of the eight neighbors, clockwise from the top-left.
///
/// ```text
/// [- -] [- 0] [- +]
/// [0 -]       [0 +]
/// [+ -] [+ 0] [+ +]
/// ```
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Check that `dimension` can back a toroidal grid and return its cell count.
pub fn validate_dimension(dimension: usize) -> Result<usize, GridError> {
    if dimension == 0 {
        return Err(GridError::ZeroDimension);
    }
    if !dimension.is_power_of_two() {
        return Err(GridError::NotPowerOfTwo(dimension));
    }
    dimension
        .checked_mul(dimension)
        .ok_or(GridError::DimensionTooLarge(dimension))
}

/// Move `coord` by `offset` along a toroidal axis of length `dimension`.
///
/// The result is always in `0..dimension`: moving left from 0 lands on
/// `dimension - 1`. `dimension` must be a power of two, which lets the
/// two's-complement wrap of the addition be folded back into range by a mask.
///
/// # Correctness
///
/// `dimension` is not checked in release builds. Callers pass the dimension of
/// a constructed [`Grid`], which [`validate_dimension`] has already accepted.
#[inline]
pub(crate) fn wrap(coord: usize, offset: isize, dimension: usize) -> usize {
    debug_assert!(dimension.is_power_of_two());
    coord.wrapping_add_signed(offset) & (dimension - 1)
}

/// Square N×N grid of cells stored row-major (index = row * N + col).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimension: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-dead grid. `dimension` must be a non-zero power of two.
    pub fn new(dimension: usize) -> Result<Self, GridError> {
        let len = validate_dimension(dimension)?;
        Ok(Self {
            dimension,
            cells: vec![Cell::Dead; len],
        })
    }

    /// Rebuild a grid from one byte per cell (0 = dead, 1 = alive).
    pub fn from_bytes(dimension: usize, bytes: &[u8]) -> Result<Self, GridError> {
        let expected = validate_dimension(dimension)?;
        if bytes.len() != expected {
            return Err(GridError::BufferLength {
                expected,
                actual: bytes.len(),
            });
        }

        let cells: &[Cell] = bytemuck::checked::try_cast_slice(bytes).map_err(|_| {
            // Report the first offending byte rather than bytemuck's generic error
            let (index, &value) = bytes
                .iter()
                .enumerate()
                .find(|(_, &b)| b > 1)
                .unwrap_or((0, &bytes[0]));
            GridError::InvalidCellByte { index, value }
        })?;

        Ok(Self {
            dimension,
            cells: cells.to_vec(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of cells (N²).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Raw view of the buffer, one 0/1 byte per cell.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Flat index of `(row, col)`.
    pub fn index_of(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.dimension || col >= self.dimension {
            return Err(GridError::CoordOutOfRange {
                row,
                col,
                dimension: self.dimension,
            });
        }
        Ok(row * self.dimension + col)
    }

    /// `(row, col)` of a flat index.
    pub fn coords_of(&self, index: usize) -> Result<(usize, usize), GridError> {
        self.check_index(index)?;
        Ok((index / self.dimension, index % self.dimension))
    }

    pub fn set(&mut self, index: usize, cell: Cell) -> Result<(), GridError> {
        self.check_index(index)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Mark every cell dead.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        self.as_bytes().iter().map(|&b| b as usize).sum()
    }

    /// Fill the grid randomly, each cell alive with probability `density`.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, density: f64) -> Result<(), GridError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidDensity(density));
        }
        for cell in &mut self.cells {
            *cell = Cell::from(rng.gen_bool(density));
        }
        Ok(())
    }

    /// Living neighbors of the cell at `index`, with toroidal wraparound.
    pub fn count_living_neighbors(&self, index: usize) -> Result<u8, GridError> {
        self.check_index(index)?;
        Ok(self.living_neighbors(index))
    }

    /// State of the cell at `index` in the next generation, derived from this grid only.
    pub fn next_cell_state(&self, index: usize) -> Result<Cell, GridError> {
        self.check_index(index)?;
        Ok(self.transition_at(index).outcome())
    }

    /// Rule that decides the cell at `index`. `index` must be in range.
    pub(crate) fn transition_at(&self, index: usize) -> Transition {
        self.cells[index].transition(self.living_neighbors(index))
    }

    fn living_neighbors(&self, index: usize) -> u8 {
        debug_assert!(index < self.cells.len());
        let n = self.dimension;
        let (row, col) = (index / n, index % n);
        let bytes = self.as_bytes();

        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dr, dc)| bytes[wrap(row, dr, n) * n + wrap(col, dc, n)])
            .sum()
    }

    fn check_index(&self, index: usize) -> Result<(), GridError> {
        if index >= self.cells.len() {
            return Err(GridError::IndexOutOfRange {
                index,
                len: self.cells.len(),
            });
        }
        Ok(())
    }
}

/// One line per row, values separated by spaces, then a final blank line.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.dimension) {
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", u8::from(*cell))?;
            }
            f.write_str("\n")?;
        }
        f.write_str("\n")
    }
}
