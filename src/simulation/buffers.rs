use crate::error::GridError;
use crate::simulation::grid::Grid;

/// Ping-pong pair of equally sized grids.
///
/// One grid is read (the current generation) while the other is written (the
/// next generation); `swap` flips the roles without copying.
#[derive(Clone, Debug)]
pub struct GridBuffers {
    /// Buffer A - ping
    buffer_a: Grid,
    /// Buffer B - pong
    buffer_b: Grid,
    /// Which buffer is current input (true = A is input, false = B is input)
    read_from_a: bool,
}

impl GridBuffers {
    /// Allocate two all-dead grids of the given dimension.
    pub fn new(dimension: usize) -> Result<Self, GridError> {
        let buffer_a = Grid::new(dimension)?;
        let buffer_b = buffer_a.clone();
        Ok(Self {
            buffer_a,
            buffer_b,
            read_from_a: true,
        })
    }

    /// Use `initial` as the current generation.
    pub fn with_initial(initial: Grid) -> Self {
        let mut buffer_b = initial.clone();
        buffer_b.clear();
        Self {
            buffer_a: initial,
            buffer_b,
            read_from_a: true,
        }
    }

    /// Current generation.
    pub fn current(&self) -> &Grid {
        if self.read_from_a {
            &self.buffer_a
        } else {
            &self.buffer_b
        }
    }

    /// Current generation, for seeding before a step.
    pub fn current_mut(&mut self) -> &mut Grid {
        if self.read_from_a {
            &mut self.buffer_a
        } else {
            &mut self.buffer_b
        }
    }

    /// Get (input, output) for the step in progress
    pub fn io_buffers(&mut self) -> (&Grid, &mut Grid) {
        if self.read_from_a {
            (&self.buffer_a, &mut self.buffer_b)
        } else {
            (&self.buffer_b, &mut self.buffer_a)
        }
    }

    /// Swap buffers after a full pass
    pub fn swap(&mut self) {
        self.read_from_a = !self.read_from_a;
    }
}
