use rand::Rng;
use rayon::prelude::*;

use crate::error::GridError;
use crate::simulation::buffers::GridBuffers;
use crate::simulation::cell::{Cell, Transition};
use crate::simulation::grid::{wrap, Grid};
use crate::simulation::patterns::Pattern;

/// Counts gathered while computing one or more generations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Cells born by reproduction
    pub births: usize,
    /// Cells lost to under- or overpopulation
    pub deaths: usize,
    /// Living cells after the last step
    pub population: usize,
}

impl StepStats {
    fn record(&mut self, transition: Transition) {
        match transition {
            Transition::Reproduction => self.births += 1,
            Transition::Underpopulation | Transition::Overpopulation => self.deaths += 1,
            Transition::Stasis | Transition::Survival => {}
        }
    }

    fn merge(self, other: StepStats) -> StepStats {
        StepStats {
            births: self.births + other.births,
            deaths: self.deaths + other.deaths,
            population: other.population,
        }
    }
}

/// Game of Life on a toroidal N×N grid, advanced with a pair of ping-pong buffers.
///
/// Every step reads only the current generation and fully overwrites the next
/// one before the buffers swap, so cells never see a neighbor's new state
/// within the same generation.
#[derive(Clone, Debug)]
pub struct Engine {
    buffers: GridBuffers,
    generation: u64,
}

impl Engine {
    /// Create an engine with an all-dead grid. `dimension` must be a non-zero power of two.
    pub fn new(dimension: usize) -> Result<Self, GridError> {
        let buffers = GridBuffers::new(dimension)?;
        log::debug!("Engine created: {0}x{0} cells", dimension);
        Ok(Self {
            buffers,
            generation: 0,
        })
    }

    /// Start from an existing grid as generation 0.
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            buffers: GridBuffers::with_initial(grid),
            generation: 0,
        }
    }

    pub fn dimension(&self) -> usize {
        self.current().dimension()
    }

    /// Current generation's cells.
    pub fn current(&self) -> &Grid {
        self.buffers.current()
    }

    /// Number of steps taken so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.current().population()
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.current().get(index)
    }

    /// Mark the given indices alive. Nothing changes if any index is out of range.
    pub fn seed(&mut self, indices: &[usize]) -> Result<(), GridError> {
        let grid = self.buffers.current_mut();
        let len = grid.len();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(GridError::IndexOutOfRange { index, len });
        }
        for &index in indices {
            grid.set(index, Cell::Alive)?;
        }
        log::debug!("Seeded {} cells", indices.len());
        Ok(())
    }

    /// Mark the given `(row, col)` cells alive. Nothing changes if any is out of range.
    pub fn seed_coords(&mut self, coords: &[(usize, usize)]) -> Result<(), GridError> {
        let grid = self.current();
        let indices = coords
            .iter()
            .map(|&(row, col)| grid.index_of(row, col))
            .collect::<Result<Vec<_>, _>>()?;
        self.seed(&indices)
    }

    /// Place `pattern` with its top-left corner at `origin`, wrapping around the edges.
    ///
    /// Patterns wider or taller than the grid are rejected.
    pub fn seed_pattern(&mut self, pattern: &Pattern, origin: (usize, usize)) -> Result<(), GridError> {
        let n = self.dimension();
        self.current().index_of(origin.0, origin.1)?;
        let extent = pattern.extent();
        if extent > n {
            return Err(GridError::PatternTooLarge {
                name: pattern.name,
                extent,
                dimension: n,
            });
        }

        let indices: Vec<usize> = pattern
            .cells
            .iter()
            .map(|&(dr, dc)| {
                let row = wrap(origin.0, (dr % n) as isize, n);
                let col = wrap(origin.1, (dc % n) as isize, n);
                row * n + col
            })
            .collect();
        log::debug!("Placing {} at ({}, {})", pattern.name, origin.0, origin.1);
        self.seed(&indices)
    }

    /// Fill the current grid randomly, each cell alive with probability `density`.
    pub fn seed_random<R: Rng>(&mut self, rng: &mut R, density: f64) -> Result<(), GridError> {
        let grid = self.buffers.current_mut();
        grid.randomize(rng, density)?;
        log::debug!("Random fill at density {:.2}: {} alive", density, grid.population());
        Ok(())
    }

    /// Living neighbors of a cell in the current generation.
    pub fn count_living_neighbors(&self, index: usize) -> Result<u8, GridError> {
        self.current().count_living_neighbors(index)
    }

    /// State a cell will have after the next step.
    pub fn next_cell_state(&self, index: usize) -> Result<Cell, GridError> {
        self.current().next_cell_state(index)
    }

    /// Advance one generation, visiting cells in index order.
    pub fn step(&mut self) -> StepStats {
        let (input, output) = self.buffers.io_buffers();
        let mut stats = StepStats::default();

        for (index, next) in output.cells_mut().iter_mut().enumerate() {
            let transition = input.transition_at(index);
            stats.record(transition);
            *next = transition.outcome();
        }

        self.finish_step(stats)
    }

    /// Advance one generation, computing rows on the rayon thread pool.
    ///
    /// Produces exactly the same grid as [`Engine::step`].
    pub fn step_parallel(&mut self) -> StepStats {
        let (input, output) = self.buffers.io_buffers();
        let n = input.dimension();

        let stats = output
            .cells_mut()
            .par_chunks_mut(n)
            .enumerate()
            .map(|(row, cells)| {
                let mut stats = StepStats::default();
                for (col, next) in cells.iter_mut().enumerate() {
                    let transition = input.transition_at(row * n + col);
                    stats.record(transition);
                    *next = transition.outcome();
                }
                stats
            })
            .reduce(StepStats::default, StepStats::merge);

        self.finish_step(stats)
    }

    /// Take `generations` steps and return the combined counts.
    pub fn run(&mut self, generations: u64) -> StepStats {
        let mut total = StepStats {
            population: self.population(),
            ..StepStats::default()
        };
        for _ in 0..generations {
            total = total.merge(self.step());
        }
        total
    }

    /// Text dump of the current generation.
    pub fn dump(&self) -> String {
        self.current().to_string()
    }

    fn finish_step(&mut self, mut stats: StepStats) -> StepStats {
        self.buffers.swap();
        self.generation += 1;
        stats.population = self.population();
        log::debug!(
            "Generation {}: {} alive (+{} -{})",
            self.generation,
            stats.population,
            stats.births,
            stats.deaths
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::patterns;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn alive_indices(engine: &Engine) -> Vec<usize> {
        engine
            .current()
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .map(|(index, _)| index)
            .collect()
    }

    #[test]
    fn test_golden_vertical_line_4x4() {
        let mut engine = Engine::new(4).unwrap();
        engine.seed(&[4, 8, 12]).unwrap();

        let stats = engine.step();
        assert_eq!(alive_indices(&engine), vec![8, 9, 11]);
        assert_eq!(
            engine.dump(),
            "0 0 0 0\n0 0 0 0\n1 1 0 1\n0 0 0 0\n\n"
        );
        assert_eq!(
            stats,
            StepStats {
                births: 2,
                deaths: 2,
                population: 3
            }
        );

        engine.step();
        assert_eq!(alive_indices(&engine), vec![4, 8, 12]);
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let mut engine = Engine::new(8).unwrap();
        for _ in 0..10 {
            let stats = engine.step();
            assert_eq!(stats, StepStats::default());
        }
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn test_isolated_cell_dies() {
        let mut engine = Engine::new(8).unwrap();
        engine.seed_coords(&[(4, 4)]).unwrap();
        let stats = engine.step();
        assert_eq!(stats.deaths, 1);
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn test_blinker_period_two() {
        let mut engine = Engine::new(8).unwrap();
        engine
            .seed_pattern(patterns::find("blinker").unwrap(), (2, 3))
            .unwrap();
        let gen0 = engine.current().clone();

        engine.step();
        let gen1 = engine.current().clone();
        assert_ne!(gen0, gen1);
        assert_eq!(alive_indices(&engine), vec![3 * 8 + 2, 3 * 8 + 3, 3 * 8 + 4]);

        for _ in 0..5 {
            engine.step();
            assert_eq!(engine.current().as_bytes(), gen0.as_bytes());
            engine.step();
            assert_eq!(engine.current().as_bytes(), gen1.as_bytes());
        }
    }

    #[test]
    fn test_toad_and_beacon_period_two() {
        for name in ["toad", "beacon"] {
            let mut engine = Engine::new(8).unwrap();
            engine
                .seed_pattern(patterns::find(name).unwrap(), (2, 2))
                .unwrap();
            let gen0 = engine.current().clone();

            engine.step();
            let gen1 = engine.current().clone();
            assert_ne!(gen0, gen1, "{} did not change", name);

            for _ in 0..4 {
                engine.step();
                assert_eq!(engine.current(), &gen0, "{} lost period 2", name);
                engine.step();
                assert_eq!(engine.current(), &gen1, "{} lost period 2", name);
            }
        }
    }

    #[test]
    fn test_pattern_larger_than_grid_rejected() {
        let mut engine = Engine::new(2).unwrap();
        assert_eq!(
            engine.seed_pattern(&patterns::BLINKER, (0, 0)),
            Err(GridError::PatternTooLarge {
                name: "Blinker",
                extent: 3,
                dimension: 2
            })
        );
        assert_eq!(engine.population(), 0);

        let mut engine = Engine::new(4).unwrap();
        assert!(engine.seed_pattern(patterns::find("beacon").unwrap(), (0, 0)).is_ok());
        assert_eq!(engine.population(), 8);
    }

    #[test]
    fn test_block_is_stable() {
        let mut engine = Engine::new(8).unwrap();
        engine
            .seed_pattern(patterns::find("block").unwrap(), (3, 3))
            .unwrap();
        let initial = engine.current().clone();
        for _ in 0..20 {
            let stats = engine.step();
            assert_eq!(stats.births + stats.deaths, 0);
            assert_eq!(engine.current(), &initial);
        }
    }

    #[test]
    fn test_block_across_corner_is_stable() {
        let mut engine = Engine::new(4).unwrap();
        engine
            .seed_pattern(patterns::find("block").unwrap(), (3, 3))
            .unwrap();
        assert_eq!(alive_indices(&engine), vec![0, 3, 12, 15]);
        let initial = engine.current().clone();
        engine.run(4);
        assert_eq!(engine.current(), &initial);
    }

    #[test]
    fn test_glider_returns_after_full_lap() {
        // A glider moves one cell diagonally every 4 generations
        let mut engine = Engine::new(8).unwrap();
        engine
            .seed_pattern(patterns::find("glider").unwrap(), (0, 0))
            .unwrap();
        let initial = engine.current().clone();

        engine.run(4);
        assert_eq!(engine.population(), 5);
        assert_ne!(engine.current(), &initial);

        engine.run(4 * 8 - 4);
        assert_eq!(engine.current(), &initial);
    }

    #[test]
    fn test_step_keeps_dimension_and_drops_stale_cells() {
        let mut engine = Engine::new(16).unwrap();
        engine.seed_random(&mut ChaCha8Rng::seed_from_u64(3), 0.4).unwrap();
        for _ in 0..30 {
            let expected: Vec<Cell> = (0..engine.current().len())
                .map(|index| engine.next_cell_state(index).unwrap())
                .collect();
            engine.step();
            assert_eq!(engine.dimension(), 16);
            assert_eq!(engine.current().len(), 256);
            assert_eq!(engine.current().cells(), expected.as_slice());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for n in [2usize, 4, 32, 64] {
            let mut sequential = Engine::new(n).unwrap();
            sequential.seed_random(&mut rng, 0.35).unwrap();
            let mut parallel = sequential.clone();

            for _ in 0..12 {
                let a = sequential.step();
                let b = parallel.step_parallel();
                assert_eq!(a, b);
                assert_eq!(sequential.current(), parallel.current());
            }
            assert_eq!(sequential.generation(), parallel.generation());
        }
    }

    #[test]
    fn test_seed_out_of_range_leaves_grid_untouched() {
        let mut engine = Engine::new(4).unwrap();
        assert_eq!(
            engine.seed(&[1, 2, 16]),
            Err(GridError::IndexOutOfRange { index: 16, len: 16 })
        );
        assert_eq!(engine.population(), 0);

        assert_eq!(
            engine.seed_coords(&[(0, 0), (0, 4)]),
            Err(GridError::CoordOutOfRange {
                row: 0,
                col: 4,
                dimension: 4
            })
        );
        assert_eq!(engine.population(), 0);

        assert!(engine
            .seed_pattern(patterns::find("glider").unwrap(), (4, 0))
            .is_err());
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert_eq!(Engine::new(0).unwrap_err(), GridError::ZeroDimension);
        assert_eq!(Engine::new(6).unwrap_err(), GridError::NotPowerOfTwo(6));
    }

    #[test]
    fn test_from_grid_starts_at_generation_zero() {
        let grid = Grid::from_bytes(2, &[1, 1, 1, 1]).unwrap();
        let mut engine = Engine::from_grid(grid);
        assert_eq!(engine.generation(), 0);
        // On a 2x2 torus every cell sees each other cell more than once
        assert_eq!(engine.count_living_neighbors(0).unwrap(), 8);
        engine.step();
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn test_run_accumulates_stats() {
        let mut engine = Engine::new(4).unwrap();
        engine.seed(&[4, 8, 12]).unwrap();
        let stats = engine.run(3);
        assert_eq!(
            stats,
            StepStats {
                births: 6,
                deaths: 6,
                population: 3
            }
        );
        assert_eq!(engine.generation(), 3);
    }
}
