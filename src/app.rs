use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use toroidal_life::config::{RunConfig, Seeding, REPORT_INTERVAL_SECS};
use toroidal_life::{Engine, GridError, StepStats};

/// Headless runner state
pub struct App {
    engine: Engine,
    config: RunConfig,
    rate_counter: RateCounter,
}

impl App {
    /// Build and seed the engine described by `config`.
    pub fn new(config: RunConfig) -> Result<Self, GridError> {
        log::info!("Grid size: {0}x{0}", config.dimension);
        let mut engine = Engine::new(config.dimension)?;

        match config.seeding {
            Seeding::Pattern { pattern, origin } => {
                log::info!("Seeding {} at ({}, {})", pattern.name, origin.0, origin.1);
                engine.seed_pattern(pattern, origin)?;
            }
            Seeding::Random { density, seed } => {
                let mut rng = match seed {
                    Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                    None => ChaCha8Rng::from_entropy(),
                };
                log::info!("Seeding randomly at density {:.2}", density);
                engine.seed_random(&mut rng, density)?;
            }
        }
        log::info!("Initial population: {}", engine.population());

        Ok(Self {
            engine,
            config,
            rate_counter: RateCounter::new(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compute the configured number of generations.
    pub fn run(&mut self) -> StepStats {
        let mut total = StepStats {
            population: self.engine.population(),
            ..StepStats::default()
        };
        let started = Instant::now();

        for _ in 0..self.config.generations {
            let stats = if self.config.parallel {
                self.engine.step_parallel()
            } else {
                self.engine.step()
            };
            total.births += stats.births;
            total.deaths += stats.deaths;
            total.population = stats.population;

            if let Some(rate) = self.rate_counter.tick() {
                log::info!(
                    "Generation {} - {:.0} gen/s - {} alive",
                    self.engine.generation(),
                    rate,
                    stats.population
                );
            }

            if stats.population == 0 {
                log::info!("Population died out at generation {}", self.engine.generation());
                break;
            }
        }

        log::info!(
            "Finished {} generations in {:.3}s: {} births, {} deaths, {} alive",
            self.engine.generation(),
            started.elapsed().as_secs_f64(),
            total.births,
            total.deaths,
            total.population
        );
        total
    }
}

/// Simple generations-per-second counter
struct RateCounter {
    last_update: Instant,
    step_count: u32,
}

impl RateCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            step_count: 0,
        }
    }

    /// Tick the counter, returns Some(rate) every report interval
    fn tick(&mut self) -> Option<f64> {
        self.step_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= REPORT_INTERVAL_SECS {
            let rate = self.step_count as f64 / elapsed.as_secs_f64();
            self.step_count = 0;
            self.last_update = Instant::now();
            Some(rate)
        } else {
            None
        }
    }
}
