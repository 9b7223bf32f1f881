use std::str::FromStr;

use crate::error::{ConfigError, GridError};
use crate::simulation::patterns::{self, Pattern};
use crate::simulation::validate_dimension;

/// Grid dimension (4x4 = 16 cells). Must be a power of two.
pub const DEFAULT_DIMENSION: usize = 1 << 2;

/// Generations to compute when none are configured
pub const DEFAULT_GENERATIONS: u64 = 4;

/// Probability that a cell starts alive under random seeding
pub const DEFAULT_DENSITY: f64 = 0.25;

/// Pattern placed when none is configured: a vertical line in column 0, rows 1-3
pub const DEFAULT_PATTERN: &Pattern = &patterns::BLINKER;
pub const DEFAULT_ORIGIN: (usize, usize) = (1, 0);

/// Seconds between throughput reports while running
pub const REPORT_INTERVAL_SECS: f64 = 1.0;

/// Environment variables read by [`RunConfig::from_env`]
pub const ENV_DIMENSION: &str = "LIFE_DIMENSION";
pub const ENV_GENERATIONS: &str = "LIFE_GENERATIONS";
pub const ENV_PATTERN: &str = "LIFE_PATTERN";
pub const ENV_ORIGIN: &str = "LIFE_ORIGIN";
pub const ENV_DENSITY: &str = "LIFE_DENSITY";
pub const ENV_SEED: &str = "LIFE_SEED";
pub const ENV_PARALLEL: &str = "LIFE_PARALLEL";

/// How the grid is populated before the first step.
#[derive(Debug, Clone, Copy)]
pub enum Seeding {
    /// Place a named pattern with its top-left corner at `origin`
    Pattern {
        pattern: &'static Pattern,
        origin: (usize, usize),
    },
    /// Fill randomly; `seed` makes the fill reproducible
    Random { density: f64, seed: Option<u64> },
}

/// Settings for one headless run.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub dimension: usize,
    pub generations: u64,
    pub seeding: Seeding,
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            generations: DEFAULT_GENERATIONS,
            seeding: Seeding::Pattern {
                pattern: DEFAULT_PATTERN,
                origin: DEFAULT_ORIGIN,
            },
            parallel: false,
        }
    }
}

impl RunConfig {
    /// Read overrides from `LIFE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from `lookup`, falling back to defaults for missing names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dimension) = parse_var::<usize, _>(&lookup, ENV_DIMENSION)? {
            config.dimension = dimension;
        }
        validate_dimension(config.dimension)?;

        if let Some(generations) = parse_var::<u64, _>(&lookup, ENV_GENERATIONS)? {
            config.generations = generations;
        }

        if let Some(parallel) = lookup(ENV_PARALLEL) {
            config.parallel = parse_flag(ENV_PARALLEL, &parallel)?;
        }

        let pattern_name = lookup(ENV_PATTERN);
        let random = pattern_name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case("random"));
        config.seeding = if random {
            let density = parse_var::<f64, _>(&lookup, ENV_DENSITY)?.unwrap_or(DEFAULT_DENSITY);
            if !(0.0..=1.0).contains(&density) {
                return Err(invalid(ENV_DENSITY, &density.to_string(), "must be within 0.0..=1.0"));
            }
            Seeding::Random {
                density,
                seed: parse_var::<u64, _>(&lookup, ENV_SEED)?,
            }
        } else {
            let pattern = match pattern_name {
                Some(name) => patterns::find(&name).ok_or(ConfigError::UnknownPattern(name))?,
                None => DEFAULT_PATTERN,
            };
            let extent = pattern.extent();
            if extent > config.dimension {
                return Err(GridError::PatternTooLarge {
                    name: pattern.name,
                    extent,
                    dimension: config.dimension,
                }
                .into());
            }
            let origin = match lookup(ENV_ORIGIN) {
                Some(raw) => parse_origin(&raw)?,
                None => DEFAULT_ORIGIN,
            };
            if origin.0 >= config.dimension || origin.1 >= config.dimension {
                return Err(invalid(
                    ENV_ORIGIN,
                    &format!("{},{}", origin.0, origin.1),
                    "lies outside the grid",
                ));
            }
            Seeding::Pattern { pattern, origin }
        };

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid(name, &raw, &e.to_string())),
        None => Ok(None),
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(name, raw, "expected a boolean")),
    }
}

/// Parse `"row,col"`.
fn parse_origin(raw: &str) -> Result<(usize, usize), ConfigError> {
    let bad = || invalid(ENV_ORIGIN, raw, "expected \"row,col\"");
    let (row, col) = raw.split_once(',').ok_or_else(bad)?;
    let row = row.trim().parse().map_err(|_| bad())?;
    let col = col.trim().parse().map_err(|_| bad())?;
    Ok((row, col))
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
