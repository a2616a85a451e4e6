//! Configuration for property checks.

use std::fmt;

/// Number of iterations a check runs when none is configured
pub const DEFAULT_ITERATIONS: usize = 200;

/// Environment variable overriding the iteration count
pub const ITERATIONS_ENV: &str = "FALSIFY_ITERATIONS";

/// Environment variable pinning the generation seed
pub const SEED_ENV: &str = "FALSIFY_SEED";

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid number of iterations (must be > 0)
    InvalidIterations(usize),
    /// Invalid shrink step cap (must be > 0)
    InvalidShrinkSteps(usize),
    /// An environment override could not be parsed
    InvalidEnvValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidIterations(n) => {
                write!(f, "Invalid iterations count: {} (must be > 0)", n)
            }
            ConfigError::InvalidShrinkSteps(n) => {
                write!(f, "Invalid shrink step cap: {} (must be > 0)", n)
            }
            ConfigError::InvalidEnvValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for a single property check
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckConfig {
    /// Number of values to draw and evaluate
    pub iterations: usize,
    /// Generation seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// Cap on accepted shrink steps; unbounded when absent
    pub max_shrink_steps: Option<usize>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            max_shrink_steps: None,
        }
    }
}

impl CheckConfig {
    /// Create a new configuration with validation
    pub fn new(
        iterations: usize,
        seed: Option<u64>,
        max_shrink_steps: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            iterations,
            seed,
            max_shrink_steps,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `FALSIFY_ITERATIONS` and `FALSIFY_SEED`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the known keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ITERATIONS_ENV) {
            config.iterations = parse_env(ITERATIONS_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SEED_ENV) {
            config.seed = Some(parse_env(SEED_ENV, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::InvalidIterations(self.iterations));
        }
        if self.max_shrink_steps == Some(0) {
            return Err(ConfigError::InvalidShrinkSteps(0));
        }
        Ok(())
    }

    /// Set the iteration count
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Pin the generation seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap the number of accepted shrink steps
    pub fn with_max_shrink_steps(mut self, max_shrink_steps: usize) -> Self {
        self.max_shrink_steps = Some(max_shrink_steps);
        self
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
}
