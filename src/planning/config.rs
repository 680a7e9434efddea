#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Immutable settings for the two planning strategies.
//!
//! Both structs are validated on construction; `validate` re-checks values
//! built through struct update or `Default`, and is called again by the entry
//! points before any work starts.

use crate::planning::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_MAX_HORIZON: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    weight: f64,
    timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SearchConfig {
    /// # Arguments
    ///
    /// * `weight` - factor applied to the heuristic in `f = weight * h + g`.
    /// * `timeout` - wall-clock budget of one search.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidWeight` unless `weight` is finite and positive,
    /// `ConfigError::ZeroTimeout` for a zero budget.
    pub fn new(weight: f64, timeout: Duration) -> Result<Self, ConfigError> {
        let config = Self { weight, timeout };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// See [`SearchConfig::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(ConfigError::InvalidWeight(self.weight));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatConfig {
    max_horizon: usize,
    timeout: Duration,
}

impl Default for SatConfig {
    fn default() -> Self {
        Self {
            max_horizon: DEFAULT_MAX_HORIZON,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SatConfig {
    /// # Arguments
    ///
    /// * `max_horizon` - largest number of steps tried; horizons `0..=max_horizon`
    ///   are attempted in order.
    /// * `timeout` - wall-clock budget shared by all attempts.
    ///
    /// # Errors
    ///
    /// `ConfigError::ZeroTimeout` for a zero budget.
    pub fn new(max_horizon: usize, timeout: Duration) -> Result<Self, ConfigError> {
        let config = Self {
            max_horizon,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// See [`SatConfig::new`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    #[must_use]
    pub const fn max_horizon(&self) -> usize {
        self.max_horizon
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}
