use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PeboError;

/// Environment variable read by [`DispatcherConfig::from_env`].
pub const FIRE_STRATEGY_ENV: &str = "PEBO_FIRE_STRATEGY";

/// How a fire call walks the listeners of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FireStrategy {
    /// Invoke every listener at once with the same payload.
    Concurrent,
    /// One listener at a time, each with the original payload.
    #[default]
    Sequential,
    /// One listener at a time, each with the previous listener's reply.
    SequentialPropagating,
}

impl FireStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FireStrategy::Concurrent => "concurrent",
            FireStrategy::Sequential => "sequential",
            FireStrategy::SequentialPropagating => "sequential-propagating",
        }
    }
}

impl fmt::Display for FireStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FireStrategy {
    type Err = PeboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "concurrent" | "concurrently" => Ok(FireStrategy::Concurrent),
            "sequential" | "sequentially" => Ok(FireStrategy::Sequential),
            "sequential-propagating" | "propagating" => Ok(FireStrategy::SequentialPropagating),
            _ => Err(PeboError::InvalidStrategy(s.to_string())),
        }
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Strategy behind the plain `fire` operation.
    #[serde(default)]
    pub default_strategy: FireStrategy,
}

impl DispatcherConfig {
    pub fn with_default_strategy(mut self, strategy: FireStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Load configuration from environment variables.
    /// An unset `PEBO_FIRE_STRATEGY` keeps the default.
    pub fn from_env() -> Result<Self, PeboError> {
        let default_strategy = match env::var(FIRE_STRATEGY_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => FireStrategy::default(),
        };
        Ok(Self { default_strategy })
    }
}
