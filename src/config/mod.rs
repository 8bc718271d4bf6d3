//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (for the `bdm` binary)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BdmError, Result};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model constants
    #[serde(default)]
    pub model: ModelConfig,

    /// Run settings
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| BdmError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| BdmError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(q) = env_parse("BDM_Q") {
            config.model.q = q;
        }
        if let Some(t) = env_parse("BDM_T") {
            config.model.t = t;
        }
        if let Some(xmin) = env_parse("BDM_XMIN") {
            config.model.xmin = Some(xmin);
        }
        if let Some(xmax) = env_parse("BDM_XMAX") {
            config.model.xmax = Some(xmax);
        }
        if let Some(verbose) = env_parse("BDM_VERBOSE") {
            config.model.verbose = verbose;
        }
        if let Some(rounds) = env_parse("BDM_ROUNDS") {
            config.run.rounds = rounds;
        }

        config
    }

    /// Default config file location (`<config dir>/bdm/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bdm").join("config.toml"))
    }

    /// Merge with another config (other takes precedence where it differs from defaults)
    pub fn merge(self, other: Self) -> Self {
        let model_default = ModelConfig::default();
        let run_default = RunConfig::default();

        Self {
            model: ModelConfig {
                q: if other.model.q != model_default.q {
                    other.model.q
                } else {
                    self.model.q
                },
                t: if other.model.t != model_default.t {
                    other.model.t
                } else {
                    self.model.t
                },
                xmin: other.model.xmin.or(self.model.xmin),
                xmax: other.model.xmax.or(self.model.xmax),
                verbose: other.model.verbose || self.model.verbose,
            },
            run: RunConfig {
                rounds: if other.run.rounds != run_default.rounds {
                    other.run.rounds
                } else {
                    self.run.rounds
                },
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Model-wide constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Weight of the status-quo utility term (0-1)
    pub q: f64,

    /// Weight of "changes favor me" over "changes favor the alter" (0-1)
    pub t: f64,

    /// Explicit lower bound of the issue space
    pub xmin: Option<f64>,

    /// Explicit upper bound of the issue space
    pub xmax: Option<f64>,

    /// Narrate each offer resolution at info level
    pub verbose: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            q: 1.0,
            t: 1.0,
            xmin: None,
            xmax: None,
            verbose: false,
        }
    }
}

impl ModelConfig {
    /// Set the status-quo weight
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Set the optimism weight
    pub fn with_t(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// Fix the issue-space range instead of deriving it from the roster
    pub fn with_range(mut self, xmin: f64, xmax: f64) -> Self {
        self.xmin = Some(xmin);
        self.xmax = Some(xmax);
        self
    }

    /// Enable resolution narration
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Check Q, T and any explicit range
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("Q", self.q), ("T", self.t)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BdmError::InvalidParameter(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        for bound in [self.xmin, self.xmax].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(BdmError::InvalidParameter(format!(
                    "range bound must be finite, got {bound}"
                )));
            }
        }

        if let (Some(xmin), Some(xmax)) = (self.xmin, self.xmax) {
            if xmax <= xmin {
                return Err(BdmError::DegenerateRange { xmin, xmax });
            }
        }

        Ok(())
    }
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of rounds to simulate
    pub rounds: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { rounds: 10 }
    }
}
