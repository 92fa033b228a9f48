use crate::configuration::constants::{defaults, env::SETTINGS_PREFIX};
use crate::random::SeededTimeProvider;
use crate::time::clock::Pacing;
use config::{Config, ConfigError, Environment, File};
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runner settings, layered as defaults, settings file, `STACKCHECK_*`
/// environment and finally command line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub seed: u64,
    /// Offset the run seed by the test index for tests without their own seed.
    pub per_test_seed: bool,
    pub continue_on_failure: bool,
    pub realtime: bool,
    #[serde(deserialize_with = "crate::configuration::deserialize::optional_duration::deserialize")]
    pub timeout: Option<Duration>,
    pub rng_min_ms: u64,
    pub rng_max_ms: u64,
    pub report: Option<PathBuf>,
    /// Names of the tests to run; empty runs all of them.
    pub only: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: defaults::SEED,
            per_test_seed: true,
            continue_on_failure: false,
            realtime: false,
            timeout: None,
            rng_min_ms: defaults::RNG_MIN_MS,
            rng_max_ms: defaults::RNG_MAX_MS,
            report: None,
            only: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(file, SETTINGS_PREFIX)
    }

    fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut config = Config::new();
        if let Some(path) = file {
            debug!("Reading settings from {}", path.display());
            config.merge(File::from(path))?;
        }
        config.merge(Environment::with_prefix(env_prefix))?;
        let settings: Settings = config.try_into()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rng_min_ms > self.rng_max_ms {
            return Err(ConfigError::Message(format!(
                "rng_min_ms ({}) is greater than rng_max_ms ({})",
                self.rng_min_ms, self.rng_max_ms
            )));
        }
        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        if self.realtime {
            Pacing::Realtime
        } else {
            Pacing::Compressed
        }
    }

    pub fn time_provider(&self) -> SeededTimeProvider {
        SeededTimeProvider::new(self.rng_min_ms, self.rng_max_ms)
    }

    /// Whether the test called `name` passes the `only` filter.
    pub fn selects(&self, name: &str) -> bool {
        self.only.is_empty() || self.only.iter().any(|selected| selected == name)
    }
}
