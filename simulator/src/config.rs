//! Host configuration, read from YAML.
//!
//! Every field has a default, so an empty file (or no file) runs the festive
//! 80-ticket raffle with the stock animation timings.

use anyhow::Context;
use luckywheel_execution::{
    rotation::{DEFAULT_POINTER_ANGLE, DEFAULT_REVOLUTIONS},
    scheduler::{DEFAULT_SETTLE_MS, DEFAULT_SPIN_MS},
    EngineConfig, PhaseConfig,
};
use luckywheel_types::{Catalog, TierSpec, DEFAULT_TICKET_COUNT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error as ThisError;
use tracing::Level;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: String,
    pub store_path: PathBuf,
    /// Seed for reproducible epochs. Unset draws from OS entropy.
    pub seed: Option<u64>,
    pub spin_ms: u64,
    pub settle_ms: u64,
    pub revolutions: u32,
    pub pointer_angle: f64,
    pub ticket_count: u32,
    /// Wheel layout, in segment order.
    pub prizes: Vec<TierSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            store_path: PathBuf::from("luckywheel.db"),
            seed: None,
            spin_ms: DEFAULT_SPIN_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            revolutions: DEFAULT_REVOLUTIONS,
            pointer_angle: DEFAULT_POINTER_ANGLE,
            ticket_count: DEFAULT_TICKET_COUNT,
            prizes: Catalog::default().tiers().to_vec(),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum ConfigError {
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("pointer_angle must be finite (got {value})")]
    InvalidPointerAngle { value: f64 },
    #[error("invalid prize catalog: {0}")]
    Catalog(#[from] luckywheel_types::ConfigError),
}

pub struct ValidatedConfig {
    pub log_level: Level,
    pub store_path: PathBuf,
    pub seed: Option<u64>,
    pub catalog: Catalog,
    pub engine: EngineConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parse config {}", path.display()))
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;
        ensure_nonzero("spin_ms", self.spin_ms)?;
        ensure_nonzero("settle_ms", self.settle_ms)?;
        ensure_nonzero("revolutions", u64::from(self.revolutions))?;
        if !self.pointer_angle.is_finite() {
            return Err(ConfigError::InvalidPointerAngle {
                value: self.pointer_angle,
            });
        }
        let catalog = Catalog::new(self.prizes, self.ticket_count)?;

        Ok(ValidatedConfig {
            log_level,
            store_path: self.store_path,
            seed: self.seed,
            catalog,
            engine: EngineConfig {
                phases: PhaseConfig::new(self.spin_ms, self.settle_ms),
                revolutions: self.revolutions,
                pointer_angle: self.pointer_angle,
            },
        })
    }
}

fn ensure_nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use luckywheel_types::TierId;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());

        let validated = config.validate().unwrap();
        assert_eq!(validated.log_level, Level::INFO);
        assert_eq!(validated.catalog, Catalog::default());
        assert_eq!(validated.engine, EngineConfig::default());
        assert_eq!(validated.seed, None);
    }

    #[test]
    fn test_custom_catalog() {
        let yaml = r##"
log_level: debug
seed: 42
spin_ms: 1000
ticket_count: 5
prizes:
  - id: FIRST
    name: Bike
    total: 1
    color: "#FFD700"
  - id: SURPRISE
    name: Mug
    total: 4
    color: "#CD5C5C"
"##;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let validated = config.validate().unwrap();
        assert_eq!(validated.log_level, Level::DEBUG);
        assert_eq!(validated.seed, Some(42));
        assert_eq!(validated.engine.phases.spin_ms, 1000);
        assert_eq!(validated.engine.phases.settle_ms, DEFAULT_SETTLE_MS);
        assert_eq!(validated.catalog.ticket_count(), 5);
        assert_eq!(validated.catalog.segment_of(TierId::Surprise), Some(1));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(serde_yaml::from_str::<Config>("spin_seconds: 4").is_err());
    }

    #[test]
    fn test_validation_errors() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.validate().err(),
            Some(ConfigError::InvalidLogLevel {
                value: "loud".to_string()
            })
        );

        let config = Config {
            settle_ms: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate().err(),
            Some(ConfigError::InvalidNonZero {
                field: "settle_ms",
                value: 0
            })
        );

        let config = Config {
            ticket_count: 81,
            ..Config::default()
        };
        assert_eq!(
            config.validate().err(),
            Some(ConfigError::Catalog(
                luckywheel_types::ConfigError::TicketCountMismatch {
                    expected: 81,
                    got: 80
                }
            ))
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("wheel.yaml");
        std::fs::write(&path, "store_path: /tmp/wheel.db\nrevolutions: 3\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/wheel.db"));
        assert_eq!(config.revolutions, 3);
    }
}
