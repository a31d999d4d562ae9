use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::Serialize;
use thiserror::Error;

use crate::domain::models::ExperimentConfig;

/// Configuration error types
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("No benchmark function given. Pass --fn or set `benchmark` in the config")]
    MissingBenchmark,

    #[error("Invalid {field}: {value}. Must be at least 1")]
    NotPositive { field: &'static str, value: usize },

    #[error("Invalid delta: {0}. Must be a finite, non-negative number")]
    InvalidDelta(f64),

    #[error("Invalid fine-tune bounds [{0}, {1}]. Need 0 < p_lower < p_upper")]
    InvalidFineTuneBounds(f64, f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Values given on the command line. `None` leaves lower layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_agents: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_vars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_runs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchdog_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Project-local config file picked up from the working directory.
    pub const DEFAULT_FILE: &'static str = "lio.yaml";

    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. lio.yaml in the working directory (optional)
    /// 3. The file passed with --config (optional)
    /// 4. Environment variables (LIO_* prefix, `__` separates nested keys)
    /// 5. Command-line flags
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<ExperimentConfig> {
        let config: ExperimentConfig = Self::figment(config_file, overrides)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The merged provider stack, before extraction.
    pub fn figment(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(ExperimentConfig::default()))
            .merge(Yaml::file(Self::DEFAULT_FILE));
        if let Some(path) = config_file {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("LIO_").split("__"))
            .merge(Serialized::defaults(overrides))
    }

    /// Load a single YAML file on top of the defaults, ignoring the
    /// environment.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<ExperimentConfig> {
        let config: ExperimentConfig = Figment::new()
            .merge(Serialized::defaults(ExperimentConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &ExperimentConfig) -> Result<(), ConfigError> {
        if config.benchmark.trim().is_empty() {
            return Err(ConfigError::MissingBenchmark);
        }

        let sizes = [
            ("n_agents", config.n_agents),
            ("n_vars", config.n_vars),
            ("n_hyper_dims", config.n_hyper_dims),
            ("n_runs", config.n_runs),
            ("fine_tune.n_agents", config.fine_tune.n_agents),
            ("fine_tune.n_iterations", config.fine_tune.n_iterations),
        ];
        if let Some(&(field, value)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive { field, value });
        }
        if config.max_workers == Some(0) {
            return Err(ConfigError::NotPositive {
                field: "max_workers",
                value: 0,
            });
        }

        if !config.delta.is_finite() || config.delta < 0.0 {
            return Err(ConfigError::InvalidDelta(config.delta));
        }

        let (p_lower, p_upper) = (config.fine_tune.p_lower, config.fine_tune.p_upper);
        if !(p_lower.is_finite() && p_upper.is_finite() && p_lower > 0.0 && p_lower < p_upper) {
            return Err(ConfigError::InvalidFineTuneBounds(p_lower, p_upper));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::StrategyKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid() -> ExperimentConfig {
        ExperimentConfig {
            benchmark: "sphere".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_needs_benchmark() {
        assert_eq!(
            ConfigLoader::validate(&ExperimentConfig::default()),
            Err(ConfigError::MissingBenchmark)
        );
        ConfigLoader::validate(&valid()).expect("Default config with a benchmark should be valid");
    }

    #[test]
    fn test_validate_zero_sizes() {
        let mut config = valid();
        config.n_hyper_dims = 0;
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigError::NotPositive {
                field: "n_hyper_dims",
                value: 0
            })
        );

        let mut config = valid();
        config.max_workers = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::NotPositive { field: "max_workers", .. })
        ));
    }

    #[test]
    fn test_validate_fine_tune_bounds() {
        let mut config = valid();
        config.fine_tune.p_lower = 5.0;
        config.fine_tune.p_upper = 1.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidFineTuneBounds(_, _))
        ));

        config.fine_tune.p_lower = 0.0;
        config.fine_tune.p_upper = 3.0;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_delta() {
        let mut config = valid();
        config.delta = f64::NAN;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDelta(_))
        ));
    }

    #[test]
    fn test_validate_invalid_logging() {
        let mut config = valid();
        config.logging.level = "loud".to_string();
        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }

        let mut config = valid();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_env_override() {
        temp_env::with_vars(
            [
                ("LIO_BENCHMARK", Some("ackley1")),
                ("LIO_N_AGENTS", Some("25")),
                ("LIO_FINE_TUNE__P_UPPER", Some("3.5")),
            ],
            || {
                let config = ConfigLoader::load(None, &ConfigOverrides::default()).unwrap();
                assert_eq!(config.benchmark, "ackley1");
                assert_eq!(config.n_agents, 25);
                assert!((config.fine_tune.p_upper - 3.5).abs() < f64::EPSILON);
            },
        );
    }

    #[test]
    fn test_cli_overrides_win() {
        temp_env::with_var("LIO_N_RUNS", Some("7"), || {
            let overrides = ConfigOverrides {
                benchmark: Some("brown".into()),
                n_runs: Some(3),
                ..Default::default()
            };
            let config = ConfigLoader::load(None, &overrides).unwrap();
            assert_eq!(config.n_runs, 3);
            assert_eq!(config.benchmark, "brown");
            assert_eq!(config.n_vars, 10, "unset flags keep lower layers");
        });
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "benchmark: salomon\nn_vars: 25\nstage1_strategy: de\nfine_tune:\n  n_iterations: 40\nlogging:\n  level: debug"
        )
        .unwrap();
        file.flush().unwrap();

        let overrides = ConfigOverrides {
            n_vars: Some(5),
            ..Default::default()
        };
        let config = ConfigLoader::load(Some(file.path()), &overrides).unwrap();

        assert_eq!(config.benchmark, "salomon");
        assert_eq!(config.n_vars, 5, "CLI flag should win");
        assert_eq!(config.stage1_strategy, StrategyKind::De);
        assert_eq!(config.fine_tune.n_iterations, 40);
        assert_eq!(config.fine_tune.n_agents, 10, "nested defaults persist");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.resolved_iterations(), 10_000);
    }

    #[test]
    fn test_load_from_file_validates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "benchmark: sphere\nn_runs: 0").unwrap();
        file.flush().unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("n_runs"));
    }
}
