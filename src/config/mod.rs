use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Top-level configuration for a placement run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub settings: Option<PathBuf>,
    pub shuffle_seed: Option<u64>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let input = env::var("ROSTER_INPUT").unwrap_or_else(|_| "employees.csv".to_string());
        let output_dir = env::var("ROSTER_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string());
        let settings = env::var("ROSTER_SETTINGS").ok().map(PathBuf::from);
        let shuffle_seed = match env::var("ROSTER_SHUFFLE_SEED") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed)?,
            ),
            Err(_) => None,
        };

        let log_level = env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            input: PathBuf::from(input),
            output_dir: PathBuf::from(output_dir),
            settings,
            shuffle_seed,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// The two tolerance settings of the legacy `config.properties` file. They
/// are loaded and logged; the optimization passes use fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementSettings {
    pub fte_max_diff_mean: i32,
    pub age_max_diff_mean: i32,
}

impl PlacementSettings {
    pub const FTE_MAX_DIFF_MEAN: &'static str = "FTE_MAX_DIFF_MEAN";
    pub const AGE_MAX_DIFF_MEAN: &'static str = "AGE_MAX_DIFF_MEAN";

    /// Reads `KEY=VALUE` lines; `#` comments and blank lines are allowed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::MissingSettingsFile {
                path: path.to_path_buf(),
            });
        }

        let unreadable = |source| ConfigError::UnreadableSettings {
            path: path.to_path_buf(),
            source,
        };
        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(unreadable)? {
            let (key, value) = item.map_err(unreadable)?;
            values.insert(key, value);
        }

        Ok(Self {
            fte_max_diff_mean: required_int(&values, Self::FTE_MAX_DIFF_MEAN)?,
            age_max_diff_mean: required_int(&values, Self::AGE_MAX_DIFF_MEAN)?,
        })
    }
}

impl fmt::Display for PlacementSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{fteMaxDiffMean={};ageMaxDiffMean={}}}",
            self.fte_max_diff_mean, self.age_max_diff_mean
        )
    }
}

fn required_int(values: &HashMap<String, String>, key: &'static str) -> Result<i32, ConfigError> {
    let raw = values.get(key).ok_or(ConfigError::MissingSetting { key })?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ConfigError::InvalidSetting {
            key,
            value: raw.clone(),
        })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSeed,
    MissingSettingsFile { path: PathBuf },
    UnreadableSettings { path: PathBuf, source: dotenvy::Error },
    MissingSetting { key: &'static str },
    InvalidSetting { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeed => write!(f, "ROSTER_SHUFFLE_SEED must be a valid u64"),
            ConfigError::MissingSettingsFile { path } => {
                write!(f, "missing configuration file: {}", path.display())
            }
            ConfigError::UnreadableSettings { path, .. } => {
                write!(f, "unable to read configuration file: {}", path.display())
            }
            ConfigError::MissingSetting { key } => {
                write!(f, "missing configuration setting {key}")
            }
            ConfigError::InvalidSetting { key, value } => {
                write!(f, "configuration setting {key} must be an integer, found '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::UnreadableSettings { source, .. } => Some(source),
            ConfigError::InvalidSeed
            | ConfigError::MissingSettingsFile { .. }
            | ConfigError::MissingSetting { .. }
            | ConfigError::InvalidSetting { .. } => None,
        }
    }
}
