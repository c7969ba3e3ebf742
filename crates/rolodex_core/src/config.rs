//! TOML configuration.
//!
//! # Responsibility
//! - Load `rolodex.toml` with defaults for every key.
//! - Reject invalid values at load time instead of at first use.
//!
//! # Invariants
//! - Unknown keys are ignored.
//! - A relative database path is resolved against the config file directory.

use crate::listing::debounce::{FilterDebouncer, DEFAULT_QUIET_PERIOD};
use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATABASE_FILE: &str = "rolodex.db";
const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        key: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid { key, message } => write!(f, "invalid config value `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub path: PathBuf,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    /// File logging is disabled when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingSection {
    pub debounce_ms: u64,
}

impl Default for ListingSection {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
        }
    }
}

impl ListingSection {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Builds a debouncer with the configured quiet period, starting from the
    /// filter text the listing currently shows.
    pub fn debouncer(&self, current_filter: &str) -> FilterDebouncer {
        FilterDebouncer::with_initial(self.debounce(), current_filter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RolodexConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub listing: ListingSection,
}

impl RolodexConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        if config.database.path.is_relative() {
            if let Some(base) = path.parent() {
                config.database.path = base.join(&config.database.path);
            }
        }
        Ok(config)
    }

    /// Parses and validates config text; relative paths are left as given.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        self.logging.level = normalize_level(&self.logging.level)
            .map_err(|err| ConfigError::Invalid {
                key: "logging.level",
                message: err.to_string(),
            })?
            .to_string();

        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid {
                    key: "logging.dir",
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database.path",
                message: "must not be empty".to_string(),
            });
        }

        if self.listing.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Invalid {
                key: "listing.debounce_ms",
                message: format!(
                    "{} exceeds maximum of {MAX_DEBOUNCE_MS}",
                    self.listing.debounce_ms
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, RolodexConfig, DEFAULT_DATABASE_FILE};
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    #[test]
    fn empty_text_yields_defaults() {
        let config = RolodexConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config.database.path, PathBuf::from(DEFAULT_DATABASE_FILE));
        assert_eq!(config.listing.debounce_ms, 250);
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn debouncer_uses_configured_quiet_period() {
        let config = RolodexConfig::from_toml_str("[listing]\ndebounce_ms = 50\n")
            .expect("config should parse");
        let mut debouncer = config.listing.debouncer("");
        assert_eq!(debouncer.quiet_period(), Duration::from_millis(50));

        let start = Instant::now();
        debouncer.on_input("Pal", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(49)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(50)),
            Some("Pal".to_string())
        );
    }

    #[test]
    fn level_is_normalized_and_unknown_keys_ignored() {
        let config = RolodexConfig::from_toml_str(
            "[logging]\nlevel = \"WARNING\"\n[future]\nflag = true\n",
        )
        .expect("config should parse");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn rejects_unknown_level_and_long_debounce() {
        let err = RolodexConfig::from_toml_str("[logging]\nlevel = \"loud\"\n")
            .expect_err("unknown level must fail");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "logging.level",
                ..
            }
        ));

        let err = RolodexConfig::from_toml_str("[listing]\ndebounce_ms = 60000\n")
            .expect_err("long debounce must fail");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "listing.debounce_ms",
                ..
            }
        ));
    }

    #[test]
    fn load_resolves_database_path_against_config_dir() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("rolodex.toml");
        std::fs::write(&path, "[database]\npath = \"data/customers.db\"\n")
            .expect("config should be written");

        let config = RolodexConfig::load(&path).expect("config should load");
        assert_eq!(config.database.path, dir.path().join("data/customers.db"));

        let missing = RolodexConfig::load(dir.path().join("missing.toml"))
            .expect_err("missing file must fail");
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn rejects_relative_log_dir() {
        let err = RolodexConfig::from_toml_str("[logging]\ndir = \"logs\"\n")
            .expect_err("relative log dir must fail");
        assert!(err.to_string().contains("absolute"));
    }
}
