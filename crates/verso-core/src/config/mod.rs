//! Configuration system for verso.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{VersoError, VersoResult};

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local table; contents are lost on restart.
    #[default]
    Memory,
    /// SQLite file at [`StoreConfig::sqlite_path`].
    Sqlite,
}

impl std::str::FromStr for Backend {
    type Err = VersoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(VersoError::Configuration(format!(
                "Unknown backend '{}'. Use 'memory' or 'sqlite'",
                other
            ))),
        }
    }
}

/// Main store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage backend.
    pub backend: Backend,
    /// Path of the SQLite database when `backend = "sqlite"`.
    pub sqlite_path: PathBuf,
    /// Window used by recent-user queries when the caller gives none.
    pub default_recent_hours: i64,
    /// Lower age bound used by age scans when the caller gives none.
    pub default_min_age: i64,
    /// Upper age bound used by age scans when the caller gives none.
    pub default_max_age: i64,
    /// Maximum number of entries accepted by one batch request.
    pub max_batch_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let verso_dir = dirs::home_dir()
            .map(|h| h.join(".verso"))
            .unwrap_or_else(|| PathBuf::from(".verso"));

        Self {
            backend: Backend::Memory,
            sqlite_path: verso_dir.join("users.db"),
            default_recent_hours: 24,
            default_min_age: 0,
            default_max_age: 200,
            max_batch_size: 100,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VersoResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| VersoError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| VersoError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| VersoError::Configuration(e.to_string()))?,
            _ => {
                return Err(VersoError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> VersoResult<Self> {
        Self::default().merge_env()
    }

    /// Override fields from `VERSO_*` environment variables.
    pub fn merge_env(mut self) -> VersoResult<Self> {
        if let Ok(backend) = std::env::var("VERSO_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Ok(path) = std::env::var("VERSO_SQLITE_PATH") {
            self.sqlite_path = PathBuf::from(path);
        }
        if let Ok(hours) = std::env::var("VERSO_RECENT_HOURS") {
            self.default_recent_hours = parse_env("VERSO_RECENT_HOURS", &hours)?;
        }
        if let Ok(size) = std::env::var("VERSO_MAX_BATCH_SIZE") {
            self.max_batch_size = parse_env("VERSO_MAX_BATCH_SIZE", &size)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check that the numeric settings are usable.
    pub fn validate(&self) -> VersoResult<()> {
        if self.default_recent_hours <= 0 {
            return Err(VersoError::Configuration(
                "default_recent_hours must be positive".to_string(),
            ));
        }
        if self.default_min_age > self.default_max_age {
            return Err(VersoError::Configuration(
                "default_min_age must not exceed default_max_age".to_string(),
            ));
        }
        if self.max_batch_size == 0 {
            return Err(VersoError::Configuration(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> VersoResult<T> {
    value
        .parse()
        .map_err(|_| VersoError::Configuration(format!("{} has invalid value '{}'", name, value)))
}

/// Builder for StoreConfig.
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the storage backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Use SQLite at the given path.
    pub fn sqlite_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backend = Backend::Sqlite;
        self.config.sqlite_path = path.into();
        self
    }

    /// Set the default recent-users window.
    pub fn default_recent_hours(mut self, hours: i64) -> Self {
        self.config.default_recent_hours = hours;
        self
    }

    /// Set the default age bounds.
    pub fn default_age_range(mut self, min: i64, max: i64) -> Self {
        self.config.default_min_age = min;
        self.config.default_max_age = max;
        self
    }

    /// Set the maximum batch size.
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.config.max_batch_size = size;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> StoreConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.default_recent_hours, 24);
        assert_eq!(config.default_max_age, 200);
        assert!(config.sqlite_path.ends_with("users.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "backend = \"sqlite\"\nsqlite_path = \"/tmp/v.db\"\nmax_batch_size = 5"
        )
        .unwrap();

        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.sqlite_path, PathBuf::from("/tmp/v.db"));
        assert_eq!(config.max_batch_size, 5);
        assert_eq!(config.default_recent_hours, 24);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "default_recent_hours: 6").unwrap();

        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_recent_hours, 6);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(StoreConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = StoreConfig::builder().max_batch_size(0).build();
        assert!(config.validate().is_err());

        let config = StoreConfig::builder().default_age_range(50, 10).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("SQLite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert!("dynamo".parse::<Backend>().is_err());
    }
}
