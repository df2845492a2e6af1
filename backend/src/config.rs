//! Application configuration.
//!
//! One TOML file (`parcel.toml`) carries every table:
//!
//! ```toml
//! [repository]
//! type = "file"
//!
//! [file]
//! data_dir = "data"
//!
//! [model]
//! min_training_samples = 10
//!
//! [report]
//! default_city = "bangalore"
//!
//! [server]
//! port = 8080
//! ```
//!
//! Every table and key is optional. Environment variables override the file:
//! `HOST`, `PORT`, `REPOSITORY_TYPE` and `PARCEL_DATA_DIR`. `PARCEL_CONFIG`
//! points at an explicit file instead of the standard locations.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::db::factory::{DATA_DIR_ENV, REPOSITORY_TYPE_ENV};
use crate::db::{FullRepository, RepositoryConfig, RepositoryFactory, RepositoryResult};
use crate::services::analysis::{ParcelAnalysisService, ReportSettings};
use crate::services::predictor::ModelConfig;

/// Explicit configuration file path.
pub const CONFIG_PATH_ENV: &str = "PARCEL_CONFIG";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("invalid configuration")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load `PARCEL_CONFIG` or the first `parcel.toml` in the standard
    /// locations, else defaults; then apply environment overrides.
    pub fn from_env_or_default() -> anyhow::Result<Self> {
        let path = env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(RepositoryConfig::find_default_file);

        let mut config = match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// A data directory without an explicit repository type selects the
    /// file repository, matching [`crate::db::RepositoryType::from_env`].
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }

        let repo_type = lookup(REPOSITORY_TYPE_ENV);
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.repository.file.data_dir = PathBuf::from(dir);
            if repo_type.is_none() {
                self.repository.repository.repo_type = "file".to_string();
            }
        }
        if let Some(repo_type) = repo_type {
            self.repository.repository.repo_type = repo_type;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid bind address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }

    pub async fn build_repository(&self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::from_repository_config(&self.repository).await
    }

    /// Repository plus analysis service wired from this configuration.
    pub async fn build_service(&self) -> RepositoryResult<ParcelAnalysisService> {
        let repository = self.build_repository().await?;
        Ok(ParcelAnalysisService::new(
            repository,
            self.model.clone(),
            self.report.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.repository.repository.repo_type, "local");
        assert_eq!(config.model, ModelConfig::default());
        assert_eq!(config.report, ReportSettings::default());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_full_file() {
        let config = AppConfig::from_toml_str(
            r#"
[repository]
type = "file"

[file]
data_dir = "/var/lib/parcel"

[model]
min_training_samples = 25
seed = 7

[report]
default_city = "mumbai"
forecast_days = 14

[server]
host = "127.0.0.1"
port = 9000
"#,
        )
        .unwrap();

        assert_eq!(config.repository.file.data_dir, PathBuf::from("/var/lib/parcel"));
        assert_eq!(config.model.min_training_samples, 25);
        assert_eq!(config.model.seed, 7);
        assert_eq!(config.model.synthetic_samples, 100);
        assert_eq!(config.report.default_city, "mumbai");
        assert_eq!(config.report.forecast_days, 14);
        assert_eq!(config.report.current_aqi, 100.0);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(AppConfig::from_toml_str("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[("PORT", "3000"), ("PARCEL_DATA_DIR", "/tmp/docs")]))
            .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.repository.repository.repo_type, "file");
        assert_eq!(config.repository.file.data_dir, PathBuf::from("/tmp/docs"));

        let mut explicit = AppConfig::default();
        explicit
            .apply_overrides(lookup(&[("REPOSITORY_TYPE", "local"), ("PARCEL_DATA_DIR", "/x")]))
            .unwrap();
        assert_eq!(explicit.repository.repository.repo_type, "local");

        let mut bad = AppConfig::default();
        assert!(bad.apply_overrides(lookup(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parcel.toml");
        fs::write(&path, "[report]\ncurrent_aqi = 140.0\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.report.current_aqi, 140.0);
        assert!(AppConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
