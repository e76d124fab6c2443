use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT, DEFAULT_SOURCE, OUTPUT_ENV, SOURCE_ENV};
use crate::error::{CompactorError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Local path or http(s) URL of the OMM catalog
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: concat!("omm_compactor/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rolling JSON log; console-only when unset
    pub directory: Option<PathBuf>,
    pub file_name: String,
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "omm_compactor.log".to_string(),
            default_directive: "omm_compactor=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `omm_compactor.toml` in the
    /// working directory when no path is given. A missing default file yields
    /// the built-in defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !config_path.exists() {
            if required {
                return Err(CompactorError::Config(format!(
                    "Config file '{}' does not exist",
                    config_path.display()
                )));
            }
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            CompactorError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// CLI flag, then `OMM_SOURCE`, then the config file, then `active.json`.
    pub fn resolve_source(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| non_empty_env(SOURCE_ENV))
            .or_else(|| self.source.location.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
    }

    /// CLI flag, then `OMM_OUTPUT`, then the config file, then `minified.json`.
    pub fn resolve_output(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| non_empty_env(OUTPUT_ENV).map(PathBuf::from))
            .or_else(|| self.output.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
