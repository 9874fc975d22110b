mod init;
mod schema;

pub use init::{run_init, write_default_config};
pub use schema::{
    Config, ExplainConfig, DEFAULT_API_KEY_ENV, DEFAULT_DATASET, DEFAULT_ENDPOINT,
    DEFAULT_EXPLAIN_TIMEOUT, DEFAULT_MODEL, DEFAULT_STICKER_PRICE,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::catalog::DatasetSource;

/// Get the config directory path (~/.config/admit-odds/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("admit-odds"))
}

/// Get the default config file path (~/.config/admit-odds/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// With `path` set, the file must exist. Without it, the default location is
/// tried and built-in defaults are used when nothing is there.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => match get_config_path() {
            Ok(default_path) if default_path.exists() => default_path,
            _ => {
                debug!("no config file found, using defaults");
                return Ok(Config::default());
            }
        },
    };

    read_config(&config_path)
}

fn read_config(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    debug!(path = %config_path.display(), "config loaded");
    Ok(config)
}

/// Where to load the dataset from.
///
/// A relative path is tried against the working directory, then against the
/// config directory. If the default dataset is found in neither place, the
/// sample compiled into the binary is used.
pub fn dataset_source(config: &Config) -> DatasetSource {
    let cwd = std::env::current_dir().unwrap_or_default();
    let config_dir = get_config_dir().ok();
    resolve_dataset(&config.dataset, &cwd, config_dir.as_deref())
}

fn resolve_dataset(dataset: &str, cwd: &Path, config_dir: Option<&Path>) -> DatasetSource {
    let path = match DatasetSource::parse(dataset) {
        DatasetSource::File(path) => path,
        other => return other,
    };
    if path.is_absolute() || cwd.join(&path).exists() {
        return DatasetSource::File(path);
    }
    if let Some(dir) = config_dir {
        let candidate = dir.join(&path);
        if candidate.exists() {
            return DatasetSource::File(candidate);
        }
    }
    if dataset.trim() == DEFAULT_DATASET {
        debug!("default dataset not found, using the bundled sample");
        return DatasetSource::Bundled;
    }
    DatasetSource::File(path)
}

/// Check every config field, collecting all problems.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.dataset.trim().is_empty() {
        errors.push("dataset: must not be empty".to_string());
    }

    if !config.sticker_price.is_finite() || config.sticker_price < 0.0 {
        errors.push(format!(
            "sticker_price: must be a non-negative number, got {}",
            config.sticker_price
        ));
    }

    let explain = &config.explain;
    if !(explain.endpoint.starts_with("http://") || explain.endpoint.starts_with("https://")) {
        errors.push(format!(
            "explain.endpoint: must be an http(s) URL, got '{}'",
            explain.endpoint
        ));
    }
    if explain.model.trim().is_empty() {
        errors.push("explain.model: must not be empty".to_string());
    }
    if explain.api_key_env.trim().is_empty() {
        errors.push("explain.api_key_env: must not be empty".to_string());
    }
    match humantime::parse_duration(&explain.timeout) {
        Ok(d) if d.is_zero() => {
            errors.push("explain.timeout: must be greater than zero".to_string());
        }
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "explain.timeout: invalid duration '{}': {}",
            explain.timeout, e
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
