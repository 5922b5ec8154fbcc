mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub const API_KEY_ENV: &str = "HF_API_KEY";
pub const DB_PATH_ENV: &str = "FEEDBACK_DB_PATH";

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    let config = parse(&config_str)?;

    Ok(apply_overrides(config, |key| env::var(key).ok()))
}

/// Parses and validates a YAML document without touching the environment.
pub fn parse(yaml: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml)?;
    validate(&config)?;
    Ok(config)
}

pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(API_KEY_ENV) {
        config.inference.api_key = key;
    }
    if let Some(path) = lookup(DB_PATH_ENV) {
        config.server.database_path = path;
    }
    config
}

fn validate(config: &Config) -> Result<()> {
    if config.inference.model.trim().is_empty() {
        return Err(Error::config("inference.model must not be empty"));
    }
    if config.inference.prompt.template.matches("{message}").count() != 1 {
        return Err(Error::config(
            "inference.prompt.template must contain exactly one {message} placeholder",
        ));
    }
    if config.inference.max_new_tokens == 0 {
        return Err(Error::config("inference.max_new_tokens must be positive"));
    }
    Ok(())
}
