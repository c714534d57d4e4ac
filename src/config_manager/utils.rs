use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config_manager::main::Config;

/// Read a JSON-LD or YAML configuration file with environment variable substitution
pub fn read_config(config_path: &str) -> Result<Value> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    let content = substitute_env_vars(&content)?;

    let path_lower = config_path.to_lowercase();
    let value = if path_lower.ends_with(".yaml") || path_lower.ends_with(".yml") {
        serde_yaml::from_str(&content)?
    } else {
        // JSON-LD; @context is carried along and ignored
        serde_json::from_str(&content)?
    };

    debug!("Read configuration file: {}", config_path);
    Ok(value)
}

/// Replace `${VAR_NAME}` with the environment value, leaving unknown variables untouched
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Validate configuration data against the Config model
pub fn validate_config(config_data: &Value) -> Result<Config> {
    let config: Config = serde_json::from_value(config_data.clone())?;
    if config.capture_config.camera_model == "file" && config.capture_config.image_path.is_none() {
        anyhow::bail!("capture_config.image_path is required when camera_model is \"file\"");
    }
    Ok(config)
}

/// Load text file with encoding detection
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let mut bytes = fs::read(file_path)?;

    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        bytes.drain(0..3);
    }

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => {
            // Legacy configs saved on Chinese-locale Windows machines
            let (cow, _, _) = encoding_rs::GBK.decode(e.as_bytes());
            Ok(cow.into_owned())
        }
    }
}
