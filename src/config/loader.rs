use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

pub const CONFIG_FILE_NAME: &str = "jblastor.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct JblastorConfig {
    #[serde(rename = "apiUser")]
    pub api_user: Option<String>,
    #[serde(rename = "apiPass")]
    pub api_pass: Option<String>,
    pub timeout: Option<String>,
    pub mode: Option<String>,
    pub concurrency: Option<usize>,
    pub headers: HashMap<String, String>,
    #[serde(flatten)]
    pub extras: HashMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: JblastorConfig,
    pub path: PathBuf,
}

pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()?.join(target)
    };

    let file_path = if resolved.is_dir() {
        resolved.join(CONFIG_FILE_NAME)
    } else {
        resolved
    };

    if !file_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: JblastorConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    if !config.extras.is_empty() {
        let mut unknown: Vec<&str> = config.extras.keys().map(String::as_str).collect();
        unknown.sort_unstable();
        log::warn!(
            "ignoring unknown keys in {}: {}",
            file_path.display(),
            unknown.join(", ")
        );
    }

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
    }))
}
