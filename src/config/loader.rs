// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::model::PipelineConfig;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw
/// `PipelineConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (glob syntax, browserslist, etc.). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {path:?}"))?;

    let config: PipelineConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {path:?}"))?;

    Ok(config)
}

/// Load a configuration file and run startup validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML, or falls back to built-in defaults when the file is absent.
/// - Resolves relative source/dist roots against the config file's directory.
/// - Checks glob patterns, the browserslist, the server address and the
///   image quality setting. Any failure here is fatal: a misconfigured
///   pipeline must not start.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();

    let mut config = if path.is_file() {
        load_from_path(path)?
    } else {
        info!(config = ?path, "config file not found, using built-in defaults");
        PipelineConfig::default()
    };

    config.resolve_roots(&config_root_dir(path));
    validate_config(&config)?;
    Ok(config)
}

/// Directory that relative config paths are resolved against.
/// Currently: directory containing the config file, or `.`.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
