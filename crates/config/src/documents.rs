//! Generic JSON document loading for the vocabulary, rule, and example
//! files the pipeline reads once at startup (spec §6.3).

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))
}

/// Loads every `*.json` file directly under `dir`, in sorted filename
/// order (deterministic, independent of directory iteration order).
pub fn load_json_dir<T: DeserializeOwned>(dir: impl AsRef<Path>) -> Result<Vec<T>, ConfigError> {
    let dir = dir.as_ref();
    let read_dir = std::fs::read_dir(dir)
        .map_err(|_| ConfigError::FileNotFound(dir.display().to_string()))?;

    let mut paths: Vec<_> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    paths.into_iter().map(load_json).collect()
}
