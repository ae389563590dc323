//! Analysis configuration
//!
//! Policies the core deliberately leaves open are set here rather than
//! hard-coded, loaded from an optional `symflow.toml`.

use crate::scope::exports::ExportCollisionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    /// How to handle two exports under the same public name
    #[serde(default)]
    pub export_collisions: ExportCollisionPolicy,
    /// Ecosystem tag attached to resolution diagnostics
    #[serde(default)]
    pub ecosystem: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("symflow.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<AnalysisConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}
