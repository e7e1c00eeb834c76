//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. The
//! `[economy]` table doubles as the settings provider the reconciliation
//! service consults at activation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::economy::SettingsProvider;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub economy: EconomySettings,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EconomySettings {
    /// Keep provider balances in step with per-world profiles.
    pub sync_enabled: bool,
    /// Plugin that must be loaded before a provider is looked up.
    #[serde(default)]
    pub companion_plugin: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    pub profiles_file: String,
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
}

fn default_provider_name() -> String {
    "Ledger".to_string()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            profiles_file: "profiles.json".to_string(),
            provider_name: default_provider_name(),
        }
    }
}

impl SettingsProvider for EconomySettings {
    fn economy_sync_enabled(&self) -> bool {
        self.sync_enabled
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
