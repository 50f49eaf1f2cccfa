// src/config/app.rs
use std::sync::OnceLock;

use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub providers: Providers,
    pub features: Features,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Providers {
    /// Providers ranked ahead of installation order during resolution,
    /// in the listed order.
    pub preferred: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Run the structural probe in engine constructors so an unsatisfiable
    /// transform fails at creation rather than at first use.
    pub probe_on_create: bool,
}

impl Default for Providers {
    fn default() -> Self {
        default_providers()
    }
}

impl Default for Features {
    fn default() -> Self {
        default_features()
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path = std::env::var("CIPHER_ENGINE_CONFIG")
            .unwrap_or_else(|_| "cipher-engine.toml".to_string());

        if !std::path::Path::new(&config_path).exists() {
            return Config::default();
        }

        match std::fs::read_to_string(&config_path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(conf) => conf,
            Err(e) => {
                tracing::warn!(path = %config_path, error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    })
}
