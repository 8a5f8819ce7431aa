// src/config/service.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};
use tracing::warn;

pub const DEFAULT_SERVICE_CONFIG_PATH: &str = "config/service.toml";
pub const ENV_SERVICE_CONFIG_PATH: &str = "PHOTOQ_CONFIG_PATH";
pub const ENV_SEED_DEMO: &str = "PHOTOQ_SEED_DEMO";
pub const ENV_PROCESSING_DELAY_MS: &str = "PHOTOQ_PROCESSING_DELAY_MS";

/// Upper bound for the simulated analysis delay.
pub const MAX_PROCESSING_DELAY_MS: u64 = 10_000;
/// Upper bound for the in-memory store.
pub const MAX_STORE_CAPACITY: usize = 100_000;

fn default_seed_demo() -> bool {
    true
}
fn default_store_capacity() -> usize {
    2000
}
fn default_metrics_enabled() -> bool {
    true
}

/// Which upstream producer fills in features when an upload carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// Placeholder ranges of the web demo.
    #[default]
    Random,
    /// Every feature sits exactly on its threshold.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Seed the store with the three sample studio photos.
    #[serde(default = "default_seed_demo")]
    pub seed_demo: bool,
    #[serde(default)]
    pub extractor: ExtractorKind,
    /// Simulated analysis time per upload (the web demo waits 2000 ms).
    #[serde(default)]
    pub processing_delay_ms: u64,
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            seed_demo: default_seed_demo(),
            extractor: ExtractorKind::default(),
            processing_delay_ms: 0,
            store_capacity: default_store_capacity(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServiceConfig {
    /// Parse a TOML file, then sanitize. Env overrides are not applied here.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading service config from {}", path.display()))?;
        let cfg = Self::from_toml_str(&data)
            .with_context(|| format!("parsing service config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: ServiceConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Resolve the config the binary runs with:
    /// 1) $PHOTOQ_CONFIG_PATH (must exist)
    /// 2) config/service.toml
    /// 3) built-in defaults
    ///
    /// Env overrides ($PHOTOQ_SEED_DEMO, $PHOTOQ_PROCESSING_DELAY_MS) win over the file.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = env::var(ENV_SERVICE_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("PHOTOQ_CONFIG_PATH points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let default_path = PathBuf::from(DEFAULT_SERVICE_CONFIG_PATH);
            if default_path.exists() {
                Self::load_from_file(&default_path)?
            } else {
                warn!(
                    target: "config",
                    path = DEFAULT_SERVICE_CONFIG_PATH,
                    "service config not found, using defaults"
                );
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = parse_bool_env(env::var(ENV_SEED_DEMO).ok()) {
            self.seed_demo = v;
        }
        if let Ok(raw) = env::var(ENV_PROCESSING_DELAY_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.processing_delay_ms = ms,
                Err(_) => warn!(target: "config", value = %raw, "ignoring invalid PHOTOQ_PROCESSING_DELAY_MS"),
            }
        }
        self.sanitize();
    }

    fn sanitize(&mut self) {
        self.store_capacity = self.store_capacity.clamp(1, MAX_STORE_CAPACITY);
        self.processing_delay_ms = self.processing_delay_ms.min(MAX_PROCESSING_DELAY_MS);
    }
}

// "1"/"true"/"yes"/"on" → true, "0"/"false"/"no"/"off" → false, anything else ignored
fn parse_bool_env(raw: Option<String>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ServiceConfig::default());
    }

    #[test]
    fn values_are_sanitized() {
        let cfg = ServiceConfig::from_toml_str(
            r#"
store_capacity = 0
processing_delay_ms = 999999
extractor = "neutral"
"#,
        )
        .unwrap();
        assert_eq!(cfg.store_capacity, 1);
        assert_eq!(cfg.processing_delay_ms, MAX_PROCESSING_DELAY_MS);
        assert_eq!(cfg.extractor, ExtractorKind::Neutral);
    }

    #[test]
    fn unknown_extractor_is_an_error() {
        assert!(ServiceConfig::from_toml_str(r#"extractor = "cv""#).is_err());
    }

    #[test]
    fn bool_env_parsing() {
        assert_eq!(parse_bool_env(Some(" YES ".into())), Some(true));
        assert_eq!(parse_bool_env(Some("off".into())), Some(false));
        assert_eq!(parse_bool_env(Some("maybe".into())), None);
        assert_eq!(parse_bool_env(None), None);
    }
}
