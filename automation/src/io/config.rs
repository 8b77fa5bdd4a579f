//! Automation configuration stored as TOML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Automation configuration (TOML).
///
/// Meant to be edited by hand. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AutomationConfig {
    /// Delay between two controller ticks, in milliseconds.
    pub tick_interval_ms: u64,

    /// Stop farming once every catchable pokemon is owned shiny.
    pub stop_on_shiny_completion: bool,

    /// Start a new run when the previous one finished.
    pub restart_runs: bool,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            stop_on_shiny_completion: true,
            restart_runs: true,
        }
    }
}

impl AutomationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(anyhow!("tick_interval_ms must be > 0"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AutomationConfig::default()`.
pub fn load_config(path: &Path) -> Result<AutomationConfig> {
    if !path.exists() {
        let cfg = AutomationConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AutomationConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &AutomationConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    crate::io::write_atomic(path, &buf)
}
