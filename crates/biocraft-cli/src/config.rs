//! Configuration file – reads/writes `~/.biocraft/config.toml`.
//!
//! ```toml
//! [safety]
//! rate_interval_s = 0.01
//! confirmation_timeout_s = 30.0
//! risk_threshold = "high"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use biocraft_safety::SafetyConfig;
use biocraft_types::RiskLevel;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persisted CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Limits and policy handed to the safety layer.
    #[serde(default)]
    pub safety: SafetyConfig,
}

/// Return the path to `~/.biocraft/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".biocraft").join("config.toml")
}

/// Effective configuration: the file if present, otherwise defaults, with
/// `BIOCRAFT_*` overrides applied and the result validated.
pub fn load_effective() -> Result<Config, String> {
    load_effective_from(&config_path())
}

pub(crate) fn load_effective_from(path: &Path) -> Result<Config, String> {
    let mut cfg = load_from(path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    cfg.safety.validate().map_err(|e| e.to_string())?;
    Ok(cfg)
}

/// Load the config from `path`.  Returns `None` if the file does not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `BIOCRAFT_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `BIOCRAFT_RATE_INTERVAL_S` | `safety.rate_interval_s` |
/// | `BIOCRAFT_CONFIRMATION_TIMEOUT_S` | `safety.confirmation_timeout_s` |
/// | `BIOCRAFT_RISK_THRESHOLD` | `safety.risk_threshold` |
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("BIOCRAFT_RATE_INTERVAL_S") {
        match parse_seconds(&v) {
            Some(d) => cfg.safety.rate_interval = d,
            None => warn!(value = %v, "ignoring invalid BIOCRAFT_RATE_INTERVAL_S"),
        }
    }
    if let Ok(v) = std::env::var("BIOCRAFT_CONFIRMATION_TIMEOUT_S") {
        match parse_seconds(&v) {
            Some(d) => cfg.safety.confirmation_timeout = d,
            None => warn!(value = %v, "ignoring invalid BIOCRAFT_CONFIRMATION_TIMEOUT_S"),
        }
    }
    if let Ok(v) = std::env::var("BIOCRAFT_RISK_THRESHOLD") {
        match v.parse::<RiskLevel>() {
            Ok(level) => cfg.safety.risk_threshold = level,
            Err(e) => warn!(error = %e, "ignoring invalid BIOCRAFT_RISK_THRESHOLD"),
        }
    }
}

fn parse_seconds(raw: &str) -> Option<Duration> {
    let secs = raw.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Save the config to disk, creating `~/.biocraft/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
