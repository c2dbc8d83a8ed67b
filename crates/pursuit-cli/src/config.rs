//! Configuration vault – reads/writes `~/.pursuit/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use pursuit_fuzzy::{ControllerConfig, FuzzyController};
use pursuit_runtime::{ControlLoop, LoopConfig};
use pursuit_types::PursuitError;
use serde::{Deserialize, Serialize};

/// Persisted operator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Apparent target height (pixels) at the desired following distance,
    /// as measured by the calibration step.
    pub calibrated_height: i32,
    pub controller: ControllerConfig,
    pub control_loop: LoopConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calibrated_height: 120,
            controller: ControllerConfig::default(),
            control_loop: LoopConfig::default(),
        }
    }
}

impl Config {
    /// Build the controller and wrap it in a loop.
    ///
    /// # Errors
    ///
    /// Any range or timing the controller or loop rejects.
    pub fn control_loop(&self) -> Result<ControlLoop, PursuitError> {
        let controller = FuzzyController::new(&self.controller, f64::from(self.calibrated_height))?;
        ControlLoop::new(controller, self.control_loop.clone())
    }
}

/// Return the path to `~/.pursuit/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".pursuit").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, PursuitError> {
    load_from(&config_path())
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, PursuitError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        PursuitError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let mut cfg: Config = toml::from_str(&raw)
        .map_err(|e| PursuitError::Config(format!("failed to parse {}: {e}", path.display())))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `PURSUIT_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `PURSUIT_CALIBRATED_HEIGHT` | `calibrated_height` |
/// | `PURSUIT_PERIOD_MS` | `control_loop.period_ms` |
/// | `PURSUIT_NEAR_FIELD_THRESHOLD` | `control_loop.near_field_threshold` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides(cfg, |key| std::env::var(key).ok());
}

fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PURSUIT_CALIBRATED_HEIGHT")
        && let Ok(height) = v.trim().parse::<i32>()
    {
        cfg.calibrated_height = height;
    }
    if let Some(v) = lookup("PURSUIT_PERIOD_MS")
        && let Ok(ms) = v.trim().parse::<u64>()
    {
        cfg.control_loop.period_ms = ms;
    }
    if let Some(v) = lookup("PURSUIT_NEAR_FIELD_THRESHOLD")
        && let Ok(px) = v.trim().parse::<i32>()
    {
        cfg.control_loop.near_field_threshold = px;
    }
}

/// Save the config to disk, creating `~/.pursuit/` if necessary.
pub fn save(cfg: &Config) -> Result<(), PursuitError> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), PursuitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PursuitError::Config(format!("failed to create {}: {e}", parent.display()))
        })?;
        // Owner only (rwx------).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|e| {
                PursuitError::Config(format!("failed to restrict {}: {e}", parent.display()))
            })?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| PursuitError::Config(format!("failed to serialize config: {e}")))?;
    write_private(path, raw.as_bytes())
        .map_err(|e| PursuitError::Config(format!("failed to write {}: {e}", path.display())))
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)
}
