use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `WEEKDECK__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("WEEKDECK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let p = &self.playback;
        if !(p.rate_min.is_finite() && p.rate_min > 0.0) {
            return Err("playback.rate_min must be > 0".to_string());
        }
        if !(p.rate_max.is_finite() && p.rate_max >= p.rate_min) {
            return Err("playback.rate_max must be >= playback.rate_min".to_string());
        }
        if !(p.rate_step.is_finite() && p.rate_step > 0.0) {
            return Err("playback.rate_step must be > 0".to_string());
        }
        if !(p.default_rate >= p.rate_min && p.default_rate <= p.rate_max) {
            return Err("playback.default_rate must lie within [rate_min, rate_max]".to_string());
        }
        if !(p.restart_threshold_secs.is_finite() && p.restart_threshold_secs >= 0.0) {
            return Err("playback.restart_threshold_secs must be >= 0".to_string());
        }
        if p.poll_hz == 0 {
            return Err("playback.poll_hz must be >= 1".to_string());
        }
        if self.dataset.source.trim().is_empty() {
            return Err("dataset.source must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `WEEKDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("WEEKDECK_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/weekdeck/config.toml`
/// or `~/.config/weekdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("weekdeck").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/weekdeck/weekdeck.log`
/// or `~/.local/state/weekdeck/weekdeck.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("weekdeck").join("weekdeck.log"))
}
