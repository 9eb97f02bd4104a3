use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/weekdeck/config.toml` or `~/.config/weekdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `WEEKDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Where the CSV dataset lives: a path, a `file://` URL or an `http(s)://` URL.
    pub source: String,
    /// Group used when the requested route is not recognized.
    pub default_group: String,
    /// Page used when the requested route is not recognized.
    pub default_page: String,
    /// Timeout for HTTP fetches (dataset and tracks), in seconds.
    pub http_timeout_secs: u64,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            source: "audio.csv".to_string(),
            default_group: "1".to_string(),
            default_page: "1".to_string(),
            http_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Playback rate applied when the app starts.
    pub default_rate: f32,
    /// Lowest rate reachable with the rate keys.
    pub rate_min: f32,
    /// Highest rate reachable with the rate keys.
    pub rate_max: f32,
    /// Increment used by the rate keys.
    pub rate_step: f32,
    /// Whether "continue playing" starts enabled.
    pub continue_playing: bool,
    /// Past this many seconds, "previous" restarts the current track instead.
    pub restart_threshold_secs: f64,
    /// Pause between a finished track and the next one when continuing (milliseconds).
    pub auto_advance_delay_ms: u64,
    /// How often the playback position is sampled while playing.
    pub poll_hz: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            default_rate: 1.0,
            rate_min: 0.5,
            rate_max: 1.5,
            rate_step: 0.1,
            continue_playing: false,
            restart_threshold_secs: 3.0,
            auto_advance_delay_ms: 8000,
            poll_hz: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { seek_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Label put in front of the group id in the header, e.g. "week" -> "week 3".
    pub group_label: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ listen, pause, repeat ~ ".to_string(),
            group_label: "week".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file path. `None` uses `$XDG_STATE_HOME/weekdeck/weekdeck.log`.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. "info" or "weekdeck=debug".
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}
