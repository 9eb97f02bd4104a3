use reqwest::blocking::Client;
use tracing::warn;

use crate::config;
use crate::dataset::{Dataset, load_dataset};
use crate::player::{PlaybackEngine, PlayerController};
use crate::resource::Resource;

/// Load the dataset, degrading to an empty one on any failure.
pub fn load_dataset_or_empty(source: &str, client: &Client) -> Dataset {
    let loaded = Resource::parse(source)
        .map_err(|e| e.to_string())
        .and_then(|r| load_dataset(&r, client).map_err(|e| e.to_string()));
    match loaded {
        Ok(d) => d,
        Err(e) => {
            warn!(source, error = %e, "dataset unavailable, starting empty");
            Dataset::default()
        }
    }
}

pub fn apply_playback_defaults<E: PlaybackEngine>(
    player: &mut PlayerController<E>,
    settings: &config::Settings,
) {
    if let Err(e) = player.set_playback_rate(settings.playback.default_rate) {
        warn!(error = %e, "ignoring configured default rate");
    }
    player.set_continue_playing(settings.playback.continue_playing);
}
