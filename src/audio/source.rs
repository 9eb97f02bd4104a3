//! Turning fetched bytes into a rodio source plus its duration.

use std::io::Cursor;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use reqwest::blocking::Client;
use rodio::{Decoder, Source};

use super::error::AudioError;
use crate::resource::Resource;

pub(super) type TrackSource = Decoder<Cursor<Vec<u8>>>;

/// Fetch `url` and decode it.
pub(super) fn fetch_source(url: &str, client: &Client) -> Result<(TrackSource, Duration), AudioError> {
    let resource = Resource::parse(url)?;
    let bytes = resource.read_bytes(client)?;
    decode(bytes)
}

/// Decode an in-memory file. The decoder's own length wins; tag/stream
/// properties read by lofty cover formats where the decoder can't tell.
pub(super) fn decode(bytes: Vec<u8>) -> Result<(TrackSource, Duration), AudioError> {
    let probed = probe_duration(&bytes);
    let source = Decoder::new(Cursor::new(bytes))?;
    let duration = source
        .total_duration()
        .or(probed)
        .unwrap_or(Duration::ZERO);
    Ok((source, duration))
}

fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}
