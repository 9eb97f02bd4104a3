//! Player controller and the engine seam it drives.
//!
//! `PlayerController` is generic over `PlaybackEngine` so the sequencing
//! rules can run against rodio in the app and a scripted engine in tests.

mod controller;
mod engine;
mod error;
mod types;

pub use controller::PlayerController;
pub use engine::{EngineHandle, PlaybackEngine};
pub use error::PlayerError;
pub use types::{EngineEvent, EngineEventKind, Generation, PlayerConfig, PlayerState, Session};

#[cfg(test)]
mod tests;
