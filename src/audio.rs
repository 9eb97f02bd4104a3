//! rodio implementation of the player's engine seam.
//!
//! `RodioEngine` owns the output stream. Each load runs on its own worker
//! thread which fetches the file (local or HTTP), decodes it, appends it to
//! the handle's sink and reports back through a channel drained by the
//! controller.

mod engine;
mod error;
mod handle;
mod source;

pub use engine::RodioEngine;
pub use error::AudioError;
pub use handle::RodioHandle;
