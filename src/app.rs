//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the dataset, the active
//! route with its pages and tracks, and the list cursor.

mod model;

pub use model::*;
