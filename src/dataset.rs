//! The lesson dataset: CSV rows of `(group, page, page title, track title, url)`
//! and the pure builders deriving groups, pages and track lists from it.

mod build;
mod load;
mod model;

pub use build::{groups, pages_for, tracks_for};
pub use load::{DatasetError, load_dataset, parse_csv};
pub use model::{Dataset, DatasetRow, PageEntry, Track};

#[cfg(test)]
mod tests;
