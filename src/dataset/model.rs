use std::hash::{Hash, Hasher};

use serde::Deserialize;

/// One row of the dataset CSV.
///
/// Header names follow the lesson export (`week,page,page_title,title,url`);
/// the generic `group`/`subgroup` spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetRow {
    #[serde(alias = "week")]
    pub group: String,
    #[serde(alias = "subgroup")]
    pub page: String,
    #[serde(alias = "subgroup_title", default)]
    pub page_title: String,
    #[serde(alias = "track_title", default)]
    pub title: String,
    #[serde(alias = "track_url")]
    pub url: String,
}

/// A playable item. Its URL is its identity.
#[derive(Debug, Clone)]
pub struct Track {
    pub title: String,
    pub url: String,
}

impl Track {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

/// An entry in the page selector of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub number: u32,
    pub label: String,
}

/// All rows loaded from the dataset source, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new(rows: Vec<DatasetRow>) -> Self {
        Self { rows }
    }
}
