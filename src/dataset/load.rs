use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::model::{Dataset, DatasetRow};
use crate::resource::{Resource, ResourceError};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to fetch dataset: {0}")]
    Fetch(#[from] ResourceError),
    #[error("failed to read CSV header: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no {0:?} column")]
    MissingColumn(&'static str),
}

/// Column groups the dataset must carry; each entry lists the accepted spellings.
const REQUIRED_COLUMNS: [(&str, &[&str]); 3] = [
    ("week", &["week", "group"]),
    ("page", &["page", "subgroup"]),
    ("url", &["url", "track_url"]),
];

/// Fetch and parse the dataset at `source`.
pub fn load_dataset(source: &Resource, client: &Client) -> Result<Dataset, DatasetError> {
    let text = source.read_text(client)?;
    let mut dataset = parse_csv(&text)?;
    resolve_urls(&mut dataset, source);
    info!(source = %source, rows = dataset.rows.len(), "dataset loaded");
    Ok(dataset)
}

/// Parse CSV text with a header row. Malformed rows are skipped, not fatal.
pub fn parse_csv(text: &str) -> Result<Dataset, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    for (name, spellings) in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| spellings.contains(&h)) {
            return Err(DatasetError::MissingColumn(name));
        }
    }

    let mut rows = Vec::new();
    for (line, record) in rdr.deserialize::<DatasetRow>().enumerate() {
        match record {
            Ok(row) if row.url.trim().is_empty() => {
                debug!(line = line + 2, "skipping dataset row without url");
            }
            Ok(row) => rows.push(row),
            Err(e) => warn!(line = line + 2, error = %e, "skipping malformed dataset row"),
        }
    }
    Ok(Dataset::new(rows))
}

fn resolve_urls(dataset: &mut Dataset, base: &Resource) {
    for row in &mut dataset.rows {
        match base.join(&row.url) {
            Ok(resolved) => row.url = resolved.to_string(),
            Err(e) => warn!(url = %row.url, error = %e, "keeping unresolvable track url as-is"),
        }
    }
}
