//! Locations the app reads bytes from: local files and HTTP URLs.
//!
//! Both the dataset and the tracks it lists go through `Resource`, so a
//! dataset served over HTTP can use relative track URLs and a local CSV can
//! point at files next to it.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    File(PathBuf),
    Http(Url),
}

impl Resource {
    /// Interpret `raw` on its own: `http(s)://` and `file://` URLs, otherwise a path.
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        let raw = raw.trim();
        if is_http(raw) {
            return Url::parse(raw)
                .map(Resource::Http)
                .map_err(|_| ResourceError::InvalidUrl(raw.to_string()));
        }
        if raw.starts_with("file://") {
            let url = Url::parse(raw).map_err(|_| ResourceError::InvalidUrl(raw.to_string()))?;
            return url
                .to_file_path()
                .map(Resource::File)
                .map_err(|_| ResourceError::InvalidUrl(raw.to_string()));
        }
        if raw.is_empty() {
            return Err(ResourceError::InvalidUrl(raw.to_string()));
        }
        Ok(Resource::File(PathBuf::from(raw)))
    }

    /// Interpret `raw` relative to `self`.
    ///
    /// Over HTTP this is URL joining (so `/audio/a.mp3` is site-rooted).
    /// For files, relative paths resolve against the directory holding `self`.
    pub fn join(&self, raw: &str) -> Result<Self, ResourceError> {
        let raw = raw.trim();
        if is_http(raw) || raw.starts_with("file://") {
            return Self::parse(raw);
        }
        match self {
            Resource::Http(base) => base
                .join(raw)
                .map(Resource::Http)
                .map_err(|_| ResourceError::InvalidUrl(raw.to_string())),
            Resource::File(base) => {
                let p = Path::new(raw);
                if p.is_absolute() || raw.is_empty() {
                    return Self::parse(raw);
                }
                let dir = base.parent().unwrap_or_else(|| Path::new(""));
                Ok(Resource::File(dir.join(p)))
            }
        }
    }

    /// Read the whole resource into memory.
    pub fn read_bytes(&self, client: &Client) -> Result<Vec<u8>, ResourceError> {
        match self {
            Resource::File(path) => fs::read(path).map_err(|source| ResourceError::Io {
                path: path.clone(),
                source,
            }),
            Resource::Http(url) => {
                let http_err = |source| ResourceError::Http {
                    url: url.to_string(),
                    source,
                };
                let mut resp = client
                    .get(url.clone())
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(http_err)?;
                let mut buf = Vec::new();
                resp.read_to_end(&mut buf).map_err(|source| ResourceError::Io {
                    path: PathBuf::from(url.as_str()),
                    source,
                })?;
                Ok(buf)
            }
        }
    }

    /// Read the whole resource as UTF-8 text (lossy).
    pub fn read_text(&self, client: &Client) -> Result<String, ResourceError> {
        let bytes = self.read_bytes(client)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::File(p) => write!(f, "{}", p.display()),
            Resource::Http(u) => write!(f, "{u}"),
        }
    }
}

fn is_http(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Build the blocking HTTP client shared by the dataset loader and the audio engine.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
