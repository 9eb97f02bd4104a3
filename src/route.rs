//! The `/audio/:group/:page` route that selects the active track list.

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub group: String,
    pub page: String,
}

impl Route {
    pub fn new(group: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            page: page.into(),
        }
    }

    /// Parse `/audio/{group}/{page}`. Leading/trailing slashes are optional.
    pub fn parse(path: &str) -> Option<Self> {
        let mut parts = path.trim().trim_matches('/').split('/');
        let (Some("audio"), Some(group), Some(page), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };
        if group.is_empty() || page.is_empty() {
            return None;
        }
        Some(Self::new(group, page))
    }

    /// Parse `path`, redirecting anything unrecognized to `fallback`.
    pub fn resolve(path: &str, fallback: &Route) -> Self {
        Self::parse(path).unwrap_or_else(|| {
            debug!(path, to = %fallback, "unrecognized route, redirecting");
            fallback.clone()
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/audio/{}/{}", self.group, self.page)
    }
}
