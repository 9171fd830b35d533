use crate::error::RecordError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One crawled page as handed over by the crawler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl PageRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            parent_url: None,
            discovered_at: None,
            links: Vec::new(),
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_parent(mut self, parent_url: impl Into<String>) -> Self {
        self.parent_url = Some(parent_url.into());
        self
    }

    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_discovered_at(mut self, at: DateTime<Utc>) -> Self {
        self.discovered_at = Some(at);
        self
    }

    /// Parent url, ignoring a parent that points back at the page itself.
    pub fn effective_parent(&self) -> Option<&str> {
        self.parent_url
            .as_deref()
            .filter(|parent| !parent.is_empty() && *parent != self.url)
    }

    /// Decode a single JSON object (one line of a JSON Lines batch).
    pub fn from_json_line(line: &str) -> Result<Self, RecordError> {
        let record: PageRecord = serde_json::from_str(line)?;
        if record.url.trim().is_empty() {
            return Err(RecordError::MissingUrl);
        }
        Ok(record)
    }
}
