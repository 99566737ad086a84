//! Search request and result types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// Parameters for a full-text search.
///
/// When none of the `match_*` flags is set, all of them apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Query string, matched case-insensitively as a substring.
    pub query: String,

    /// Maximum number of results; `0` returns everything.
    #[serde(default)]
    pub limit: usize,

    /// Search page titles.
    #[serde(default)]
    pub match_title: bool,

    /// Search page bodies.
    #[serde(default)]
    pub match_body: bool,

    /// Search record fields.
    #[serde(default)]
    pub match_fields: bool,
}

impl SearchOptions {
    /// Creates options for a query across titles, bodies and fields.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns `(title, body, fields)` with the all-unset default applied.
    pub fn effective_targets(&self) -> (bool, bool, bool) {
        if !self.match_title && !self.match_body && !self.match_fields {
            (true, true, true)
        } else {
            (self.match_title, self.match_body, self.match_fields)
        }
    }
}

/// What kind of entity a search hit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchHitKind {
    /// A page matched by title or body.
    Page,
    /// A table record matched by field value.
    Record,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Hit kind.
    #[serde(rename = "type")]
    pub kind: SearchHitKind,

    /// The page or table that contains the hit.
    pub node_id: String,

    /// The matched record, for record hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,

    /// Page title or table name.
    pub title: String,

    /// Text around the match.
    pub snippet: String,

    /// Relevance score, at most 100.
    pub score: f64,

    /// Matched fields and their values.
    #[serde(default)]
    pub matches: BTreeMap<String, String>,

    /// Last modification of the matched entity.
    pub modified: DateTime<Utc>,
}
