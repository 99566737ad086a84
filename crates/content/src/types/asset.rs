//! Binary asset metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, WorkspaceId};

/// MIME type used when an asset is created without one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A binary object whose size counts against the organization storage quota.
///
/// Only metadata is kept here; the bytes live in the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset ID.
    pub id: AssetId,

    /// Owning workspace.
    pub workspace_id: WorkspaceId,

    /// File name.
    pub name: String,

    /// MIME type.
    pub mime_type: String,

    /// Size in bytes.
    pub size_bytes: u64,

    /// When the asset was created.
    pub created: DateTime<Utc>,
}

/// Input for creating an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    /// File name; must be non-empty.
    pub name: String,

    /// MIME type; defaults to [`DEFAULT_MIME_TYPE`] when empty.
    #[serde(default)]
    pub mime_type: String,

    /// Size in bytes.
    pub size_bytes: u64,
}

impl NewAsset {
    /// Creates input for an asset of the given size.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: String::new(),
            size_bytes,
        }
    }

    /// Sets the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Returns the MIME type to store.
    pub fn effective_mime_type(&self) -> &str {
        if self.mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            &self.mime_type
        }
    }
}
