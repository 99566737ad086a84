//! Pages and hierarchy nodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Table;
use crate::ids::{PageId, WorkspaceId};

/// A markdown page in a workspace hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: PageId,

    /// Owning workspace.
    pub workspace_id: WorkspaceId,

    /// Parent page; `None` for a root page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PageId>,

    /// Page title.
    pub title: String,

    /// Markdown body.
    #[serde(default)]
    pub content: String,

    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// When the page was created.
    pub created: DateTime<Utc>,

    /// When the page was last modified.
    pub modified: DateTime<Utc>,
}

impl Page {
    /// Returns `true` if the page has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input for creating a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPage {
    /// Title; must be non-empty.
    pub title: String,

    /// Markdown body.
    #[serde(default)]
    pub content: String,

    /// Parent page in the same workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PageId>,

    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewPage {
    /// Creates input for a root page with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the markdown body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Places the page under a parent.
    pub fn with_parent(mut self, parent_id: PageId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Partial update of a page. `None` fields are left unchanged.
///
/// The parent is changed only through `move_page`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageUpdate {
    /// New title; must be non-empty if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Replacement tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A content node: either a page or a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A page node.
    Page(Page),
    /// A table node.
    Table(Table),
}

impl Node {
    /// Returns the node's ID as a string.
    pub fn id(&self) -> &str {
        match self {
            Node::Page(p) => p.id.as_str(),
            Node::Table(t) => t.id.as_str(),
        }
    }

    /// Returns the node's display title.
    pub fn title(&self) -> &str {
        match self {
            Node::Page(p) => &p.title,
            Node::Table(t) => &t.name,
        }
    }
}
