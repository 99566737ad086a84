//! Error types for the content store.
//!
//! Errors are grouped by what the caller can do about them:
//!
//! - [`ValidationError`] and [`NotFoundError`] are client-correctable; nothing
//!   was mutated and the request may be retried with corrected input.
//! - [`IntegrityError`] and [`QuotaError`] are rejections of a specific
//!   mutation; retrying only helps after external state changes.
//! - [`OperationError`] reports cancellation or an expired deadline.
//! - [`SearchError`] comes from the optional search collaborator.
//!
//! Every variant carries enough context to surface the specific reason, and
//! errors are matched by kind rather than by identity.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::time::Duration;

use thiserror::Error;

use crate::ids::{AssetId, OrganizationId, PageId, RecordId, TableId, WorkspaceId};

/// The primary error type for all content operations.
#[derive(Error, Debug)]
pub enum ContentError {
    /// Input validation errors, raised before any mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Lookup of an entity that does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Hierarchy and referential integrity errors.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Quota errors, raised at the commit boundary.
    #[error(transparent)]
    Quota(#[from] QuotaError),

    /// Search collaborator errors.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Cancellation and deadline errors.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl ContentError {
    /// Returns `true` for errors the caller can correct by changing the request
    /// (validation and not-found errors).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ContentError::Validation(_) | ContentError::NotFound(_))
    }

    /// Returns `true` for errors that reject a well-formed mutation
    /// (quota and integrity errors).
    pub fn is_rejection(&self) -> bool {
        matches!(self, ContentError::Quota(_) | ContentError::Integrity(_))
    }
}

/// Errors raised while validating the request, before any state change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("workspace ID is required")]
    WorkspaceIdRequired,

    #[error("organization ID is required")]
    OrganizationIdRequired,

    #[error("{entity} ID is required")]
    IdRequired { entity: &'static str },

    #[error("{entity} name is required")]
    NameRequired { entity: &'static str },

    #[error("invalid table schema: {message}")]
    InvalidSchema { message: String },
}

/// Errors raised when a referenced entity does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("organization not found: {id}")]
    Organization { id: OrganizationId },

    #[error("workspace not found: {id}")]
    Workspace { id: WorkspaceId },

    #[error("page not found: {id}")]
    Page { id: PageId },

    #[error("table not found: {id}")]
    Table { id: TableId },

    #[error("asset not found: {id}")]
    Asset { id: AssetId },

    #[error("node not found: {id}")]
    Node { id: String },

    #[error("database not found: {id}")]
    Database { id: TableId },

    #[error("record not found: {table_id}/{id}")]
    Record { table_id: TableId, id: RecordId },
}

/// Errors raised when a mutation would break hierarchical or referential
/// integrity. These are permanent rejections of that specific mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("move would create a cycle: {page_id} cannot be placed under {new_parent_id}")]
    CycleDetected {
        page_id: PageId,
        new_parent_id: PageId,
    },

    #[error("page hierarchy too deep: depth {depth} exceeds maximum {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("{entity} {id} still has {count} dependent entities")]
    HasChildren {
        entity: &'static str,
        id: String,
        count: usize,
    },
}

/// Errors raised when a mutation would exceed a configured limit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotaError {
    #[error("quota exceeded for {resource} ({used}/{limit})")]
    Exceeded {
        resource: &'static str,
        used: u64,
        limit: u64,
    },

    #[error("maximum number of tables per workspace exceeded for {workspace_id} (limit {limit})")]
    TableQuotaExceeded {
        workspace_id: WorkspaceId,
        limit: u64,
    },

    #[error(
        "server storage quota exceeded for {organization_id}: {used} + {requested} bytes exceeds {limit}"
    )]
    ServerStorageQuotaExceeded {
        organization_id: OrganizationId,
        used: u64,
        requested: u64,
        limit: u64,
    },

    #[error("asset too large: {size} bytes exceeds the {limit} byte limit")]
    AssetTooLarge { size: u64, limit: u64 },
}

/// Errors from the search collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search not implemented")]
    NotImplemented,
}

/// Errors raised when an operation is aborted by its context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded after {elapsed:?}")]
    DeadlineExceeded { elapsed: Duration },
}

/// Result type alias for content operations.
pub type ContentResult<T> = Result<T, ContentError>;
