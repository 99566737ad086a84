//! Core storage traits.
//!
//! - [`QuotaGetter`] - limits and committed usage of an organization
//! - [`TenantDirectory`] - organizations and workspaces
//! - [`PageHierarchy`] - the page forest of a workspace
//! - [`TableStorage`] - tables and their records
//! - [`AssetStorage`] - binary asset metadata
//! - [`SearchService`] - optional full-text search
//!
//! Every operation takes an [`OperationContext`](crate::context::OperationContext)
//! as its first parameter and returns a
//! [`ContentResult`](crate::error::ContentResult).
//!
//! # Consumers
//!
//! The table and asset stores consume a [`QuotaGetter`] when checking limits.
//! A store can answer quota itself or defer to an external source:
//!
//! ```text
//! TableStorage ──┐
//!                ├── QuotaGetter (limits) + committed counters (usage)
//! AssetStorage ──┘
//!
//! SearchService ── reads TenantDirectory, PageHierarchy, TableStorage
//! ```

mod assets;
mod hierarchy;
mod quota;
mod search;
mod tables;
mod tenant;

pub use assets::AssetStorage;
pub use hierarchy::PageHierarchy;
pub use quota::QuotaGetter;
pub use search::SearchService;
pub use tables::TableStorage;
pub use tenant::TenantDirectory;
