//! mddb Content Store
//!
//! This crate provides a multi-tenant content store: organizations own
//! workspaces, and workspaces own a hierarchy of markdown pages, tables of
//! semi-structured records, and binary assets.
//!
//! # Guarantees
//!
//! - **Quota-gated mutation**: table, page, record, workspace and storage
//!   limits are checked and committed atomically, even under concurrent
//!   requests
//! - **Hierarchical integrity**: the page graph stays acyclic under moves,
//!   and deletes are denied while dependents exist
//! - **Schema-on-read records**: typed accessors never fail; they default on
//!   missing or mismatched values
//!
//! # Architecture
//!
//! - [`ids`] - Opaque identifier newtypes
//! - [`context`] - Cancellation and deadlines for every operation
//! - [`types`] - Entities, values and quota types
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage and search traits
//! - [`backends`] - Backend implementations
//! - [`search`] - Search service implementations
//! - [`config`] - Store configuration
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use mddb_content::backends::memory::MemoryBackend;
//! use mddb_content::core::{AssetStorage, PageHierarchy, SearchService, TenantDirectory};
//! use mddb_content::search::ContentSearch;
//! use mddb_content::types::{NewAsset, NewPage, SearchOptions};
//! use mddb_content::OperationContext;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryBackend::new());
//! let ctx = OperationContext::new().with_correlation_id("quick-start");
//!
//! let org = store.create_organization(&ctx, "Acme", None).await?;
//! let ws = store.create_workspace(&ctx, &org.id, "Handbook", None).await?;
//!
//! let root = store
//!     .create_page(&ctx, &ws.id, NewPage::new("Welcome").with_content("Hello, team"))
//!     .await?;
//! store
//!     .create_page(&ctx, &ws.id, NewPage::new("Onboarding").with_parent(root.id.clone()))
//!     .await?;
//!
//! store.create_asset(&ctx, &ws.id, NewAsset::new("logo.png", 2048)).await?;
//!
//! let search = ContentSearch::new(store.clone());
//! let hits = search.search(&ctx, &org.id, SearchOptions::new("welcome")).await?;
//! assert_eq!(hits.len(), 1);
//! # Ok::<(), mddb_content::ContentError>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod ids;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use config::StoreConfig;
pub use context::{CancelHandle, OperationContext};
pub use error::{ContentError, ContentResult};
pub use ids::{AssetId, OrganizationId, PageId, RecordId, TableId, WorkspaceId};

// Re-export core traits
pub use core::{
    AssetStorage, PageHierarchy, QuotaGetter, SearchService, TableStorage, TenantDirectory,
};

/// Installs a `tracing` subscriber that writes formatted logs.
///
/// `RUST_LOG` takes precedence over `level` when set. Calling this more than
/// once keeps the first subscriber.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
///
/// # Returns
///
/// `true` if this call installed the subscriber, `false` if one was already
/// set.
pub fn init_logging(level: &str) -> bool {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mddb_content={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
