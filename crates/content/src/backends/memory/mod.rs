//! In-memory backend.
//!
//! Holds every organization, workspace, page, table, record and asset in
//! process memory. It is the reference implementation of the storage traits
//! and the default quota source.
//!
//! # Concurrency
//!
//! - Each workspace's content sits behind an async `RwLock`. Hierarchy and
//!   table mutations take the write lock, so a quota or cycle check and the
//!   commit that follows it are atomic per workspace.
//! - Each organization has a quota gate (an async mutex). Asset and workspace
//!   creation and deletion hold it, so storage and workspace limits cannot be
//!   jointly exceeded by concurrent requests.
//! - Lock order is always the organization gate first, then the workspace.
//! - Directory maps use `parking_lot` locks that are never held across an
//!   `.await`.
//!
//! # Example
//!
//! ```
//! use mddb_content::backends::memory::MemoryBackend;
//! use mddb_content::context::OperationContext;
//! use mddb_content::core::{PageHierarchy, TableStorage, TenantDirectory};
//! use mddb_content::types::{NewPage, NewTable, PropertyType, QuotaLimits};
//!
//! # tokio_test::block_on(async {
//! let store = MemoryBackend::new();
//! let ctx = OperationContext::new();
//!
//! let limits = QuotaLimits::unlimited().with_max_tables_per_workspace(1);
//! let org = store.create_organization(&ctx, "Acme", Some(limits)).await?;
//! let ws = store.create_workspace(&ctx, &org.id, "Docs", None).await?;
//!
//! let home = store.create_page(&ctx, &ws.id, NewPage::new("Home")).await?;
//! assert!(home.is_root());
//!
//! let tasks = NewTable::new("Tasks").with_property("done", PropertyType::Checkbox);
//! store.create_table(&ctx, &ws.id, tasks).await?;
//! assert!(store.create_table(&ctx, &ws.id, NewTable::new("More")).await.is_err());
//! # Ok::<(), mddb_content::ContentError>(())
//! # }).unwrap();
//! ```

mod assets;
mod backend;
mod hierarchy;
mod state;
mod tables;

pub use backend::{MemoryBackend, MemoryBackendConfig};
