//! Store configuration.
//!
//! Supports programmatic construction, command line flags, and environment
//! variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MDDB_LOG_LEVEL` | info | Log level |
//! | `MDDB_MAX_TABLES_PER_WORKSPACE` | 100 | Tables per workspace (0 = unlimited) |
//! | `MDDB_MAX_STORAGE_BYTES` | 5368709120 | Asset bytes per organization (0 = unlimited) |
//! | `MDDB_MAX_WORKSPACES` | 3 | Workspaces per organization (0 = unlimited) |
//! | `MDDB_MAX_PAGES_PER_WORKSPACE` | 1000 | Pages per workspace (0 = unlimited) |
//! | `MDDB_MAX_RECORDS_PER_TABLE` | 10000 | Records per table (0 = unlimited) |
//! | `MDDB_MAX_ASSET_SIZE_BYTES` | 52428800 | Size of a single asset (0 = unlimited) |
//! | `MDDB_MAX_HIERARCHY_DEPTH` | 256 | Page nesting depth (0 = unlimited) |
//!
//! # Example
//!
//! ```rust
//! use mddb_content::StoreConfig;
//!
//! // Create from environment
//! let config = StoreConfig::from_env();
//!
//! // Or create programmatically
//! let config = StoreConfig {
//!     max_tables_per_workspace: 2,
//!     ..Default::default()
//! };
//! assert_eq!(config.default_limits().max_tables_per_workspace, 2);
//! ```

use clap::Parser;

use crate::types::QuotaLimits;

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

/// Configuration of a content store.
///
/// Quota values become the limits of organizations created without explicit
/// limits.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "mddb-content")]
#[command(about = "Multi-tenant content store")]
pub struct StoreConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MDDB_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum tables per workspace.
    #[arg(long, env = "MDDB_MAX_TABLES_PER_WORKSPACE", default_value = "100")]
    pub max_tables_per_workspace: u64,

    /// Maximum asset bytes per organization.
    #[arg(long, env = "MDDB_MAX_STORAGE_BYTES", default_value = "5368709120")]
    pub max_storage_bytes: u64,

    /// Maximum workspaces per organization.
    #[arg(long, env = "MDDB_MAX_WORKSPACES", default_value = "3")]
    pub max_workspaces: u64,

    /// Maximum pages per workspace.
    #[arg(long, env = "MDDB_MAX_PAGES_PER_WORKSPACE", default_value = "1000")]
    pub max_pages_per_workspace: u64,

    /// Maximum records per table.
    #[arg(long, env = "MDDB_MAX_RECORDS_PER_TABLE", default_value = "10000")]
    pub max_records_per_table: u64,

    /// Maximum size of a single asset in bytes.
    #[arg(long, env = "MDDB_MAX_ASSET_SIZE_BYTES", default_value = "52428800")]
    pub max_asset_size_bytes: u64,

    /// Maximum page nesting depth.
    #[arg(long, env = "MDDB_MAX_HIERARCHY_DEPTH", default_value = "256")]
    pub max_hierarchy_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_tables_per_workspace: 100,
            max_storage_bytes: 5 * GIB,
            max_workspaces: 3,
            max_pages_per_workspace: 1000,
            max_records_per_table: 10_000,
            max_asset_size_bytes: 50 * MIB,
            max_hierarchy_depth: 256,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Falls back to the defaults when parsing fails.
    pub fn from_env() -> Self {
        Self::try_parse_from(["mddb-content"]).unwrap_or_default()
    }

    /// Returns the quota limits for new organizations.
    pub fn default_limits(&self) -> QuotaLimits {
        QuotaLimits {
            max_tables_per_workspace: self.max_tables_per_workspace,
            max_storage_bytes: self.max_storage_bytes,
            max_workspaces: self.max_workspaces,
            max_pages_per_workspace: self.max_pages_per_workspace,
            max_records_per_table: self.max_records_per_table,
            max_asset_size_bytes: self.max_asset_size_bytes,
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!("Unknown log level '{}'", self.log_level));
        }

        if self.max_storage_bytes > 0
            && self.max_asset_size_bytes > 0
            && self.max_asset_size_bytes > self.max_storage_bytes
        {
            errors.push("Max asset size cannot exceed max storage".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing: small limits and debug
    /// logging.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            max_tables_per_workspace: 10,
            max_storage_bytes: 10 * MIB,
            max_workspaces: 5,
            max_pages_per_workspace: 100,
            max_records_per_table: 100,
            max_asset_size_bytes: MIB,
            max_hierarchy_depth: 32,
        }
    }
}
