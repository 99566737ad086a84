//! Quota limits and usage.

use serde::{Deserialize, Serialize};

use crate::error::QuotaError;

/// Configured limits for the server, an organization, or a workspace. A
/// limit of `0` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuotaLimits {
    /// Maximum tables in any one workspace.
    #[serde(default)]
    pub max_tables_per_workspace: u64,

    /// Maximum total asset bytes across the organization.
    #[serde(default)]
    pub max_storage_bytes: u64,

    /// Maximum workspaces in the organization.
    #[serde(default)]
    pub max_workspaces: u64,

    /// Maximum pages in any one workspace.
    #[serde(default)]
    pub max_pages_per_workspace: u64,

    /// Maximum records in any one table.
    #[serde(default)]
    pub max_records_per_table: u64,

    /// Maximum size of a single asset.
    #[serde(default)]
    pub max_asset_size_bytes: u64,
}

impl QuotaLimits {
    /// Limits with every value unlimited.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Sets the table limit.
    pub fn with_max_tables_per_workspace(mut self, max: u64) -> Self {
        self.max_tables_per_workspace = max;
        self
    }

    /// Sets the storage limit.
    pub fn with_max_storage_bytes(mut self, max: u64) -> Self {
        self.max_storage_bytes = max;
        self
    }

    /// Sets the workspace limit.
    pub fn with_max_workspaces(mut self, max: u64) -> Self {
        self.max_workspaces = max;
        self
    }

    /// Sets the page limit.
    pub fn with_max_pages_per_workspace(mut self, max: u64) -> Self {
        self.max_pages_per_workspace = max;
        self
    }

    /// Sets the record limit.
    pub fn with_max_records_per_table(mut self, max: u64) -> Self {
        self.max_records_per_table = max;
        self
    }

    /// Sets the single-asset limit.
    pub fn with_max_asset_size_bytes(mut self, max: u64) -> Self {
        self.max_asset_size_bytes = max;
        self
    }

    /// Combines two layers field by field, keeping the smaller positive
    /// value. A `0` (unlimited) in one layer defers to the other.
    pub fn narrowed_by(self, other: QuotaLimits) -> Self {
        Self {
            max_tables_per_workspace: min_positive(
                self.max_tables_per_workspace,
                other.max_tables_per_workspace,
            ),
            max_storage_bytes: min_positive(self.max_storage_bytes, other.max_storage_bytes),
            max_workspaces: min_positive(self.max_workspaces, other.max_workspaces),
            max_pages_per_workspace: min_positive(
                self.max_pages_per_workspace,
                other.max_pages_per_workspace,
            ),
            max_records_per_table: min_positive(
                self.max_records_per_table,
                other.max_records_per_table,
            ),
            max_asset_size_bytes: min_positive(
                self.max_asset_size_bytes,
                other.max_asset_size_bytes,
            ),
        }
    }
}

fn min_positive(a: u64, b: u64) -> u64 {
    match (a, b) {
        (0, b) => b,
        (a, 0) => a,
        (a, b) => a.min(b),
    }
}

/// Effective limits of a workspace: the server, organization and optional
/// workspace layers narrowed into one.
pub fn effective_limits(
    server: QuotaLimits,
    organization: QuotaLimits,
    workspace: Option<QuotaLimits>,
) -> QuotaLimits {
    let limits = server.narrowed_by(organization);
    match workspace {
        Some(ws) => limits.narrowed_by(ws),
        None => limits,
    }
}

/// Committed usage counters for an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuotaUsage {
    /// Total asset bytes.
    #[serde(default)]
    pub storage_bytes: u64,

    /// Number of workspaces.
    #[serde(default)]
    pub workspace_count: u64,

    /// Number of tables across all workspaces.
    #[serde(default)]
    pub table_count: u64,

    /// Number of pages across all workspaces.
    #[serde(default)]
    pub page_count: u64,
}

/// Limits and usage of one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quota {
    /// Configured limits.
    pub limits: QuotaLimits,

    /// Committed usage.
    pub usage: QuotaUsage,
}

impl Quota {
    /// Creates a quota with zero usage.
    pub fn new(limits: QuotaLimits) -> Self {
        Self {
            limits,
            usage: QuotaUsage::default(),
        }
    }

    /// Bytes still available, or `None` when storage is unlimited.
    pub fn remaining_storage(&self) -> Option<u64> {
        match self.limits.max_storage_bytes {
            0 => None,
            max => Some(max.saturating_sub(self.usage.storage_bytes)),
        }
    }
}

/// Fails when adding one more item to `current` would exceed `limit`.
///
/// Used for count limits, where reaching the limit is already full.
pub fn check_count(resource: &'static str, current: u64, limit: u64) -> Result<(), QuotaError> {
    if limit > 0 && current >= limit {
        return Err(QuotaError::Exceeded {
            resource,
            used: current,
            limit,
        });
    }
    Ok(())
}

/// Returns `true` when `used + requested` fits within `limit`.
pub fn check_amount(used: u64, requested: u64, limit: u64) -> bool {
    limit == 0 || used.saturating_add(requested) <= limit
}
