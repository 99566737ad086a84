//! Organizations and workspaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::QuotaLimits;
use crate::ids::{OrganizationId, WorkspaceId};

/// The top-level tenant. Owns workspaces and carries quota limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID.
    pub id: OrganizationId,

    /// Display name.
    pub name: String,

    /// Quota limits applied to this organization.
    pub limits: QuotaLimits,

    /// When the organization was created.
    pub created: DateTime<Utc>,
}

/// An isolated content area inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Workspace ID.
    pub id: WorkspaceId,

    /// Owning organization.
    pub organization_id: OrganizationId,

    /// Display name.
    pub name: String,

    /// Workspace-level limits, narrowing the organization's. `None` applies
    /// the organization's limits unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<QuotaLimits>,

    /// When the workspace was created.
    pub created: DateTime<Utc>,
}
