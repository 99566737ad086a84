//! In-memory backend: construction, tenant directory, and quota.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::context::OperationContext;
use crate::core::{QuotaGetter, TenantDirectory};
use crate::error::{ContentResult, IntegrityError, NotFoundError, ValidationError};
use crate::ids::{OrganizationId, WorkspaceId};
use crate::types::{Organization, Quota, QuotaLimits, Workspace, check_count, effective_limits};

use super::state::{OrgEntry, UsageCounters, WorkspaceEntry};

/// Configuration for the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBackendConfig {
    /// Server-wide limits. Organizations created without explicit limits
    /// start with these, and no organization or workspace limit can exceed
    /// them.
    #[serde(default = "default_limits")]
    pub default_limits: QuotaLimits,

    /// Maximum page depth; a root page has depth 1. `0` means unlimited.
    #[serde(default = "default_max_hierarchy_depth")]
    pub max_hierarchy_depth: usize,
}

fn default_limits() -> QuotaLimits {
    StoreConfig::default().default_limits()
}

fn default_max_hierarchy_depth() -> usize {
    StoreConfig::default().max_hierarchy_depth
}

impl Default for MemoryBackendConfig {
    fn default() -> Self {
        Self {
            default_limits: default_limits(),
            max_hierarchy_depth: default_max_hierarchy_depth(),
        }
    }
}

impl From<&StoreConfig> for MemoryBackendConfig {
    fn from(config: &StoreConfig) -> Self {
        Self {
            default_limits: config.default_limits(),
            max_hierarchy_depth: config.max_hierarchy_depth,
        }
    }
}

/// A content store held entirely in memory.
///
/// Implements every storage trait in [`crate::core`] except search. It is
/// safe to share behind an `Arc` across tasks.
pub struct MemoryBackend {
    config: MemoryBackendConfig,
    quota_source: Option<Arc<dyn QuotaGetter>>,
    organizations: RwLock<HashMap<OrganizationId, Arc<OrgEntry>>>,
    workspaces: RwLock<HashMap<WorkspaceId, Arc<WorkspaceEntry>>>,
    sequence: AtomicU64,
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("config", &self.config)
            .field("external_quota", &self.quota_source.is_some())
            .field("organizations", &self.organizations.read().len())
            .field("workspaces", &self.workspaces.read().len())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty backend with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryBackendConfig::default())
    }

    /// Creates an empty backend with a custom configuration.
    pub fn with_config(config: MemoryBackendConfig) -> Self {
        Self {
            config,
            quota_source: None,
            organizations: RwLock::new(HashMap::new()),
            workspaces: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Takes quota limits from an external source instead of the stored
    /// organization limits. Usage still comes from this backend's counters.
    pub fn with_quota_source(mut self, source: Arc<dyn QuotaGetter>) -> Self {
        self.quota_source = Some(source);
        self
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &MemoryBackendConfig {
        &self.config
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn org_entry(&self, id: &OrganizationId) -> ContentResult<Arc<OrgEntry>> {
        if id.is_empty() {
            return Err(ValidationError::OrganizationIdRequired.into());
        }
        self.organizations
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| NotFoundError::Organization { id: id.clone() }.into())
    }

    pub(crate) fn workspace_entry(&self, id: &WorkspaceId) -> ContentResult<Arc<WorkspaceEntry>> {
        if id.is_empty() {
            return Err(ValidationError::WorkspaceIdRequired.into());
        }
        self.workspaces
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| NotFoundError::Workspace { id: id.clone() }.into())
    }

    /// Limits that apply to an organization right now: the server defaults
    /// narrowed by the organization's own limits (or the external source's).
    pub(crate) async fn org_limits(
        &self,
        ctx: &OperationContext,
        org: &OrgEntry,
    ) -> ContentResult<QuotaLimits> {
        let org_layer = match &self.quota_source {
            Some(source) => source.get_quota(ctx, &org.id()).await?.limits,
            None => org.limits(),
        };
        Ok(effective_limits(self.config.default_limits, org_layer, None))
    }

    /// Limits that apply inside a workspace: the organization's limits
    /// narrowed by the workspace's own.
    pub(crate) async fn workspace_limits(
        &self,
        ctx: &OperationContext,
        entry: &WorkspaceEntry,
    ) -> ContentResult<QuotaLimits> {
        let org = self.org_limits(ctx, &entry.org).await?;
        Ok(effective_limits(QuotaLimits::unlimited(), org, entry.limits()))
    }
}

fn require_name(name: &str, entity: &'static str) -> ContentResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired { entity }.into());
    }
    Ok(())
}

#[async_trait]
impl QuotaGetter for MemoryBackend {
    async fn get_quota(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
    ) -> ContentResult<Quota> {
        ctx.ensure_active()?;
        let org = self.org_entry(organization_id)?;
        let limits = self.org_limits(ctx, &org).await?;
        Ok(Quota {
            limits,
            usage: org.usage.snapshot(),
        })
    }
}

#[async_trait]
impl TenantDirectory for MemoryBackend {
    async fn create_organization(
        &self,
        ctx: &OperationContext,
        name: &str,
        limits: Option<QuotaLimits>,
    ) -> ContentResult<Organization> {
        ctx.ensure_active()?;
        require_name(name, "organization")?;

        let org = Organization {
            id: OrganizationId::generate(),
            name: name.to_string(),
            limits: limits.unwrap_or(self.config.default_limits),
            created: Utc::now(),
        };
        let entry = Arc::new(OrgEntry::new(self.next_seq(), org.clone()));
        self.organizations.write().insert(org.id.clone(), entry);

        tracing::info!("Created organization {} ({})", org.id, org.name);
        Ok(org)
    }

    async fn get_organization(
        &self,
        ctx: &OperationContext,
        id: &OrganizationId,
    ) -> ContentResult<Organization> {
        ctx.ensure_active()?;
        let entry = self.org_entry(id)?;
        Ok(entry.org.read().clone())
    }

    async fn set_quota_limits(
        &self,
        ctx: &OperationContext,
        id: &OrganizationId,
        limits: QuotaLimits,
    ) -> ContentResult<Organization> {
        ctx.ensure_active()?;
        let entry = self.org_entry(id)?;
        let _gate = entry.gate.lock().await;
        entry.ensure_live()?;
        ctx.ensure_active()?;

        let mut org = entry.org.write();
        org.limits = limits;
        tracing::info!("Updated quota limits for organization {}", id);
        Ok(org.clone())
    }

    async fn list_organizations(&self, ctx: &OperationContext) -> ContentResult<Vec<Organization>> {
        ctx.ensure_active()?;
        let mut entries: Vec<Arc<OrgEntry>> = self.organizations.read().values().cloned().collect();
        entries.sort_by_key(|e| e.seq);
        Ok(entries.iter().map(|e| e.org.read().clone()).collect())
    }

    async fn delete_organization(
        &self,
        ctx: &OperationContext,
        id: &OrganizationId,
    ) -> ContentResult<()> {
        ctx.ensure_active()?;
        let entry = self.org_entry(id)?;
        let _gate = entry.gate.lock().await;
        entry.ensure_live()?;

        let workspaces = entry.usage.workspace_count.load(Ordering::Acquire);
        if workspaces > 0 {
            tracing::warn!(
                "Refusing to delete organization {}: {} workspaces remain",
                id,
                workspaces
            );
            return Err(IntegrityError::HasChildren {
                entity: "organization",
                id: id.to_string(),
                count: workspaces as usize,
            }
            .into());
        }

        ctx.ensure_active()?;
        entry.retire();
        self.organizations.write().remove(id);
        tracing::info!("Deleted organization {}", id);
        Ok(())
    }

    async fn create_workspace(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
        name: &str,
        limits: Option<QuotaLimits>,
    ) -> ContentResult<Workspace> {
        ctx.ensure_active()?;
        require_name(name, "workspace")?;
        let org = self.org_entry(organization_id)?;

        let _gate = org.gate.lock().await;
        org.ensure_live()?;

        let org_limits = self.org_limits(ctx, &org).await?;
        let current = org.usage.workspace_count.load(Ordering::Acquire);
        if let Err(e) = check_count("workspaces", current, org_limits.max_workspaces) {
            tracing::warn!(
                "Workspace quota exceeded for organization {} ({}/{})",
                organization_id,
                current,
                org_limits.max_workspaces
            );
            return Err(e.into());
        }

        ctx.ensure_active()?;
        let workspace = Workspace {
            id: WorkspaceId::generate(),
            organization_id: organization_id.clone(),
            name: name.to_string(),
            limits,
            created: Utc::now(),
        };
        let entry = Arc::new(WorkspaceEntry::new(
            self.next_seq(),
            workspace.clone(),
            org.clone(),
        ));
        self.workspaces.write().insert(workspace.id.clone(), entry);
        UsageCounters::add(&org.usage.workspace_count, 1);

        tracing::info!(
            "Created workspace {} ({}) in organization {}",
            workspace.id,
            workspace.name,
            organization_id
        );
        Ok(workspace)
    }

    async fn get_workspace(&self, ctx: &OperationContext, id: &WorkspaceId) -> ContentResult<Workspace> {
        ctx.ensure_active()?;
        let entry = self.workspace_entry(id)?;
        drop(entry.read().await?);
        Ok(entry.snapshot())
    }

    async fn set_workspace_quota_limits(
        &self,
        ctx: &OperationContext,
        id: &WorkspaceId,
        limits: Option<QuotaLimits>,
    ) -> ContentResult<Workspace> {
        ctx.ensure_active()?;
        let entry = self.workspace_entry(id)?;
        let _content = entry.write().await?;
        ctx.ensure_active()?;

        entry.set_limits(limits);
        tracing::info!("Updated quota limits for workspace {}", id);
        Ok(entry.snapshot())
    }

    async fn list_workspaces(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
    ) -> ContentResult<Vec<Workspace>> {
        ctx.ensure_active()?;
        self.org_entry(organization_id)?;

        let mut entries: Vec<Arc<WorkspaceEntry>> = self
            .workspaces
            .read()
            .values()
            .filter(|e| &e.workspace.organization_id == organization_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.seq);
        Ok(entries.iter().map(|e| e.snapshot()).collect())
    }

    async fn delete_workspace(&self, ctx: &OperationContext, id: &WorkspaceId) -> ContentResult<()> {
        ctx.ensure_active()?;
        let entry = self.workspace_entry(id)?;

        let _gate = entry.org.gate.lock().await;
        let mut content = entry.write().await?;

        let dependents = content.dependent_count();
        if dependents > 0 {
            tracing::warn!(
                "Refusing to delete workspace {}: {} pages, tables or assets remain",
                id,
                dependents
            );
            return Err(IntegrityError::HasChildren {
                entity: "workspace",
                id: id.to_string(),
                count: dependents,
            }
            .into());
        }

        ctx.ensure_active()?;
        content.retired = true;
        self.workspaces.write().remove(id);
        UsageCounters::sub(&entry.org.usage.workspace_count, 1);

        tracing::info!("Deleted workspace {}", id);
        Ok(())
    }
}
