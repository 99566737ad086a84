//! Organization and workspace directory.

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::error::ContentResult;
use crate::ids::{OrganizationId, WorkspaceId};
use crate::types::{Organization, QuotaLimits, Workspace};

/// Manages organizations and their workspaces.
///
/// These are the anchors of referential integrity: every page, table and
/// asset lives in a workspace, and every workspace belongs to an
/// organization. Deletion is denied while dependents exist.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Creates an organization.
    ///
    /// `limits` of `None` applies the store's default limits.
    async fn create_organization(
        &self,
        ctx: &OperationContext,
        name: &str,
        limits: Option<QuotaLimits>,
    ) -> ContentResult<Organization>;

    /// Returns an organization.
    async fn get_organization(
        &self,
        ctx: &OperationContext,
        id: &OrganizationId,
    ) -> ContentResult<Organization>;

    /// Replaces an organization's quota limits.
    ///
    /// Lowering a limit below current usage is allowed; it only blocks
    /// further growth.
    async fn set_quota_limits(
        &self,
        ctx: &OperationContext,
        id: &OrganizationId,
        limits: QuotaLimits,
    ) -> ContentResult<Organization>;

    /// Lists all organizations in creation order.
    async fn list_organizations(&self, ctx: &OperationContext) -> ContentResult<Vec<Organization>>;

    /// Deletes an organization.
    ///
    /// # Errors
    ///
    /// * `IntegrityError::HasChildren` - if the organization has workspaces
    async fn delete_organization(
        &self,
        ctx: &OperationContext,
        id: &OrganizationId,
    ) -> ContentResult<()>;

    /// Creates a workspace in an organization.
    ///
    /// `limits` narrows the organization's limits inside this workspace;
    /// `None` applies them unchanged.
    ///
    /// # Errors
    ///
    /// * `QuotaError::Exceeded` - if the organization already has its
    ///   maximum number of workspaces
    async fn create_workspace(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
        name: &str,
        limits: Option<QuotaLimits>,
    ) -> ContentResult<Workspace>;

    /// Returns a workspace.
    async fn get_workspace(&self, ctx: &OperationContext, id: &WorkspaceId)
    -> ContentResult<Workspace>;

    /// Replaces a workspace's own limits. `None` removes the override.
    ///
    /// Like organization limits, lowering a limit below current usage only
    /// blocks further growth.
    async fn set_workspace_quota_limits(
        &self,
        ctx: &OperationContext,
        id: &WorkspaceId,
        limits: Option<QuotaLimits>,
    ) -> ContentResult<Workspace>;

    /// Lists an organization's workspaces in creation order.
    async fn list_workspaces(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
    ) -> ContentResult<Vec<Workspace>>;

    /// Deletes a workspace.
    ///
    /// # Errors
    ///
    /// * `IntegrityError::HasChildren` - if the workspace still holds pages,
    ///   tables or assets
    async fn delete_workspace(&self, ctx: &OperationContext, id: &WorkspaceId) -> ContentResult<()>;
}
