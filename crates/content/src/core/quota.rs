//! Quota lookup capability.

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::error::ContentResult;
use crate::ids::OrganizationId;
use crate::types::Quota;

/// Answers the quota limits and committed usage of an organization.
///
/// This is a read-only capability. The result reflects last-committed state,
/// so callers must not assume it includes their own pending writes.
#[async_trait]
pub trait QuotaGetter: Send + Sync {
    /// Returns the quota of an organization.
    ///
    /// # Errors
    ///
    /// * `ValidationError::OrganizationIdRequired` - if the ID is empty
    /// * `NotFoundError::Organization` - if the organization does not exist
    async fn get_quota(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
    ) -> ContentResult<Quota>;
}
