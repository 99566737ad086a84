//! Search service trait.

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::error::ContentResult;
use crate::ids::OrganizationId;
use crate::types::{SearchOptions, SearchResult};

/// Full-text search across every workspace of an organization.
///
/// Search is a collaborator of the store and is never on the mutation path.
/// Implementations that have no index fail with `SearchError::NotImplemented`
/// so callers can degrade gracefully.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Runs a search. Results are sorted by descending score.
    async fn search(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
        options: SearchOptions,
    ) -> ContentResult<Vec<SearchResult>>;
}
