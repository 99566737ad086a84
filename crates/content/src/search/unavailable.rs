//! Search service used when no index is configured.

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::core::SearchService;
use crate::error::{ContentResult, SearchError};
use crate::ids::OrganizationId;
use crate::types::{SearchOptions, SearchResult};

/// A search service that always fails with `SearchError::NotImplemented`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSearch;

#[async_trait]
impl SearchService for UnavailableSearch {
    async fn search(
        &self,
        _ctx: &OperationContext,
        organization_id: &OrganizationId,
        _options: SearchOptions,
    ) -> ContentResult<Vec<SearchResult>> {
        tracing::debug!("Search requested for {} but no index is configured", organization_id);
        Err(SearchError::NotImplemented.into())
    }
}
