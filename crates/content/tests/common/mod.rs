//! Shared fixtures for content store integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use mddb_content::backends::memory::{MemoryBackend, MemoryBackendConfig};
use mddb_content::core::{PageHierarchy, TenantDirectory};
use mddb_content::ids::{PageId, WorkspaceId};
use mddb_content::types::{NewPage, Organization, QuotaLimits, Workspace};
use mddb_content::OperationContext;

/// A store with one organization and one workspace.
pub struct Fixture {
    pub store: Arc<MemoryBackend>,
    pub ctx: OperationContext,
    pub org: Organization,
    pub workspace: Workspace,
}

impl Fixture {
    /// The fixture workspace ID.
    pub fn ws(&self) -> &WorkspaceId {
        &self.workspace.id
    }

    /// Creates a page under `parent` and returns its ID.
    pub async fn page(&self, title: &str, parent: Option<&PageId>) -> PageId {
        let mut input = NewPage::new(title);
        input.parent_id = parent.cloned();
        self.store
            .create_page(&self.ctx, self.ws(), input)
            .await
            .expect("create page")
            .id
    }
}

/// Creates a fixture whose organization has the given limits.
pub async fn fixture_with_limits(limits: QuotaLimits) -> Fixture {
    fixture_with_config(MemoryBackendConfig::default(), limits).await
}

/// Creates a fixture with a custom backend configuration.
pub async fn fixture_with_config(config: MemoryBackendConfig, limits: QuotaLimits) -> Fixture {
    let store = Arc::new(MemoryBackend::with_config(config));
    let ctx = OperationContext::new().with_correlation_id("test");
    let org = store
        .create_organization(&ctx, "Test Org", Some(limits))
        .await
        .expect("create organization");
    let workspace = store
        .create_workspace(&ctx, &org.id, "Test Workspace", None)
        .await
        .expect("create workspace");
    Fixture {
        store,
        ctx,
        org,
        workspace,
    }
}

/// Creates a fixture with unlimited quotas.
pub async fn fixture() -> Fixture {
    fixture_with_limits(QuotaLimits::unlimited()).await
}
