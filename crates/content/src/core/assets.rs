//! Asset storage trait.

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::error::ContentResult;
use crate::ids::{AssetId, WorkspaceId};
use crate::types::{Asset, NewAsset};

/// Stores binary asset metadata and accounts its bytes against the owning
/// organization's storage quota.
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Creates an asset.
    ///
    /// The organization is resolved through the workspace. The storage check
    /// and the usage increment happen under the organization's quota gate.
    ///
    /// # Errors
    ///
    /// * `ValidationError::NameRequired` - if the name is empty
    /// * `QuotaError::AssetTooLarge` - if the asset exceeds the single-asset limit
    /// * `QuotaError::ServerStorageQuotaExceeded` - if usage plus the asset
    ///   size would exceed the organization's storage limit
    async fn create_asset(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        input: NewAsset,
    ) -> ContentResult<Asset>;

    /// Returns an asset.
    async fn get_asset(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        asset_id: &AssetId,
    ) -> ContentResult<Asset>;

    /// Deletes an asset and releases its bytes.
    async fn delete_asset(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        asset_id: &AssetId,
    ) -> ContentResult<()>;

    /// Lists the assets of a workspace in creation order.
    async fn list_assets(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
    ) -> ContentResult<Vec<Asset>>;
}
