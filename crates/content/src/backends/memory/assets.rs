//! Assets for the in-memory backend.

use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::Utc;

use crate::context::OperationContext;
use crate::core::AssetStorage;
use crate::error::{ContentResult, NotFoundError, QuotaError, ValidationError};
use crate::ids::{AssetId, WorkspaceId};
use crate::types::{Asset, NewAsset, check_amount};

use super::MemoryBackend;
use super::state::{AssetSlot, UsageCounters};

fn require_asset_id(id: &AssetId) -> ContentResult<()> {
    if id.is_empty() {
        return Err(ValidationError::IdRequired { entity: "asset" }.into());
    }
    Ok(())
}

fn asset_not_found(id: &AssetId) -> NotFoundError {
    NotFoundError::Asset { id: id.clone() }
}

#[async_trait]
impl AssetStorage for MemoryBackend {
    async fn create_asset(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        input: NewAsset,
    ) -> ContentResult<Asset> {
        ctx.ensure_active()?;
        if input.name.trim().is_empty() {
            return Err(ValidationError::NameRequired { entity: "asset" }.into());
        }
        let entry = self.workspace_entry(workspace_id)?;
        let org = &entry.org;

        let _gate = org.gate.lock().await;
        let mut content = entry.write().await?;

        let limits = self.workspace_limits(ctx, &entry).await?;
        let size = input.size_bytes;
        if limits.max_asset_size_bytes > 0 && size > limits.max_asset_size_bytes {
            tracing::warn!(
                "Asset {} too large for workspace {}: {} > {} bytes",
                input.name,
                workspace_id,
                size,
                limits.max_asset_size_bytes
            );
            return Err(QuotaError::AssetTooLarge {
                size,
                limit: limits.max_asset_size_bytes,
            }
            .into());
        }

        let used = org.usage.storage_bytes.load(Ordering::Acquire);
        if !check_amount(used, size, limits.max_storage_bytes) {
            let organization_id = org.id();
            tracing::warn!(
                "Storage quota exceeded for organization {}: {} + {} > {} bytes",
                organization_id,
                used,
                size,
                limits.max_storage_bytes
            );
            return Err(QuotaError::ServerStorageQuotaExceeded {
                organization_id,
                used,
                requested: size,
                limit: limits.max_storage_bytes,
            }
            .into());
        }

        ctx.ensure_active()?;
        let asset = Asset {
            id: AssetId::generate(),
            workspace_id: workspace_id.clone(),
            mime_type: input.effective_mime_type().to_string(),
            name: input.name,
            size_bytes: size,
            created: Utc::now(),
        };
        let seq = content.next_seq();
        content.assets.insert(
            asset.id.clone(),
            AssetSlot {
                seq,
                asset: asset.clone(),
            },
        );
        UsageCounters::add(&org.usage.storage_bytes, size);

        tracing::debug!(
            "Created asset {} ({} bytes) in workspace {}",
            asset.id,
            size,
            workspace_id
        );
        Ok(asset)
    }

    async fn get_asset(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        asset_id: &AssetId,
    ) -> ContentResult<Asset> {
        ctx.ensure_active()?;
        require_asset_id(asset_id)?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        content
            .assets
            .get(asset_id)
            .map(|slot| slot.asset.clone())
            .ok_or_else(|| asset_not_found(asset_id).into())
    }

    async fn delete_asset(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        asset_id: &AssetId,
    ) -> ContentResult<()> {
        ctx.ensure_active()?;
        require_asset_id(asset_id)?;
        let entry = self.workspace_entry(workspace_id)?;

        let _gate = entry.org.gate.lock().await;
        let mut content = entry.write().await?;
        if !content.assets.contains_key(asset_id) {
            return Err(asset_not_found(asset_id).into());
        }
        ctx.ensure_active()?;

        let slot = content
            .assets
            .remove(asset_id)
            .ok_or_else(|| asset_not_found(asset_id))?;
        UsageCounters::sub(&entry.org.usage.storage_bytes, slot.asset.size_bytes);

        tracing::debug!(
            "Deleted asset {} from workspace {}, released {} bytes",
            asset_id,
            workspace_id,
            slot.asset.size_bytes
        );
        Ok(())
    }

    async fn list_assets(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
    ) -> ContentResult<Vec<Asset>> {
        ctx.ensure_active()?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        let mut slots: Vec<&AssetSlot> = content.assets.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        Ok(slots.into_iter().map(|slot| slot.asset.clone()).collect())
    }
}
