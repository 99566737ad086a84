//! Tables and records for the in-memory backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;

use crate::context::OperationContext;
use crate::core::TableStorage;
use crate::error::{ContentResult, NotFoundError, QuotaError, ValidationError};
use crate::ids::{RecordId, TableId, WorkspaceId};
use crate::types::{
    DataRecord, NewTable, PropertyValue, Table, TableUpdate, check_count, validate_schema,
};

use super::MemoryBackend;
use super::state::{TableSlot, UsageCounters, WorkspaceContent};

fn require_table_id(id: &TableId) -> ContentResult<()> {
    if id.is_empty() {
        return Err(ValidationError::IdRequired { entity: "table" }.into());
    }
    Ok(())
}

fn require_record_id(id: &RecordId) -> ContentResult<()> {
    if id.is_empty() {
        return Err(ValidationError::IdRequired { entity: "record" }.into());
    }
    Ok(())
}

fn require_table_name(name: &str) -> ContentResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired { entity: "table" }.into());
    }
    Ok(())
}

impl WorkspaceContent {
    fn table(&self, id: &TableId) -> ContentResult<&TableSlot> {
        self.tables
            .get(id)
            .ok_or_else(|| NotFoundError::Table { id: id.clone() }.into())
    }

    fn table_mut(&mut self, id: &TableId) -> ContentResult<&mut TableSlot> {
        self.tables
            .get_mut(id)
            .ok_or_else(|| NotFoundError::Table { id: id.clone() }.into())
    }

    /// Looks up the table that holds records; a missing table is reported as
    /// a missing database.
    fn database(&self, id: &TableId) -> ContentResult<&TableSlot> {
        self.tables
            .get(id)
            .ok_or_else(|| NotFoundError::Database { id: id.clone() }.into())
    }

    fn database_mut(&mut self, id: &TableId) -> ContentResult<&mut TableSlot> {
        self.tables
            .get_mut(id)
            .ok_or_else(|| NotFoundError::Database { id: id.clone() }.into())
    }
}

fn record_not_found(table_id: &TableId, record_id: &RecordId) -> NotFoundError {
    NotFoundError::Record {
        table_id: table_id.clone(),
        id: record_id.clone(),
    }
}

#[async_trait]
impl TableStorage for MemoryBackend {
    async fn create_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        input: NewTable,
    ) -> ContentResult<Table> {
        ctx.ensure_active()?;
        require_table_name(&input.name)?;
        validate_schema(&input.properties)?;
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        let limits = self.workspace_limits(ctx, &entry).await?;
        let max = limits.max_tables_per_workspace;
        if max > 0 && content.tables.len() as u64 >= max {
            tracing::warn!(
                "Table quota exceeded in workspace {} ({}/{})",
                workspace_id,
                content.tables.len(),
                max
            );
            return Err(QuotaError::TableQuotaExceeded {
                workspace_id: workspace_id.clone(),
                limit: max,
            }
            .into());
        }

        ctx.ensure_active()?;
        let now = Utc::now();
        let table = Table {
            id: TableId::generate(),
            workspace_id: workspace_id.clone(),
            name: input.name,
            properties: input.properties,
            created: now,
            modified: now,
        };
        let seq = content.next_seq();
        content
            .tables
            .insert(table.id.clone(), TableSlot::new(seq, table.clone()));
        UsageCounters::add(&entry.org.usage.table_count, 1);

        tracing::debug!("Created table {} in workspace {}", table.id, workspace_id);
        Ok(table)
    }

    async fn get_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
    ) -> ContentResult<Table> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        Ok(content.table(table_id)?.table.clone())
    }

    async fn update_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        update: TableUpdate,
    ) -> ContentResult<Table> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        if let Some(name) = &update.name {
            require_table_name(name)?;
        }
        if let Some(properties) = &update.properties {
            validate_schema(properties)?;
        }
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        content.table(table_id)?;
        ctx.ensure_active()?;

        let slot = content.table_mut(table_id)?;
        if let Some(name) = update.name {
            slot.table.name = name;
        }
        if let Some(properties) = update.properties {
            slot.table.properties = properties;
        }
        slot.table.modified = Utc::now();

        tracing::debug!("Updated table {} in workspace {}", table_id, workspace_id);
        Ok(slot.table.clone())
    }

    async fn delete_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
    ) -> ContentResult<()> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        content.table(table_id)?;
        ctx.ensure_active()?;

        if let Some(slot) = content.tables.remove(table_id) {
            tracing::debug!(
                "Deleted table {} with {} records from workspace {}",
                table_id,
                slot.record_count(),
                workspace_id
            );
        }
        UsageCounters::sub(&entry.org.usage.table_count, 1);
        Ok(())
    }

    async fn list_tables(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
    ) -> ContentResult<Vec<Table>> {
        ctx.ensure_active()?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        let mut slots: Vec<&TableSlot> = content.tables.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        Ok(slots.into_iter().map(|slot| slot.table.clone()).collect())
    }

    async fn create_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        data: BTreeMap<String, PropertyValue>,
    ) -> ContentResult<DataRecord> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        let count = content.database(table_id)?.record_count() as u64;
        let limits = self.workspace_limits(ctx, &entry).await?;
        if let Err(e) = check_count("records", count, limits.max_records_per_table) {
            tracing::warn!("Record quota exceeded in table {}: {}", table_id, e);
            return Err(e.into());
        }

        ctx.ensure_active()?;
        let record = DataRecord::with_data(table_id.clone(), data);
        content.database_mut(table_id)?.insert_record(record.clone());

        tracing::debug!("Created record {} in table {}", record.id, table_id);
        Ok(record)
    }

    async fn get_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        record_id: &RecordId,
    ) -> ContentResult<DataRecord> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        require_record_id(record_id)?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        content
            .database(table_id)?
            .record(record_id)
            .cloned()
            .ok_or_else(|| record_not_found(table_id, record_id).into())
    }

    async fn update_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        record_id: &RecordId,
        data: BTreeMap<String, PropertyValue>,
    ) -> ContentResult<DataRecord> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        require_record_id(record_id)?;
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        if content.database(table_id)?.record(record_id).is_none() {
            return Err(record_not_found(table_id, record_id).into());
        }
        ctx.ensure_active()?;

        let record = content
            .database_mut(table_id)?
            .record_mut(record_id)
            .ok_or_else(|| record_not_found(table_id, record_id))?;
        record.data = data;
        record.modified = Utc::now();

        tracing::debug!("Updated record {} in table {}", record_id, table_id);
        Ok(record.clone())
    }

    async fn delete_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        record_id: &RecordId,
    ) -> ContentResult<()> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        require_record_id(record_id)?;
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        if content.database(table_id)?.record(record_id).is_none() {
            return Err(record_not_found(table_id, record_id).into());
        }
        ctx.ensure_active()?;

        content.database_mut(table_id)?.remove_record(record_id);
        tracing::debug!("Deleted record {} from table {}", record_id, table_id);
        Ok(())
    }

    async fn list_records(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        offset: usize,
        limit: usize,
    ) -> ContentResult<Vec<DataRecord>> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        let records = content.database(table_id)?.records().skip(offset);
        Ok(if limit == 0 {
            records.cloned().collect()
        } else {
            records.take(limit).cloned().collect()
        })
    }

    async fn count_records(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
    ) -> ContentResult<usize> {
        ctx.ensure_active()?;
        require_table_id(table_id)?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        Ok(content.database(table_id)?.record_count())
    }
}
