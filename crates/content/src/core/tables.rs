//! Table and record storage trait.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::error::ContentResult;
use crate::ids::{RecordId, TableId, WorkspaceId};
use crate::types::{DataRecord, NewTable, PropertyValue, Table, TableUpdate};

/// Stores tables and the records they contain.
///
/// Record data is not checked against the table schema at write time; reads
/// go through the defaulting accessors on [`DataRecord`] or
/// [`Table::typed_value`].
#[async_trait]
pub trait TableStorage: Send + Sync {
    /// Creates a table.
    ///
    /// The table count is read fresh under the workspace lock, so concurrent
    /// creates cannot jointly exceed the limit.
    ///
    /// # Errors
    ///
    /// * `ValidationError::NameRequired` - if the name is empty
    /// * `ValidationError::InvalidSchema` - for empty or duplicate property names
    /// * `QuotaError::TableQuotaExceeded` - if the workspace is at its table limit
    async fn create_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        input: NewTable,
    ) -> ContentResult<Table>;

    /// Returns a table.
    async fn get_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
    ) -> ContentResult<Table>;

    /// Renames a table or replaces its schema.
    async fn update_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        update: TableUpdate,
    ) -> ContentResult<Table>;

    /// Deletes a table together with its records.
    async fn delete_table(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
    ) -> ContentResult<()>;

    /// Lists the tables of a workspace in creation order.
    async fn list_tables(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
    ) -> ContentResult<Vec<Table>>;

    /// Adds a record to a table.
    ///
    /// # Errors
    ///
    /// * `NotFoundError::Database` - if the table does not exist
    /// * `QuotaError::Exceeded` - if the table is at its record limit
    async fn create_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        data: BTreeMap<String, PropertyValue>,
    ) -> ContentResult<DataRecord>;

    /// Returns a record.
    async fn get_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        record_id: &RecordId,
    ) -> ContentResult<DataRecord>;

    /// Replaces a record's data, keeping its creation time.
    async fn update_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        record_id: &RecordId,
        data: BTreeMap<String, PropertyValue>,
    ) -> ContentResult<DataRecord>;

    /// Deletes a record.
    async fn delete_record(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        record_id: &RecordId,
    ) -> ContentResult<()>;

    /// Lists records in insertion order. A `limit` of `0` returns everything
    /// after `offset`.
    async fn list_records(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
        offset: usize,
        limit: usize,
    ) -> ContentResult<Vec<DataRecord>>;

    /// Returns the number of records in a table.
    async fn count_records(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        table_id: &TableId,
    ) -> ContentResult<usize>;
}
