//! Internal state of the in-memory backend.
//!
//! Organizations and workspaces live in directory maps guarded by
//! `parking_lot` locks that are never held across an `.await`. Each
//! workspace's content sits behind its own `tokio` lock, and each
//! organization has a quota gate that serializes storage and workspace
//! accounting. Lock order is always organization gate, then workspace.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::{Mutex, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ContentResult, NotFoundError};
use crate::ids::{AssetId, OrganizationId, PageId, RecordId, TableId, WorkspaceId};
use crate::types::{
    Asset, DataRecord, Organization, Page, QuotaLimits, QuotaUsage, Table, Workspace,
};

/// Directory entry for an organization.
pub(crate) struct OrgEntry {
    pub(crate) seq: u64,
    pub(crate) org: RwLock<Organization>,
    pub(crate) gate: Mutex<()>,
    pub(crate) usage: UsageCounters,
    retired: AtomicBool,
}

impl OrgEntry {
    pub(crate) fn new(seq: u64, org: Organization) -> Self {
        Self {
            seq,
            org: RwLock::new(org),
            gate: Mutex::new(()),
            usage: UsageCounters::default(),
            retired: AtomicBool::new(false),
        }
    }

    pub(crate) fn id(&self) -> OrganizationId {
        self.org.read().id.clone()
    }

    pub(crate) fn limits(&self) -> QuotaLimits {
        self.org.read().limits
    }

    /// Must be called with the quota gate held.
    pub(crate) fn retire(&self) {
        self.retired.store(true, Ordering::Release);
    }

    pub(crate) fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }

    /// Fails with `NotFoundError::Organization` once retired.
    pub(crate) fn ensure_live(&self) -> ContentResult<()> {
        if self.is_retired() {
            return Err(NotFoundError::Organization { id: self.id() }.into());
        }
        Ok(())
    }
}

/// Committed usage of one organization.
///
/// Each counter is only written under the lock that guards the matching
/// mutation: storage and workspaces under the quota gate, pages and tables
/// under the owning workspace's write lock.
#[derive(Default)]
pub(crate) struct UsageCounters {
    pub(crate) storage_bytes: AtomicU64,
    pub(crate) workspace_count: AtomicU64,
    pub(crate) table_count: AtomicU64,
    pub(crate) page_count: AtomicU64,
}

impl UsageCounters {
    pub(crate) fn snapshot(&self) -> QuotaUsage {
        QuotaUsage {
            storage_bytes: self.storage_bytes.load(Ordering::Acquire),
            workspace_count: self.workspace_count.load(Ordering::Acquire),
            table_count: self.table_count.load(Ordering::Acquire),
            page_count: self.page_count.load(Ordering::Acquire),
        }
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::AcqRel);
    }

    pub(crate) fn sub(counter: &AtomicU64, n: u64) {
        // Saturating: a counter never wraps below zero.
        let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
            Some(v.saturating_sub(n))
        });
    }
}

/// Directory entry for a workspace.
pub(crate) struct WorkspaceEntry {
    pub(crate) seq: u64,
    pub(crate) workspace: Workspace,
    pub(crate) org: Arc<OrgEntry>,
    limits: RwLock<Option<QuotaLimits>>,
    content: tokio::sync::RwLock<WorkspaceContent>,
}

impl WorkspaceEntry {
    pub(crate) fn new(seq: u64, workspace: Workspace, org: Arc<OrgEntry>) -> Self {
        let limits = workspace.limits;
        Self {
            seq,
            workspace,
            org,
            limits: RwLock::new(limits),
            content: tokio::sync::RwLock::new(WorkspaceContent::default()),
        }
    }

    /// Workspace-level limits currently in force.
    pub(crate) fn limits(&self) -> Option<QuotaLimits> {
        *self.limits.read()
    }

    /// Must be called with the workspace write lock held.
    pub(crate) fn set_limits(&self, limits: Option<QuotaLimits>) {
        *self.limits.write() = limits;
    }

    /// The workspace as callers see it, with its current limits.
    pub(crate) fn snapshot(&self) -> Workspace {
        Workspace {
            limits: self.limits(),
            ..self.workspace.clone()
        }
    }

    /// Acquires the content for reading. Fails if the workspace was deleted.
    pub(crate) async fn read(&self) -> ContentResult<RwLockReadGuard<'_, WorkspaceContent>> {
        let guard = self.content.read().await;
        if guard.retired {
            return Err(self.not_found());
        }
        Ok(guard)
    }

    /// Acquires the content for writing. Fails if the workspace was deleted.
    pub(crate) async fn write(&self) -> ContentResult<RwLockWriteGuard<'_, WorkspaceContent>> {
        let guard = self.content.write().await;
        if guard.retired {
            return Err(self.not_found());
        }
        Ok(guard)
    }

    fn not_found(&self) -> crate::error::ContentError {
        NotFoundError::Workspace {
            id: self.workspace.id.clone(),
        }
        .into()
    }
}

/// Everything stored inside one workspace.
#[derive(Default)]
pub(crate) struct WorkspaceContent {
    pub(crate) retired: bool,
    next_seq: u64,
    pub(crate) pages: HashMap<PageId, PageSlot>,
    pub(crate) tables: HashMap<TableId, TableSlot>,
    pub(crate) assets: HashMap<AssetId, AssetSlot>,
}

impl WorkspaceContent {
    /// Allocates the next ordering key within this workspace.
    pub(crate) fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Number of entities that block deleting the workspace.
    pub(crate) fn dependent_count(&self) -> usize {
        self.pages.len() + self.tables.len() + self.assets.len()
    }
}

pub(crate) struct PageSlot {
    pub(crate) seq: u64,
    pub(crate) page: Page,
}

pub(crate) struct AssetSlot {
    pub(crate) seq: u64,
    pub(crate) asset: Asset,
}

/// A table, its records in insertion order, and an ID index.
pub(crate) struct TableSlot {
    pub(crate) seq: u64,
    pub(crate) table: Table,
    records: BTreeMap<u64, DataRecord>,
    index: HashMap<RecordId, u64>,
    next_record_seq: u64,
}

impl TableSlot {
    pub(crate) fn new(seq: u64, table: Table) -> Self {
        Self {
            seq,
            table,
            records: BTreeMap::new(),
            index: HashMap::new(),
            next_record_seq: 0,
        }
    }

    pub(crate) fn record_count(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn record(&self, id: &RecordId) -> Option<&DataRecord> {
        self.index.get(id).and_then(|seq| self.records.get(seq))
    }

    pub(crate) fn record_mut(&mut self, id: &RecordId) -> Option<&mut DataRecord> {
        match self.index.get(id) {
            Some(seq) => self.records.get_mut(seq),
            None => None,
        }
    }

    pub(crate) fn insert_record(&mut self, record: DataRecord) {
        self.next_record_seq += 1;
        self.index.insert(record.id.clone(), self.next_record_seq);
        self.records.insert(self.next_record_seq, record);
    }

    pub(crate) fn remove_record(&mut self, id: &RecordId) -> Option<DataRecord> {
        let seq = self.index.remove(id)?;
        self.records.remove(&seq)
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = &DataRecord> {
        self.records.values()
    }
}
