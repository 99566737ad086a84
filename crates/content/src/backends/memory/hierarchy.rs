//! Page hierarchy for the in-memory backend.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;

use crate::context::OperationContext;
use crate::core::PageHierarchy;
use crate::error::{ContentResult, IntegrityError, NotFoundError, ValidationError};
use crate::ids::{PageId, TableId, WorkspaceId};
use crate::types::{NewPage, Node, Page, PageUpdate, check_count};

use super::MemoryBackend;
use super::state::{PageSlot, UsageCounters, WorkspaceContent};

fn require_page_id(id: &PageId) -> ContentResult<()> {
    if id.is_empty() {
        return Err(ValidationError::IdRequired { entity: "page" }.into());
    }
    Ok(())
}

fn require_title(title: &str) -> ContentResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::NameRequired { entity: "page" }.into());
    }
    Ok(())
}

impl WorkspaceContent {
    pub(crate) fn page(&self, id: &PageId) -> ContentResult<&PageSlot> {
        self.pages
            .get(id)
            .ok_or_else(|| NotFoundError::Page { id: id.clone() }.into())
    }

    /// Upper bound on any parent-chain walk. A longer chain must loop.
    fn walk_bound(&self) -> usize {
        self.pages.len() + 1
    }

    /// Depth of a page, counting the page itself; a root has depth 1.
    ///
    /// A parent missing from the workspace ends the chain.
    pub(crate) fn depth_of(&self, id: &PageId) -> usize {
        let bound = self.walk_bound();
        let mut depth = 0;
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(slot) = self.pages.get(id) else {
                break;
            };
            if depth >= bound {
                break;
            }
            depth += 1;
            current = slot.page.parent_id.as_ref();
        }
        depth
    }

    /// Rejects placing `page_id` under `new_parent_id` if that would close a
    /// cycle.
    ///
    /// Walks from the new parent towards the root. Reaching `page_id`,
    /// revisiting a page, or walking further than there are pages all count
    /// as a cycle, so a corrupted chain cannot stall the walk.
    pub(crate) fn check_acyclic_move(
        &self,
        page_id: &PageId,
        new_parent_id: &PageId,
    ) -> ContentResult<()> {
        let cycle = || IntegrityError::CycleDetected {
            page_id: page_id.clone(),
            new_parent_id: new_parent_id.clone(),
        };

        let bound = self.walk_bound();
        let mut visited: HashSet<&PageId> = HashSet::new();
        let mut current = Some(new_parent_id);
        while let Some(id) = current {
            if id == page_id || !visited.insert(id) || visited.len() > bound {
                return Err(cycle().into());
            }
            current = self
                .pages
                .get(id)
                .and_then(|slot| slot.page.parent_id.as_ref());
        }
        Ok(())
    }

    /// Number of levels in the subtree rooted at `id`; a leaf has height 1.
    pub(crate) fn subtree_height(&self, id: &PageId) -> usize {
        let mut children: HashMap<&PageId, Vec<&PageId>> = HashMap::new();
        for slot in self.pages.values() {
            if let Some(parent) = &slot.page.parent_id {
                children.entry(parent).or_default().push(&slot.page.id);
            }
        }

        let mut height = 0;
        let mut visited: HashSet<&PageId> = HashSet::new();
        let mut stack = vec![(id, 1usize)];
        while let Some((node, level)) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            height = height.max(level);
            if let Some(kids) = children.get(node) {
                stack.extend(kids.iter().map(|kid| (*kid, level + 1)));
            }
        }
        height
    }

    /// Pages whose parent is `parent_id`, in sibling order.
    pub(crate) fn children_of(&self, parent_id: Option<&PageId>) -> Vec<&PageSlot> {
        let mut slots: Vec<&PageSlot> = self
            .pages
            .values()
            .filter(|slot| slot.page.parent_id.as_ref() == parent_id)
            .collect();
        slots.sort_by_key(|slot| slot.seq);
        slots
    }

    /// Ancestors of a page, nearest first.
    pub(crate) fn ancestors_of(&self, id: &PageId) -> Vec<&Page> {
        let bound = self.walk_bound();
        let mut out = Vec::new();
        let mut visited: HashSet<&PageId> = HashSet::new();
        visited.insert(id);
        let mut current = self.pages.get(id).and_then(|s| s.page.parent_id.as_ref());
        while let Some(parent) = current {
            if !visited.insert(parent) || out.len() >= bound {
                break;
            }
            let Some(slot) = self.pages.get(parent) else {
                break;
            };
            out.push(&slot.page);
            current = slot.page.parent_id.as_ref();
        }
        out
    }
}

fn check_depth(depth: usize, max: usize) -> ContentResult<()> {
    if max > 0 && depth > max {
        return Err(IntegrityError::DepthExceeded { depth, max }.into());
    }
    Ok(())
}

#[async_trait]
impl PageHierarchy for MemoryBackend {
    async fn create_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        input: NewPage,
    ) -> ContentResult<Page> {
        ctx.ensure_active()?;
        require_title(&input.title)?;
        if let Some(parent) = &input.parent_id {
            require_page_id(parent)?;
        }
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        let depth = match &input.parent_id {
            Some(parent) => {
                content.page(parent)?;
                content.depth_of(parent) + 1
            }
            None => 1,
        };

        let limits = self.workspace_limits(ctx, &entry).await?;
        if let Err(e) = check_count(
            "pages",
            content.pages.len() as u64,
            limits.max_pages_per_workspace,
        ) {
            tracing::warn!("Page quota exceeded in workspace {}: {}", workspace_id, e);
            return Err(e.into());
        }
        if let Err(e) = check_depth(depth, self.config().max_hierarchy_depth) {
            tracing::warn!("Rejected page in workspace {}: {}", workspace_id, e);
            return Err(e);
        }

        ctx.ensure_active()?;
        let now = Utc::now();
        let page = Page {
            id: PageId::generate(),
            workspace_id: workspace_id.clone(),
            parent_id: input.parent_id,
            title: input.title,
            content: input.content,
            tags: input.tags,
            created: now,
            modified: now,
        };
        let seq = content.next_seq();
        content.pages.insert(
            page.id.clone(),
            PageSlot {
                seq,
                page: page.clone(),
            },
        );
        UsageCounters::add(&entry.org.usage.page_count, 1);

        tracing::debug!("Created page {} in workspace {}", page.id, workspace_id);
        Ok(page)
    }

    async fn get_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
    ) -> ContentResult<Page> {
        ctx.ensure_active()?;
        require_page_id(page_id)?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        Ok(content.page(page_id)?.page.clone())
    }

    async fn update_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
        update: PageUpdate,
    ) -> ContentResult<Page> {
        ctx.ensure_active()?;
        require_page_id(page_id)?;
        if let Some(title) = &update.title {
            require_title(title)?;
        }
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        content.page(page_id)?;
        ctx.ensure_active()?;

        let slot = content
            .pages
            .get_mut(page_id)
            .ok_or_else(|| NotFoundError::Page { id: page_id.clone() })?;
        if let Some(title) = update.title {
            slot.page.title = title;
        }
        if let Some(body) = update.content {
            slot.page.content = body;
        }
        if let Some(tags) = update.tags {
            slot.page.tags = tags;
        }
        slot.page.modified = Utc::now();

        tracing::debug!("Updated page {} in workspace {}", page_id, workspace_id);
        Ok(slot.page.clone())
    }

    async fn move_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
        new_parent_id: Option<&PageId>,
    ) -> ContentResult<Page> {
        ctx.ensure_active()?;
        require_page_id(page_id)?;
        if let Some(parent) = new_parent_id {
            require_page_id(parent)?;
        }
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        content.page(page_id)?;

        let parent_depth = match new_parent_id {
            Some(parent) => {
                content.page(parent)?;
                if let Err(e) = content.check_acyclic_move(page_id, parent) {
                    tracing::warn!(
                        "Rejected move of page {} under {} in workspace {}: {}",
                        page_id,
                        parent,
                        workspace_id,
                        e
                    );
                    return Err(e);
                }
                content.depth_of(parent)
            }
            None => 0,
        };

        let deepest = parent_depth + content.subtree_height(page_id);
        if let Err(e) = check_depth(deepest, self.config().max_hierarchy_depth) {
            tracing::warn!("Rejected move of page {}: {}", page_id, e);
            return Err(e);
        }

        ctx.ensure_active()?;
        let seq = content.next_seq();
        let slot = content
            .pages
            .get_mut(page_id)
            .ok_or_else(|| NotFoundError::Page { id: page_id.clone() })?;
        slot.seq = seq;
        slot.page.parent_id = new_parent_id.cloned();
        slot.page.modified = Utc::now();

        tracing::debug!(
            "Moved page {} under {:?} in workspace {}",
            page_id,
            new_parent_id,
            workspace_id
        );
        Ok(slot.page.clone())
    }

    async fn delete_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
    ) -> ContentResult<()> {
        ctx.ensure_active()?;
        require_page_id(page_id)?;
        let entry = self.workspace_entry(workspace_id)?;

        let mut content = entry.write().await?;
        content.page(page_id)?;
        let children = content.children_of(Some(page_id)).len();
        if children > 0 {
            tracing::warn!(
                "Refusing to delete page {}: it has {} children",
                page_id,
                children
            );
            return Err(IntegrityError::HasChildren {
                entity: "page",
                id: page_id.to_string(),
                count: children,
            }
            .into());
        }

        ctx.ensure_active()?;
        content.pages.remove(page_id);
        UsageCounters::sub(&entry.org.usage.page_count, 1);

        tracing::debug!("Deleted page {} from workspace {}", page_id, workspace_id);
        Ok(())
    }

    async fn list_children(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        parent_id: Option<&PageId>,
    ) -> ContentResult<Vec<Page>> {
        ctx.ensure_active()?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        if let Some(parent) = parent_id {
            require_page_id(parent)?;
            content.page(parent)?;
        }
        Ok(content
            .children_of(parent_id)
            .into_iter()
            .map(|slot| slot.page.clone())
            .collect())
    }

    async fn list_pages(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
    ) -> ContentResult<Vec<Page>> {
        ctx.ensure_active()?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        let mut slots: Vec<&PageSlot> = content.pages.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        Ok(slots.into_iter().map(|slot| slot.page.clone()).collect())
    }

    async fn ancestors(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
    ) -> ContentResult<Vec<Page>> {
        ctx.ensure_active()?;
        require_page_id(page_id)?;
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;
        content.page(page_id)?;
        Ok(content
            .ancestors_of(page_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn get_node(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        id: &str,
    ) -> ContentResult<Node> {
        ctx.ensure_active()?;
        if id.is_empty() {
            return Err(ValidationError::IdRequired { entity: "node" }.into());
        }
        let entry = self.workspace_entry(workspace_id)?;
        let content = entry.read().await?;

        if let Some(slot) = content.pages.get(&PageId::new(id)) {
            return Ok(Node::Page(slot.page.clone()));
        }
        if let Some(slot) = content.tables.get(&TableId::new(id)) {
            return Ok(Node::Table(slot.table.clone()));
        }
        Err(NotFoundError::Node { id: id.to_string() }.into())
    }
}
