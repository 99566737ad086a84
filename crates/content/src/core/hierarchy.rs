//! Page hierarchy trait.

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::error::ContentResult;
use crate::ids::{PageId, WorkspaceId};
use crate::types::{NewPage, Node, Page, PageUpdate};

/// Maintains the page forest of each workspace.
///
/// The parent graph is acyclic at all times. Every mutation validates the
/// workspace ID and page IDs first, then checks integrity and quota, and only
/// then commits.
///
/// # Example
///
/// ```ignore
/// use mddb_content::core::PageHierarchy;
/// use mddb_content::types::NewPage;
///
/// async fn build<S: PageHierarchy>(store: &S, ctx: &OperationContext, ws: &WorkspaceId)
///     -> ContentResult<()>
/// {
///     let root = store.create_page(ctx, ws, NewPage::new("Root")).await?;
///     let child = store
///         .create_page(ctx, ws, NewPage::new("Child").with_parent(root.id.clone()))
///         .await?;
///
///     // Moving the root under its own child is rejected.
///     assert!(store.move_page(ctx, ws, &root.id, Some(&child.id)).await.is_err());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait PageHierarchy: Send + Sync {
    /// Creates a page, optionally under a parent in the same workspace.
    ///
    /// # Errors
    ///
    /// * `ValidationError::NameRequired` - if the title is empty
    /// * `NotFoundError::Page` - if the parent does not exist
    /// * `QuotaError::Exceeded` - if the workspace is at its page limit
    /// * `IntegrityError::DepthExceeded` - if the page would be too deep
    async fn create_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        input: NewPage,
    ) -> ContentResult<Page>;

    /// Returns a page.
    async fn get_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
    ) -> ContentResult<Page>;

    /// Updates a page's title, content or tags.
    async fn update_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
        update: PageUpdate,
    ) -> ContentResult<Page>;

    /// Reparents a page. `None` makes it a root.
    ///
    /// The moved page is appended after its new siblings.
    ///
    /// # Errors
    ///
    /// * `IntegrityError::CycleDetected` - if the new parent is the page
    ///   itself or one of its descendants
    /// * `IntegrityError::DepthExceeded` - if the moved subtree would be too deep
    async fn move_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
        new_parent_id: Option<&PageId>,
    ) -> ContentResult<Page>;

    /// Deletes a page.
    ///
    /// # Errors
    ///
    /// * `IntegrityError::HasChildren` - if the page has child pages
    async fn delete_page(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
    ) -> ContentResult<()>;

    /// Lists the children of a page, or the root pages when `parent_id` is
    /// `None`, in sibling order.
    async fn list_children(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        parent_id: Option<&PageId>,
    ) -> ContentResult<Vec<Page>>;

    /// Lists every page of a workspace.
    async fn list_pages(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
    ) -> ContentResult<Vec<Page>>;

    /// Returns the ancestors of a page, nearest first.
    async fn ancestors(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        page_id: &PageId,
    ) -> ContentResult<Vec<Page>>;

    /// Resolves an ID to a page or a table.
    ///
    /// # Errors
    ///
    /// * `NotFoundError::Node` - if the ID names neither
    async fn get_node(
        &self,
        ctx: &OperationContext,
        workspace_id: &WorkspaceId,
        id: &str,
    ) -> ContentResult<Node>;
}
