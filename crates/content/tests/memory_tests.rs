//! In-memory backend integration tests.
//!
//! These exercise the storage traits end to end: hierarchy integrity, table
//! and record storage, asset accounting, and quota enforcement.

mod common;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use common::{fixture, fixture_with_config, fixture_with_limits};
use mddb_content::backends::memory::MemoryBackendConfig;
use mddb_content::core::{AssetStorage, PageHierarchy, QuotaGetter, TableStorage, TenantDirectory};
use mddb_content::error::{
    ContentError, IntegrityError, NotFoundError, OperationError, QuotaError, ValidationError,
};
use mddb_content::ids::{AssetId, PageId, RecordId, TableId, WorkspaceId};
use mddb_content::types::{
    DEFAULT_MIME_TYPE, NewAsset, NewPage, NewTable, Node, PageUpdate, PropertyType, PropertyValue,
    QuotaLimits, TableUpdate, TypedValue,
};
use mddb_content::{OperationContext, StoreConfig};

fn data(pairs: &[(&str, PropertyValue)]) -> BTreeMap<String, PropertyValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ============================================================================
// Hierarchy Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_page() {
    let f = fixture().await;
    let page = f
        .store
        .create_page(
            &f.ctx,
            f.ws(),
            NewPage::new("Guide").with_content("# Intro").with_tag("docs"),
        )
        .await
        .unwrap();

    let fetched = f.store.get_page(&f.ctx, f.ws(), &page.id).await.unwrap();
    assert_eq!(fetched, page);
    assert_eq!(fetched.tags, vec!["docs".to_string()]);
    assert!(fetched.is_root());
}

#[tokio::test]
async fn test_create_page_requires_title_and_workspace() {
    let f = fixture().await;

    let result = f.store.create_page(&f.ctx, f.ws(), NewPage::new("")).await;
    assert!(matches!(
        result,
        Err(ContentError::Validation(ValidationError::NameRequired { entity: "page" }))
    ));

    let result = f
        .store
        .create_page(&f.ctx, &WorkspaceId::default(), NewPage::new("x"))
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Validation(ValidationError::WorkspaceIdRequired))
    ));

    let result = f
        .store
        .get_page(&f.ctx, f.ws(), &PageId::default())
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Validation(ValidationError::IdRequired { entity: "page" }))
    ));
}

#[tokio::test]
async fn test_create_page_with_missing_parent() {
    let f = fixture().await;
    let result = f
        .store
        .create_page(
            &f.ctx,
            f.ws(),
            NewPage::new("Child").with_parent(PageId::new("missing")),
        )
        .await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Page { .. }))
    ));
}

#[tokio::test]
async fn test_move_into_descendant_is_rejected_and_tree_unchanged() {
    let f = fixture().await;
    let root = f.page("root", None).await;
    let a = f.page("A", Some(&root)).await;
    let b = f.page("B", Some(&a)).await;

    let before = f.store.list_pages(&f.ctx, f.ws()).await.unwrap();

    let result = f.store.move_page(&f.ctx, f.ws(), &a, Some(&b)).await;
    assert!(matches!(
        result,
        Err(ContentError::Integrity(IntegrityError::CycleDetected { .. }))
    ));

    let after = f.store.list_pages(&f.ctx, f.ws()).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(
        f.store.get_page(&f.ctx, f.ws(), &a).await.unwrap().parent_id,
        Some(root)
    );
}

#[tokio::test]
async fn test_move_to_self_is_rejected() {
    let f = fixture().await;
    let a = f.page("A", None).await;
    let result = f.store.move_page(&f.ctx, f.ws(), &a, Some(&a)).await;
    assert!(matches!(
        result,
        Err(ContentError::Integrity(IntegrityError::CycleDetected { .. }))
    ));
}

#[tokio::test]
async fn test_move_appends_after_new_siblings() {
    let f = fixture().await;
    let root = f.page("root", None).await;
    let first = f.page("first", Some(&root)).await;
    let second = f.page("second", Some(&root)).await;
    let loose = f.page("loose", None).await;

    let moved = f
        .store
        .move_page(&f.ctx, f.ws(), &loose, Some(&root))
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(root.clone()));

    let children: Vec<PageId> = f
        .store
        .list_children(&f.ctx, f.ws(), Some(&root))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(children, vec![first, second.clone(), loose.clone()]);

    // Back to the root level.
    f.store.move_page(&f.ctx, f.ws(), &loose, None).await.unwrap();
    let roots: Vec<PageId> = f
        .store
        .list_children(&f.ctx, f.ws(), None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(roots, vec![root, loose]);
}

#[tokio::test]
async fn test_ancestors_nearest_first() {
    let f = fixture().await;
    let root = f.page("root", None).await;
    let a = f.page("A", Some(&root)).await;
    let b = f.page("B", Some(&a)).await;

    let ancestors: Vec<PageId> = f
        .store
        .ancestors(&f.ctx, f.ws(), &b)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ancestors, vec![a, root]);
}

#[tokio::test]
async fn test_delete_page_with_children_is_denied() {
    let f = fixture().await;
    let root = f.page("root", None).await;
    let child = f.page("child", Some(&root)).await;

    let result = f.store.delete_page(&f.ctx, f.ws(), &root).await;
    assert!(matches!(
        result,
        Err(ContentError::Integrity(IntegrityError::HasChildren { entity: "page", count: 1, .. }))
    ));

    f.store.delete_page(&f.ctx, f.ws(), &child).await.unwrap();
    f.store.delete_page(&f.ctx, f.ws(), &root).await.unwrap();
    assert!(f.store.list_pages(&f.ctx, f.ws()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_page() {
    let f = fixture().await;
    let id = f.page("Draft", None).await;
    let updated = f
        .store
        .update_page(
            &f.ctx,
            f.ws(),
            &id,
            PageUpdate {
                title: Some("Final".into()),
                content: Some("body".into()),
                tags: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "body");
    assert!(updated.modified >= updated.created);

    let result = f
        .store
        .update_page(
            &f.ctx,
            f.ws(),
            &id,
            PageUpdate {
                title: Some(" ".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Validation(ValidationError::NameRequired { .. }))
    ));
}

#[tokio::test]
async fn test_depth_limit_on_create_and_move() {
    let config = MemoryBackendConfig {
        max_hierarchy_depth: 3,
        ..Default::default()
    };
    let f = fixture_with_config(config, QuotaLimits::unlimited()).await;
    let a = f.page("a", None).await;
    let b = f.page("b", Some(&a)).await;
    let c = f.page("c", Some(&b)).await;

    let result = f
        .store
        .create_page(&f.ctx, f.ws(), NewPage::new("d").with_parent(c.clone()))
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Integrity(IntegrityError::DepthExceeded { depth: 4, max: 3 }))
    ));

    // Moving the two-level subtree under c would reach depth 5.
    let x = f.page("x", None).await;
    f.page("y", Some(&x)).await;
    let result = f.store.move_page(&f.ctx, f.ws(), &x, Some(&c)).await;
    assert!(matches!(
        result,
        Err(ContentError::Integrity(IntegrityError::DepthExceeded { depth: 5, .. }))
    ));

    // Under a it fits exactly.
    f.store.move_page(&f.ctx, f.ws(), &x, Some(&a)).await.unwrap();
}

#[tokio::test]
async fn test_page_quota() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_pages_per_workspace(2)).await;
    f.page("one", None).await;
    f.page("two", None).await;
    let result = f.store.create_page(&f.ctx, f.ws(), NewPage::new("three")).await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::Exceeded { resource: "pages", used: 2, limit: 2 }))
    ));

    let quota = f.store.get_quota(&f.ctx, &f.org.id).await.unwrap();
    assert_eq!(quota.usage.page_count, 2);
}

#[tokio::test]
async fn test_get_node_resolves_pages_and_tables() {
    let f = fixture().await;
    let page = f.page("Home", None).await;
    let table = f
        .store
        .create_table(&f.ctx, f.ws(), NewTable::new("Tasks"))
        .await
        .unwrap();

    let node = f.store.get_node(&f.ctx, f.ws(), page.as_str()).await.unwrap();
    assert!(matches!(node, Node::Page(ref p) if p.id == page));

    let node = f.store.get_node(&f.ctx, f.ws(), table.id.as_str()).await.unwrap();
    assert_eq!(node.title(), "Tasks");

    let result = f.store.get_node(&f.ctx, f.ws(), "nothing").await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Node { .. }))
    ));
}

// ============================================================================
// Table Tests
// ============================================================================

#[tokio::test]
async fn test_table_quota_of_two() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_tables_per_workspace(2)).await;

    f.store
        .create_table(&f.ctx, f.ws(), NewTable::new("A"))
        .await
        .unwrap();
    f.store
        .create_table(&f.ctx, f.ws(), NewTable::new("B"))
        .await
        .unwrap();
    let result = f.store.create_table(&f.ctx, f.ws(), NewTable::new("C")).await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::TableQuotaExceeded { limit: 2, .. }))
    ));
    assert_eq!(f.store.list_tables(&f.ctx, f.ws()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_table_validation() {
    let f = fixture().await;

    let result = f.store.create_table(&f.ctx, f.ws(), NewTable::new("")).await;
    assert!(matches!(
        result,
        Err(ContentError::Validation(ValidationError::NameRequired { entity: "table" }))
    ));

    let dup = NewTable::new("T")
        .with_property("a", PropertyType::Text)
        .with_property("a", PropertyType::Number);
    let result = f.store.create_table(&f.ctx, f.ws(), dup).await;
    assert!(matches!(
        result,
        Err(ContentError::Validation(ValidationError::InvalidSchema { .. }))
    ));
}

#[tokio::test]
async fn test_table_not_found() {
    let f = fixture().await;
    let missing = TableId::new("missing");

    let result = f.store.get_table(&f.ctx, f.ws(), &missing).await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Table { .. }))
    ));

    let result = f.store.delete_table(&f.ctx, f.ws(), &missing).await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Table { .. }))
    ));

    let result = f
        .store
        .create_record(&f.ctx, f.ws(), &missing, BTreeMap::new())
        .await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Database { .. }))
    ));
}

#[tokio::test]
async fn test_update_and_list_tables() {
    let f = fixture().await;
    let first = f
        .store
        .create_table(&f.ctx, f.ws(), NewTable::new("First"))
        .await
        .unwrap();
    f.store
        .create_table(&f.ctx, f.ws(), NewTable::new("Second"))
        .await
        .unwrap();

    let updated = f
        .store
        .update_table(
            &f.ctx,
            f.ws(),
            &first.id,
            TableUpdate {
                name: Some("Renamed".into()),
                properties: Some(NewTable::new("x").with_property("n", PropertyType::Number).properties),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.properties.len(), 1);
    assert_eq!(updated.created, first.created);

    let names: Vec<String> = f
        .store
        .list_tables(&f.ctx, f.ws())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Renamed".to_string(), "Second".to_string()]);
}

#[tokio::test]
async fn test_delete_table_drops_records_and_frees_quota() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_tables_per_workspace(1)).await;
    let table = f
        .store
        .create_table(&f.ctx, f.ws(), NewTable::new("Only"))
        .await
        .unwrap();
    f.store
        .create_record(&f.ctx, f.ws(), &table.id, BTreeMap::new())
        .await
        .unwrap();

    f.store.delete_table(&f.ctx, f.ws(), &table.id).await.unwrap();
    let result = f.store.count_records(&f.ctx, f.ws(), &table.id).await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Database { .. }))
    ));

    f.store
        .create_table(&f.ctx, f.ws(), NewTable::new("Replacement"))
        .await
        .unwrap();
}

// ============================================================================
// Record Tests
// ============================================================================

#[tokio::test]
async fn test_record_crud() {
    let f = fixture().await;
    let table = f
        .store
        .create_table(
            &f.ctx,
            f.ws(),
            NewTable::new("Tasks")
                .with_property("title", PropertyType::Text)
                .with_property("points", PropertyType::Number),
        )
        .await
        .unwrap();

    let record = f
        .store
        .create_record(
            &f.ctx,
            f.ws(),
            &table.id,
            data(&[("title", "Write".into()), ("points", 3.into())]),
        )
        .await
        .unwrap();
    assert_eq!(record.get_string("title"), "Write");

    let fetched = f
        .store
        .get_record(&f.ctx, f.ws(), &table.id, &record.id)
        .await
        .unwrap();
    assert_eq!(fetched, record);

    let updated = f
        .store
        .update_record(
            &f.ctx,
            f.ws(),
            &table.id,
            &record.id,
            data(&[("points", 5.into())]),
        )
        .await
        .unwrap();
    assert_eq!(updated.created, record.created);
    assert_eq!(updated.get_number("points"), 5.0);
    assert_eq!(updated.get_string("title"), "");

    f.store
        .delete_record(&f.ctx, f.ws(), &table.id, &record.id)
        .await
        .unwrap();
    let result = f
        .store
        .get_record(&f.ctx, f.ws(), &table.id, &record.id)
        .await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Record { .. }))
    ));
}

#[tokio::test]
async fn test_record_requires_id() {
    let f = fixture().await;
    let table = f
        .store
        .create_table(&f.ctx, f.ws(), NewTable::new("T"))
        .await
        .unwrap();
    let result = f
        .store
        .get_record(&f.ctx, f.ws(), &table.id, &RecordId::default())
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Validation(ValidationError::IdRequired { entity: "record" }))
    ));
}

#[tokio::test]
async fn test_list_records_pagination() {
    let f = fixture().await;
    let table = f
        .store
        .create_table(&f.ctx, f.ws(), NewTable::new("Numbers"))
        .await
        .unwrap();
    for i in 0..5 {
        f.store
            .create_record(&f.ctx, f.ws(), &table.id, data(&[("n", i.into())]))
            .await
            .unwrap();
    }

    let page = f
        .store
        .list_records(&f.ctx, f.ws(), &table.id, 1, 2)
        .await
        .unwrap();
    let values: Vec<f64> = page.iter().map(|r| r.get_number("n")).collect();
    assert_eq!(values, vec![1.0, 2.0]);

    let rest = f
        .store
        .list_records(&f.ctx, f.ws(), &table.id, 3, 0)
        .await
        .unwrap();
    assert_eq!(rest.len(), 2);
    assert_eq!(
        f.store.count_records(&f.ctx, f.ws(), &table.id).await.unwrap(),
        5
    );
}

#[tokio::test]
async fn test_record_quota() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_records_per_table(1)).await;
    let table = f
        .store
        .create_table(&f.ctx, f.ws(), NewTable::new("T"))
        .await
        .unwrap();
    f.store
        .create_record(&f.ctx, f.ws(), &table.id, BTreeMap::new())
        .await
        .unwrap();
    let result = f
        .store
        .create_record(&f.ctx, f.ws(), &table.id, BTreeMap::new())
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::Exceeded { resource: "records", .. }))
    ));
}

#[tokio::test]
async fn test_schema_is_not_enforced_on_write() {
    let f = fixture().await;
    let table = f
        .store
        .create_table(
            &f.ctx,
            f.ws(),
            NewTable::new("T")
                .with_property("points", PropertyType::Number)
                .with_property("due", PropertyType::Date)
                .with_property("tags", PropertyType::MultiSelect),
        )
        .await
        .unwrap();

    let due = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    let mut input = data(&[
        ("points", "not a number".into()),
        (
            "tags",
            vec![
                PropertyValue::from("a"),
                PropertyValue::from(1),
                PropertyValue::from("b"),
            ]
            .into(),
        ),
    ]);
    input.insert("due".into(), PropertyValue::Number(due.timestamp() as f64));

    let record = f
        .store
        .create_record(&f.ctx, f.ws(), &table.id, input)
        .await
        .unwrap();

    assert_eq!(table.typed_value(&record, "points"), Some(TypedValue::Number(0.0)));
    assert_eq!(table.typed_value(&record, "due"), Some(TypedValue::Date(due)));
    assert_eq!(
        table.typed_value(&record, "tags"),
        Some(TypedValue::MultiSelect(vec!["a".into(), "b".into()]))
    );
    assert_eq!(table.mismatched_properties(&record), vec!["points"]);
}

// ============================================================================
// Asset Tests
// ============================================================================

#[tokio::test]
async fn test_asset_over_storage_quota_leaves_usage_unchanged() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_storage_bytes(100)).await;

    f.store
        .create_asset(&f.ctx, f.ws(), NewAsset::new("a.bin", 60))
        .await
        .unwrap();

    let result = f
        .store
        .create_asset(&f.ctx, f.ws(), NewAsset::new("b.bin", 41))
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::ServerStorageQuotaExceeded {
            used: 60,
            requested: 41,
            limit: 100,
            ..
        }))
    ));

    let quota = f.store.get_quota(&f.ctx, &f.org.id).await.unwrap();
    assert_eq!(quota.usage.storage_bytes, 60);
    assert_eq!(f.store.list_assets(&f.ctx, f.ws()).await.unwrap().len(), 1);

    // Exactly filling the quota is allowed.
    f.store
        .create_asset(&f.ctx, f.ws(), NewAsset::new("c.bin", 40))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_storage_quota_spans_workspaces() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_storage_bytes(100)).await;
    let other = f
        .store
        .create_workspace(&f.ctx, &f.org.id, "Other", None)
        .await
        .unwrap();

    f.store
        .create_asset(&f.ctx, f.ws(), NewAsset::new("a", 70))
        .await
        .unwrap();
    let result = f
        .store
        .create_asset(&f.ctx, &other.id, NewAsset::new("b", 31))
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::ServerStorageQuotaExceeded { .. }))
    ));
}

#[tokio::test]
async fn test_delete_asset_releases_bytes() {
    let f = fixture().await;
    let asset = f
        .store
        .create_asset(&f.ctx, f.ws(), NewAsset::new("logo.png", 1234).with_mime_type("image/png"))
        .await
        .unwrap();
    let plain = f
        .store
        .create_asset(&f.ctx, f.ws(), NewAsset::new("blob", 6))
        .await
        .unwrap();
    assert_eq!(plain.mime_type, DEFAULT_MIME_TYPE);
    assert_eq!(
        f.store.get_quota(&f.ctx, &f.org.id).await.unwrap().usage.storage_bytes,
        1240
    );

    f.store.delete_asset(&f.ctx, f.ws(), &asset.id).await.unwrap();
    assert_eq!(
        f.store.get_quota(&f.ctx, &f.org.id).await.unwrap().usage.storage_bytes,
        6
    );

    let result = f.store.get_asset(&f.ctx, f.ws(), &asset.id).await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Asset { .. }))
    ));
    let result = f.store.delete_asset(&f.ctx, f.ws(), &AssetId::new("gone")).await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Asset { .. }))
    ));
}

#[tokio::test]
async fn test_asset_too_large() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_asset_size_bytes(10)).await;
    let result = f
        .store
        .create_asset(&f.ctx, f.ws(), NewAsset::new("big", 11))
        .await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::AssetTooLarge { size: 11, limit: 10 }))
    ));
}

// ============================================================================
// Tenant Tests
// ============================================================================

#[tokio::test]
async fn test_delete_workspace_with_content_is_denied() {
    let f = fixture().await;
    let page = f.page("p", None).await;

    let result = f.store.delete_workspace(&f.ctx, f.ws()).await;
    assert!(matches!(
        result,
        Err(ContentError::Integrity(IntegrityError::HasChildren { entity: "workspace", .. }))
    ));

    f.store.delete_page(&f.ctx, f.ws(), &page).await.unwrap();
    f.store.delete_workspace(&f.ctx, f.ws()).await.unwrap();

    let result = f.store.create_page(&f.ctx, f.ws(), NewPage::new("late")).await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Workspace { .. }))
    ));
}

#[tokio::test]
async fn test_default_limits_from_config() {
    let f = fixture().await;
    let org = f
        .store
        .create_organization(&f.ctx, "Defaults", None)
        .await
        .unwrap();
    assert_eq!(org.limits, StoreConfig::default().default_limits());
    assert_eq!(org.limits.max_storage_bytes, 5 * 1024 * 1024 * 1024);
    assert_eq!(org.limits.max_workspaces, 3);
}

#[tokio::test]
async fn test_lowered_limits_block_growth() {
    let f = fixture().await;
    f.store
        .create_table(&f.ctx, f.ws(), NewTable::new("A"))
        .await
        .unwrap();
    f.store
        .set_quota_limits(
            &f.ctx,
            &f.org.id,
            QuotaLimits::unlimited().with_max_tables_per_workspace(1),
        )
        .await
        .unwrap();

    let result = f.store.create_table(&f.ctx, f.ws(), NewTable::new("B")).await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::TableQuotaExceeded { .. }))
    ));
}

#[tokio::test]
async fn test_workspace_limit_narrows_organization_limit() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_tables_per_workspace(5)).await;
    let tight = f
        .store
        .create_workspace(
            &f.ctx,
            &f.org.id,
            "Tight",
            Some(QuotaLimits::unlimited().with_max_tables_per_workspace(1)),
        )
        .await
        .unwrap();
    assert_eq!(tight.limits.map(|l| l.max_tables_per_workspace), Some(1));

    f.store
        .create_table(&f.ctx, &tight.id, NewTable::new("A"))
        .await
        .unwrap();
    let result = f.store.create_table(&f.ctx, &tight.id, NewTable::new("B")).await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::TableQuotaExceeded { limit: 1, .. }))
    ));

    // Sibling workspaces keep the organization limit.
    for name in ["A", "B"] {
        f.store
            .create_table(&f.ctx, f.ws(), NewTable::new(name))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_workspace_limit_cannot_loosen_organization_limit() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_tables_per_workspace(1)).await;
    let loose = f
        .store
        .create_workspace(
            &f.ctx,
            &f.org.id,
            "Loose",
            Some(QuotaLimits::unlimited().with_max_tables_per_workspace(10)),
        )
        .await
        .unwrap();

    f.store
        .create_table(&f.ctx, &loose.id, NewTable::new("A"))
        .await
        .unwrap();
    let result = f.store.create_table(&f.ctx, &loose.id, NewTable::new("B")).await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::TableQuotaExceeded { limit: 1, .. }))
    ));
}

#[tokio::test]
async fn test_set_workspace_quota_limits() {
    let f = fixture_with_limits(QuotaLimits::unlimited().with_max_tables_per_workspace(5)).await;
    f.store
        .create_table(&f.ctx, f.ws(), NewTable::new("A"))
        .await
        .unwrap();

    let updated = f
        .store
        .set_workspace_quota_limits(
            &f.ctx,
            f.ws(),
            Some(QuotaLimits::unlimited().with_max_tables_per_workspace(1)),
        )
        .await
        .unwrap();
    assert_eq!(updated.limits.map(|l| l.max_tables_per_workspace), Some(1));
    assert_eq!(
        f.store.get_workspace(&f.ctx, f.ws()).await.unwrap().limits,
        updated.limits
    );

    let result = f.store.create_table(&f.ctx, f.ws(), NewTable::new("B")).await;
    assert!(matches!(
        result,
        Err(ContentError::Quota(QuotaError::TableQuotaExceeded { limit: 1, .. }))
    ));

    // Clearing the override falls back to the organization limit.
    let cleared = f
        .store
        .set_workspace_quota_limits(&f.ctx, f.ws(), None)
        .await
        .unwrap();
    assert!(cleared.limits.is_none());
    f.store
        .create_table(&f.ctx, f.ws(), NewTable::new("B"))
        .await
        .unwrap();

    let result = f
        .store
        .set_workspace_quota_limits(&f.ctx, &WorkspaceId::new("missing"), None)
        .await;
    assert!(matches!(
        result,
        Err(ContentError::NotFound(NotFoundError::Workspace { .. }))
    ));
}

// ============================================================================
// Context Tests
// ============================================================================

#[tokio::test]
async fn test_cancelled_context_aborts_before_mutation() {
    let f = fixture().await;
    let ctx = OperationContext::new();
    ctx.cancel_handle().cancel();

    let result = f.store.create_page(&ctx, f.ws(), NewPage::new("x")).await;
    assert!(matches!(
        result,
        Err(ContentError::Operation(OperationError::Cancelled))
    ));
    let result = f
        .store
        .create_asset(&ctx, f.ws(), NewAsset::new("x", 1))
        .await;
    assert!(result.is_err());

    assert!(f.store.list_pages(&f.ctx, f.ws()).await.unwrap().is_empty());
    let quota = f.store.get_quota(&f.ctx, &f.org.id).await.unwrap();
    assert_eq!(quota.usage.storage_bytes, 0);
    assert_eq!(quota.usage.page_count, 0);
}

#[tokio::test]
async fn test_expired_deadline() {
    let f = fixture().await;
    let ctx = OperationContext::new().with_timeout(Duration::ZERO);
    let result = f.store.create_table(&ctx, f.ws(), NewTable::new("T")).await;
    assert!(matches!(
        result,
        Err(ContentError::Operation(OperationError::DeadlineExceeded { .. }))
    ));
    assert!(f.store.list_tables(&f.ctx, f.ws()).await.unwrap().is_empty());
}
