//! Substring search over stored pages and records.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::OperationContext;
use crate::core::{PageHierarchy, SearchService, TableStorage, TenantDirectory};
use crate::error::ContentResult;
use crate::ids::OrganizationId;
use crate::types::{DataRecord, Page, SearchHitKind, SearchOptions, SearchResult, Table};

use super::snippet::{contains_ignore_case, create_snippet};

/// Score added for a title match.
pub const TITLE_SCORE: f64 = 10.0;
/// Score added for a body match.
pub const BODY_SCORE: f64 = 5.0;
/// Score added for each matching record field.
pub const FIELD_SCORE: f64 = 2.0;
/// Upper bound of any score.
pub const MAX_SCORE: f64 = 100.0;

/// Searches every workspace of an organization by reading through the
/// storage traits.
///
/// Matching is a case-insensitive substring test. Page titles score
/// [`TITLE_SCORE`], page bodies [`BODY_SCORE`], and each matching record
/// field [`FIELD_SCORE`].
#[derive(Debug)]
pub struct ContentSearch<S> {
    store: Arc<S>,
}

impl<S> Clone for ContentSearch<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> ContentSearch<S>
where
    S: TenantDirectory + PageHierarchy + TableStorage,
{
    /// Creates a search service over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn score_page(page: &Page, query: &str, match_title: bool, match_body: bool) -> Option<SearchResult> {
    let mut score: f64 = 0.0;
    let mut matches = BTreeMap::new();
    let mut snippet = String::new();

    if match_title && contains_ignore_case(&page.title, query) {
        score += TITLE_SCORE;
        matches.insert("title".to_string(), page.title.clone());
    }
    if match_body && contains_ignore_case(&page.content, query) {
        score += BODY_SCORE;
        matches.insert("content".to_string(), query.to_string());
        snippet = create_snippet(&page.content, query);
    }

    if score <= 0.0 {
        return None;
    }
    Some(SearchResult {
        kind: SearchHitKind::Page,
        node_id: page.id.to_string(),
        record_id: None,
        title: page.title.clone(),
        snippet,
        score: score.min(MAX_SCORE),
        matches,
        modified: page.modified,
    })
}

fn score_record(table: &Table, record: &DataRecord, query: &str) -> Option<SearchResult> {
    let mut score: f64 = 0.0;
    let mut matches = BTreeMap::new();

    for (field, value) in &record.data {
        let text = value.to_text();
        if contains_ignore_case(&text, query) {
            score += FIELD_SCORE;
            matches.insert(field.clone(), text);
        }
    }

    let (field, value) = matches.iter().next()?;
    let snippet = format!("{}: {}", field, value);
    Some(SearchResult {
        kind: SearchHitKind::Record,
        node_id: table.id.to_string(),
        record_id: Some(record.id.clone()),
        title: table.name.clone(),
        snippet,
        score: score.min(MAX_SCORE),
        matches,
        modified: record.modified,
    })
}

#[async_trait]
impl<S> SearchService for ContentSearch<S>
where
    S: TenantDirectory + PageHierarchy + TableStorage + 'static,
{
    async fn search(
        &self,
        ctx: &OperationContext,
        organization_id: &OrganizationId,
        options: SearchOptions,
    ) -> ContentResult<Vec<SearchResult>> {
        ctx.ensure_active()?;
        if options.query.is_empty() {
            return Ok(Vec::new());
        }
        let workspaces = self.store.list_workspaces(ctx, organization_id).await?;

        let (match_title, match_body, match_fields) = options.effective_targets();
        let query = options.query.as_str();
        let mut results = Vec::new();

        for workspace in &workspaces {
            ctx.ensure_active()?;
            if match_title || match_body {
                let pages = self.store.list_pages(ctx, &workspace.id).await?;
                results.extend(
                    pages
                        .iter()
                        .filter_map(|page| score_page(page, query, match_title, match_body)),
                );
            }
            if match_fields {
                for table in self.store.list_tables(ctx, &workspace.id).await? {
                    let records = self
                        .store
                        .list_records(ctx, &workspace.id, &table.id, 0, 0)
                        .await?;
                    results.extend(
                        records
                            .iter()
                            .filter_map(|record| score_record(&table, record, query)),
                    );
                }
            }
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        if options.limit > 0 {
            results.truncate(options.limit);
        }

        tracing::debug!(
            "Search in organization {} for {:?} returned {} results",
            organization_id,
            options.query,
            results.len()
        );
        Ok(results)
    }
}
