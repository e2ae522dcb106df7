use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, CatalogItem, CategoryFilter};

/// Current category filter and free-text search term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub search_term: String,
}

impl FilterState {
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.category.matches(item.category) && matches_search(item, &self.search_term)
    }

    pub fn has_search(&self) -> bool {
        !self.search_term.is_empty()
    }
}

/// Case-insensitive substring match on title, description and narrator.
/// Only the empty term matches everything; whitespace is part of the needle.
pub fn matches_search(item: &CatalogItem, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Whether the filtered view has anything to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum FilterOutcome {
    Results(usize),
    NoResults,
}

/// Read-only catalog plus the active filter.  The filtered view is kept as a
/// list of catalog indices and recomputed whenever the filter changes.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalog: Arc<Catalog>,
    filter: FilterState,
    visible: Vec<usize>,
}

impl CatalogStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let visible = (0..catalog.len()).collect();
        Self {
            catalog,
            filter: FilterState::default(),
            visible,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        if self.filter.category == category {
            return;
        }
        debug!("store: category -> {}", category.label());
        self.filter.category = category;
        self.recompute();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.filter.search_term == term {
            return;
        }
        debug!("store: search -> {:?}", term);
        self.filter.search_term = term;
        self.recompute();
    }

    pub fn clear_search(&mut self) {
        self.set_search_term(String::new());
    }

    fn recompute(&mut self) {
        let filter = &self.filter;
        self.visible = self
            .catalog
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| filter.matches(item))
            .map(|(i, _)| i)
            .collect();
        debug!("store: {} of {} visible", self.visible.len(), self.catalog.len());
    }

    /// Items passing both predicates, in catalog order.
    pub fn filtered_items(&self) -> Vec<&CatalogItem> {
        let items = self.catalog.items();
        self.visible.iter().map(|&i| &items[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn outcome(&self) -> FilterOutcome {
        match self.visible.len() {
            0 => FilterOutcome::NoResults,
            n => FilterOutcome::Results(n),
        }
    }

    /// Summary line shown under the search box.  Only present while a search
    /// term is set.
    pub fn result_summary(&self) -> Option<String> {
        if !self.filter.has_search() {
            return None;
        }
        Some(match self.outcome() {
            FilterOutcome::NoResults => "No stories found".to_string(),
            FilterOutcome::Results(1) => "Found 1 story".to_string(),
            FilterOutcome::Results(n) => format!("Found {n} stories"),
        })
    }

    pub fn category_counts(&self) -> Vec<(CategoryFilter, usize)> {
        self.catalog.category_counts()
    }
}
