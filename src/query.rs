//! Artwork Query Pipeline - Single Entry Point
//!
//! filter -> sort -> paginate. All three steps are total: empty input,
//! empty criteria and out-of-range pages produce a result, never an error.

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{ArtworkRecord, Catalog};
use crate::criteria::{Criteria, Filter, QueryState};
use crate::facets::FacetCatalog;

pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Catalog order, which is already ranked.
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortKey {
    /// Unknown tags fall back to `Recommended`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "price_asc" => SortKey::PriceAsc,
            "price_desc" => SortKey::PriceDesc,
            "newest" => SortKey::Newest,
            _ => SortKey::Recommended,
        }
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually served, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Records satisfying `criteria`, in input order.
pub fn filter(records: &[ArtworkRecord], criteria: &Criteria) -> Vec<ArtworkRecord> {
    Filter::new().apply(records, criteria)
}

/// Stable ordering by `key`; equal keys keep their input order.
pub fn sort(records: &[ArtworkRecord], key: SortKey) -> Vec<ArtworkRecord> {
    let mut sorted = records.to_vec();
    match key {
        SortKey::Recommended => {}
        SortKey::PriceAsc => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Newest => sorted.sort_by(|a, b| b.listed_at.cmp(&a.listed_at)),
    }
    sorted
}

/// Slices page `page` (1-based, clamped to `[1, total_pages]`).
/// `total_pages` is at least 1; a zero `page_size` is treated as 1.
pub fn paginate<T: Clone>(records: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = records.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(total_items);
    let end = (page * page_size).min(total_items);

    Page {
        items: records[start..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

/// The query pipeline - one call per listing render.
pub struct QueryPipeline {
    catalog: Catalog,
    facets: FacetCatalog,
    rules: Filter,
    page_size: usize,
}

impl QueryPipeline {
    pub fn new(catalog: Catalog, facets: FacetCatalog) -> Self {
        Self {
            catalog,
            facets,
            rules: Filter::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn criteria(&self, state: &QueryState) -> Criteria {
        Criteria::from_state(state, &self.facets)
    }

    /// Facets that actually constrain `state` after normalization.
    pub fn active_facets(&self, state: &QueryState) -> Vec<&'static str> {
        self.rules.active_rules(&self.criteria(state))
    }

    /// Normalize, filter, sort and paginate in one pass.
    pub fn run(&self, state: &QueryState) -> Page<ArtworkRecord> {
        let criteria = self.criteria(state);
        let matched = self.rules.apply(self.catalog.list(), &criteria);
        let ordered = sort(&matched, state.sort_key);
        let page = paginate(&ordered, self.page_size, state.current_page);

        tracing::debug!(
            catalog = self.catalog.len(),
            matched = page.total_items,
            facets = ?self.rules.active_rules(&criteria),
            sort = ?state.sort_key,
            page = page.page,
            total_pages = page.total_pages,
            "artwork query"
        );

        page
    }
}

impl Default for QueryPipeline {
    fn default() -> Self {
        Self::new(Catalog::seeded(), FacetCatalog::canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_fallback() {
        assert_eq!(SortKey::from_tag("newest"), SortKey::Newest);
        assert_eq!(SortKey::from_tag("popular"), SortKey::Recommended);
        assert_eq!(SortKey::from_tag(""), SortKey::Recommended);

        let key: SortKey = serde_json::from_str(r#""price_asc""#).unwrap();
        assert_eq!(key, SortKey::PriceAsc);
        let key: SortKey = serde_json::from_str(r#""random""#).unwrap();
        assert_eq!(key, SortKey::Recommended);
    }

    #[test]
    fn test_sort_key_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&SortKey::PriceDesc).unwrap(), r#""price_desc""#);
    }

    #[test]
    fn test_active_facets_skip_unknown_values() {
        let pipeline = QueryPipeline::default();
        let state = QueryState {
            selected_colors: vec!["red".into()],
            selected_sizes: vec!["XXL".into()],
            selected_price_ranges: vec!["0-50000".into()],
            ..Default::default()
        };
        assert_eq!(pipeline.active_facets(&state), vec!["colors", "price_ranges"]);
        assert!(pipeline.active_facets(&QueryState::default()).is_empty());
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate::<u32>(&[], 10, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_paginate_zero_page_size() {
        let page = paginate(&[1, 2, 3], 0, 2);
        assert_eq!(page.items, vec![2]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_exact_fit() {
        let page = paginate(&[1, 2, 3, 4], 2, 2);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total_pages, 2);
    }
}
