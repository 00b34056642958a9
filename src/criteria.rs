//! Filter Criteria - Rule per Facet
//!
//! Facets are ANDed together, selected values within a facet are ORed.
//! Inactive facets (nothing selected) are skipped, never "match nothing".

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{ArtworkRecord, SizeClass};
use crate::facets::{FacetCatalog, PriceRange};
use crate::query::SortKey;

/// Selection state owned by a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryState {
    pub search_query: String,
    pub selected_colors: Vec<String>,
    pub selected_sizes: Vec<String>,
    pub selected_price_ranges: Vec<String>,
    pub selected_techniques: Vec<String>,
    pub selected_styles: Vec<String>,
    pub sort_key: SortKey,
    /// 1-based; clamped at pagination time.
    pub current_page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            selected_colors: vec![],
            selected_sizes: vec![],
            selected_price_ranges: vec![],
            selected_techniques: vec![],
            selected_styles: vec![],
            sort_key: SortKey::Recommended,
            current_page: 1,
        }
    }
}

impl QueryState {
    /// Builds state from `q=&colors=&sizes=&priceRanges=&techniques=&styles=&sort=&page=`.
    /// Repeated facet keys accumulate. A query string that cannot be decoded
    /// yields the default state.
    pub fn from_query_string(query: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(query.trim_start_matches('?')) {
            Ok(pairs) => QueryParams::from_pairs(pairs).into_state(),
            Err(e) => {
                tracing::warn!(error = %e, "undecodable query string, using defaults");
                Self::default()
            }
        }
    }
}

/// Wire form of [`QueryState`]; multi-valued facets are comma separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParams {
    pub q: String,
    pub colors: String,
    pub sizes: String,
    pub price_ranges: String,
    pub techniques: String,
    pub styles: String,
    pub sort: String,
    pub page: String,
}

impl QueryParams {
    /// Folds decoded pairs: facet keys append to their comma list, scalar keys
    /// keep the last value, unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let list = match key.as_str() {
                "colors" => &mut params.colors,
                "sizes" => &mut params.sizes,
                "priceRanges" => &mut params.price_ranges,
                "techniques" => &mut params.techniques,
                "styles" => &mut params.styles,
                "q" => {
                    params.q = value;
                    continue;
                }
                "sort" => {
                    params.sort = value;
                    continue;
                }
                "page" => {
                    params.page = value;
                    continue;
                }
                _ => continue,
            };
            if !list.is_empty() {
                list.push(',');
            }
            list.push_str(&value);
        }
        params
    }

    pub fn into_state(self) -> QueryState {
        QueryState {
            search_query: self.q,
            selected_colors: split_list(&self.colors),
            selected_sizes: split_list(&self.sizes),
            selected_price_ranges: split_list(&self.price_ranges),
            selected_techniques: split_list(&self.techniques),
            selected_styles: split_list(&self.styles),
            sort_key: SortKey::from_tag(&self.sort),
            current_page: self.page.trim().parse().unwrap_or(1),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Selections after normalization against the facet vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Lowercased; `None` when the query is blank.
    pub search: Option<String>,
    pub colors: BTreeSet<String>,
    pub sizes: BTreeSet<SizeClass>,
    pub price_ranges: Vec<PriceRange>,
    pub techniques: BTreeSet<String>,
    pub styles: BTreeSet<String>,
}

impl Criteria {
    pub fn from_state(state: &QueryState, facets: &FacetCatalog) -> Self {
        let search = state.search_query.trim();
        let mut price_ranges: Vec<PriceRange> = Vec::new();
        for range in state.selected_price_ranges.iter().filter_map(|r| PriceRange::parse(r)) {
            if !price_ranges.contains(&range) {
                price_ranges.push(range);
            }
        }

        Self {
            search: (!search.is_empty()).then(|| search.to_lowercase()),
            colors: known_tags(&state.selected_colors, |v| facets.is_color(v)),
            sizes: state
                .selected_sizes
                .iter()
                .filter_map(|s| SizeClass::parse(s))
                .filter(|s| facets.is_size(s.as_str()))
                .collect(),
            price_ranges,
            techniques: known_tags(&state.selected_techniques, |v| facets.is_technique(v)),
            styles: known_tags(&state.selected_styles, |v| facets.is_style(v)),
        }
    }

    /// True when no facet constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_none()
            && self.colors.is_empty()
            && self.sizes.is_empty()
            && self.price_ranges.is_empty()
            && self.techniques.is_empty()
            && self.styles.is_empty()
    }
}

fn known_tags(values: &[String], known: impl Fn(&str) -> bool) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| known(v))
        .collect()
}

/// One facet's predicate.
pub trait FacetRule {
    fn name(&self) -> &'static str;
    fn is_active(&self, criteria: &Criteria) -> bool;
    fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool;
}

// --- Concrete Rules ---

pub struct SearchRule;

impl FacetRule for SearchRule {
    fn name(&self) -> &'static str { "search" }

    fn is_active(&self, criteria: &Criteria) -> bool {
        criteria.search.is_some()
    }

    fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool {
        let Some(needle) = criteria.search.as_deref() else {
            return true;
        };
        artwork.title.to_lowercase().contains(needle)
            || artwork.artist_name.to_lowercase().contains(needle)
            || artwork.styles.iter().any(|s| s.to_lowercase().contains(needle))
    }
}

pub struct ColorRule;

impl FacetRule for ColorRule {
    fn name(&self) -> &'static str { "colors" }

    fn is_active(&self, criteria: &Criteria) -> bool {
        !criteria.colors.is_empty()
    }

    fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool {
        artwork.colors.iter().any(|c| criteria.colors.contains(&c.to_lowercase()))
    }
}

pub struct SizeRule;

impl FacetRule for SizeRule {
    fn name(&self) -> &'static str { "sizes" }

    fn is_active(&self, criteria: &Criteria) -> bool {
        !criteria.sizes.is_empty()
    }

    fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool {
        criteria.sizes.contains(&artwork.size)
    }
}

pub struct PriceRule;

impl FacetRule for PriceRule {
    fn name(&self) -> &'static str { "price_ranges" }

    fn is_active(&self, criteria: &Criteria) -> bool {
        !criteria.price_ranges.is_empty()
    }

    fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool {
        criteria.price_ranges.iter().any(|r| r.contains(artwork.price))
    }
}

pub struct TechniqueRule;

impl FacetRule for TechniqueRule {
    fn name(&self) -> &'static str { "techniques" }

    fn is_active(&self, criteria: &Criteria) -> bool {
        !criteria.techniques.is_empty()
    }

    fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool {
        criteria.techniques.contains(&artwork.technique.to_lowercase())
    }
}

pub struct StyleRule;

impl FacetRule for StyleRule {
    fn name(&self) -> &'static str { "styles" }

    fn is_active(&self, criteria: &Criteria) -> bool {
        !criteria.styles.is_empty()
    }

    fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool {
        artwork.styles.iter().any(|s| criteria.styles.contains(&s.to_lowercase()))
    }
}

/// Filter orchestrates the facet rules.
pub struct Filter {
    rules: Vec<Box<dyn FacetRule>>,
}

impl Filter {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(SearchRule),
                Box::new(ColorRule),
                Box::new(SizeRule),
                Box::new(PriceRule),
                Box::new(TechniqueRule),
                Box::new(StyleRule),
            ],
        }
    }

    /// Records satisfying every active rule, in input order.
    pub fn apply(&self, records: &[ArtworkRecord], criteria: &Criteria) -> Vec<ArtworkRecord> {
        if criteria.is_unconstrained() {
            return records.to_vec();
        }
        records
            .iter()
            .filter(|art| self.matches(art, criteria))
            .cloned()
            .collect()
    }

    pub fn matches(&self, artwork: &ArtworkRecord, criteria: &Criteria) -> bool {
        self.rules
            .iter()
            .filter(|rule| rule.is_active(criteria))
            .all(|rule| rule.matches(artwork, criteria))
    }

    /// Names of the rules that constrain `criteria`.
    pub fn active_rules(&self, criteria: &Criteria) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.is_active(criteria))
            .map(|rule| rule.name())
            .collect()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facets() -> FacetCatalog {
        FacetCatalog::canonical()
    }

    #[test]
    fn test_unknown_values_dropped() {
        let state = QueryState {
            selected_colors: vec!["Ultraviolet".into()],
            selected_sizes: vec!["XXL".into()],
            selected_price_ranges: vec!["cheap".into()],
            selected_techniques: vec!["fresco".into()],
            ..Default::default()
        };
        let criteria = Criteria::from_state(&state, &facets());
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_tags_normalized() {
        let state = QueryState {
            search_query: "  Tokyo ".into(),
            selected_colors: vec![" RED".into(), "red".into()],
            selected_sizes: vec!["m".into()],
            selected_price_ranges: vec!["0-50000".into(), "0-50000".into()],
            ..Default::default()
        };
        let criteria = Criteria::from_state(&state, &facets());
        assert_eq!(criteria.search.as_deref(), Some("tokyo"));
        assert_eq!(criteria.colors.len(), 1);
        assert!(criteria.sizes.contains(&SizeClass::M));
        assert_eq!(criteria.price_ranges.len(), 1);
    }

    #[test]
    fn test_whitespace_search_is_blank() {
        let state = QueryState { search_query: " \t ".into(), ..Default::default() };
        assert!(Criteria::from_state(&state, &facets()).search.is_none());
    }

    #[test]
    fn test_query_string_decoding() {
        let state = QueryState::from_query_string(
            "?q=%E5%A2%A8&colors=red,%20blue&priceRanges=0-50000&sort=price_desc&page=3",
        );
        assert_eq!(state.search_query, "墨");
        assert_eq!(state.selected_colors, vec!["red", "blue"]);
        assert_eq!(state.selected_price_ranges, vec!["0-50000"]);
        assert_eq!(state.sort_key, SortKey::PriceDesc);
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn test_query_string_repeated_keys() {
        let state = QueryState::from_query_string(
            "colors=red&colors=blue&sizes=S&sizes=L,XL&sort=price_asc&page=2",
        );
        assert_eq!(state.selected_colors, vec!["red", "blue"]);
        assert_eq!(state.selected_sizes, vec!["S", "L", "XL"]);
        assert_eq!(state.sort_key, SortKey::PriceAsc);
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn test_query_string_unknown_keys_ignored() {
        let state = QueryState::from_query_string("utm_source=mail&q=tokyo&q=kyoto&page=4");
        assert_eq!(state.search_query, "kyoto");
        assert_eq!(state.current_page, 4);
    }

    #[test]
    fn test_query_string_lenient() {
        let state = QueryState::from_query_string("sort=bogus&page=two&colors=,,");
        assert_eq!(state.sort_key, SortKey::Recommended);
        assert_eq!(state.current_page, 1);
        assert!(state.selected_colors.is_empty());
    }

    #[test]
    fn test_active_rules_reported() {
        let state = QueryState {
            selected_techniques: vec!["oil".into()],
            selected_styles: vec!["abstract".into()],
            ..Default::default()
        };
        let criteria = Criteria::from_state(&state, &facets());
        assert_eq!(Filter::new().active_rules(&criteria), vec!["techniques", "styles"]);
    }
}
