//! Facet Vocabulary - One Canonical Definition
//!
//! Every page filters against the same colors, sizes, techniques, styles and
//! price breakpoints. Values outside this vocabulary are dropped during
//! normalization and never reach the filter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::SizeClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

impl FacetOption {
    fn new(value: &str, label: &str) -> Self {
        Self { value: value.to_string(), label: label.to_string() }
    }
}

/// Half-open yen interval `[min, max)`; `max == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceRange {
    /// Parses `"lo-hi"` (lo < hi) or `"lo+"`. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(lo) = raw.strip_suffix('+') {
            let min = lo.trim().parse().ok()?;
            return Some(Self { min, max: None });
        }
        let (lo, hi) = raw.split_once('-')?;
        let min: u64 = lo.trim().parse().ok()?;
        let max: u64 = hi.trim().parse().ok()?;
        if min >= max {
            return None;
        }
        Some(Self { min, max: Some(max) })
    }

    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price < max)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCatalog {
    pub colors: Vec<FacetOption>,
    pub sizes: Vec<FacetOption>,
    pub techniques: Vec<FacetOption>,
    pub styles: Vec<FacetOption>,
    pub price_ranges: Vec<FacetOption>,
}

impl FacetCatalog {
    pub fn canonical() -> Self {
        Self {
            colors: vec![
                FacetOption::new("red", "赤"),
                FacetOption::new("blue", "青"),
                FacetOption::new("green", "緑"),
                FacetOption::new("yellow", "黄"),
                FacetOption::new("black", "黒"),
                FacetOption::new("white", "白"),
                FacetOption::new("monochrome", "モノクロ"),
                FacetOption::new("gold", "金"),
            ],
            sizes: vec![
                FacetOption::new(SizeClass::S.as_str(), "S (〜30cm)"),
                FacetOption::new(SizeClass::M.as_str(), "M (30〜60cm)"),
                FacetOption::new(SizeClass::L.as_str(), "L (60〜100cm)"),
                FacetOption::new(SizeClass::XL.as_str(), "XL (100cm〜)"),
            ],
            techniques: vec![
                FacetOption::new("oil", "油彩"),
                FacetOption::new("acrylic", "アクリル"),
                FacetOption::new("watercolor", "水彩"),
                FacetOption::new("photography", "写真"),
                FacetOption::new("print", "版画"),
                FacetOption::new("mixed_media", "ミクストメディア"),
                FacetOption::new("sumi_e", "墨絵"),
            ],
            styles: vec![
                FacetOption::new("abstract", "抽象"),
                FacetOption::new("landscape", "風景"),
                FacetOption::new("portrait", "人物"),
                FacetOption::new("still_life", "静物"),
                FacetOption::new("pop", "ポップ"),
                FacetOption::new("minimal", "ミニマル"),
                FacetOption::new("traditional", "伝統"),
            ],
            price_ranges: vec![
                FacetOption::new("0-50000", "〜5万円"),
                FacetOption::new("50000-100000", "5万〜10万円"),
                FacetOption::new("100000-300000", "10万〜30万円"),
                FacetOption::new("300000+", "30万円〜"),
            ],
        }
    }

    pub fn is_color(&self, value: &str) -> bool {
        contains_value(&self.colors, value)
    }

    pub fn is_size(&self, value: &str) -> bool {
        contains_value(&self.sizes, value)
    }

    pub fn is_technique(&self, value: &str) -> bool {
        contains_value(&self.techniques, value)
    }

    pub fn is_style(&self, value: &str) -> bool {
        contains_value(&self.styles, value)
    }
}

impl Default for FacetCatalog {
    fn default() -> Self {
        Self::canonical()
    }
}

fn contains_value(options: &[FacetOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}
