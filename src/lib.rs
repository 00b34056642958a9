//! Micro Gallery Japan Core - Listing Queries and Return Labels
//!
//! # Ground Rules
//! 1. Queries Are Pure (input slice in, new vector out)
//! 2. Empty Facets Constrain Nothing
//! 3. Sorting Is Stable
//! 4. Pages Clamp, Never Fail
//! 5. Labels Are Deterministic and Escaped
//! 6. Printing Is a Separate Side Effect

pub mod catalog;
pub mod facets;
pub mod criteria;
pub mod query;
pub mod label;
pub mod print;
pub mod hashing;
pub mod config;
mod seed;

pub use catalog::{ArtworkRecord, Catalog, CatalogError, SizeClass};
pub use facets::{FacetCatalog, FacetOption, PriceRange};
pub use criteria::{Criteria, Filter, FacetRule, QueryParams, QueryState};
pub use query::{filter, paginate, sort, Page, QueryPipeline, SortKey};
pub use label::{render, render_with, Party, ReturnShipmentRecord, ShippingType};
pub use print::{BrowserTarget, FileTarget, LabelLayout, PaperSize, PrintError, PrintTarget};
pub use hashing::{canonical_json, label_fingerprint, query_fingerprint};
pub use config::{ConfigError, GalleryConfig};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
