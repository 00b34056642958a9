//! Artwork Catalog - Read-Only Listing Data
//!
//! The catalog is the seam where a persistent store would plug in. Queries only
//! ever see an immutable slice of records in listing order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub type ArtworkId = String;

/// Catalog files must declare a schema inside this range.
pub const CATALOG_SCHEMA_REQ: &str = ">=1.0.0, <2.0.0";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported catalog schema {0} (requires {1})")]
    SchemaMismatch(String, String),

    #[error("Invalid catalog schema version: {0}")]
    InvalidSchemaVersion(String),

    #[error("Duplicate artwork id: {0}")]
    DuplicateId(ArtworkId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkRecord {
    pub id: ArtworkId,
    pub title: String,
    pub artist_name: String,
    /// Monthly lease price in whole yen.
    pub price: u64,
    #[serde(default)]
    pub colors: Vec<String>,
    pub size: SizeClass,
    pub technique: String,
    #[serde(default)]
    pub styles: Vec<String>,
    pub listed_at: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Physical size bucket, measured on the longest edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    S,
    M,
    L,
    XL,
}

impl SizeClass {
    pub const ALL: [SizeClass; 4] = [SizeClass::S, SizeClass::M, SizeClass::L, SizeClass::XL];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::S => "S",
            SizeClass::M => "M",
            SizeClass::L => "L",
            SizeClass::XL => "XL",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(tag.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    schema_version: String,
    artworks: Vec<ArtworkRecord>,
}

/// Ordered artwork registry. Insertion order is the "recommended" order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    artworks: Vec<ArtworkRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { artworks: Vec::new() }
    }

    /// Catalog preloaded with the built-in listings.
    pub fn seeded() -> Self {
        Self { artworks: crate::seed::artworks() }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(path.display().to_string(), e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        check_schema_version(&file.schema_version)?;

        let mut catalog = Self::new();
        for artwork in file.artworks {
            catalog.register(artwork)?;
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&ArtworkRecord> {
        self.artworks.iter().find(|a| a.id == id)
    }

    pub fn list(&self) -> &[ArtworkRecord] {
        &self.artworks
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    pub fn register(&mut self, artwork: ArtworkRecord) -> Result<(), CatalogError> {
        if self.get(&artwork.id).is_some() {
            return Err(CatalogError::DuplicateId(artwork.id));
        }
        self.artworks.push(artwork);
        Ok(())
    }
}

fn check_schema_version(declared: &str) -> Result<(), CatalogError> {
    let version = semver::Version::parse(declared)
        .map_err(|_| CatalogError::InvalidSchemaVersion(declared.to_string()))?;
    let req = semver::VersionReq::parse(CATALOG_SCHEMA_REQ)
        .map_err(|_| CatalogError::InvalidSchemaVersion(CATALOG_SCHEMA_REQ.to_string()))?;

    if !req.matches(&version) {
        return Err(CatalogError::SchemaMismatch(
            declared.to_string(),
            CATALOG_SCHEMA_REQ.to_string(),
        ));
    }
    Ok(())
}
