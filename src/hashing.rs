//! Hashing - SHA-256 Fingerprints
//!
//! Stable identifiers for rendered labels and query results, usable as
//! cache keys or ETags.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::criteria::QueryState;
use crate::label::ReturnShipmentRecord;
use crate::print::LabelLayout;

/// Lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compact JSON with object keys in byte order at every depth.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&canonicalize(serde_json::to_value(value)?))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, inner)| (key, canonicalize(inner)))
                .collect();
            Value::Object(ordered.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        scalar => scalar,
    }
}

/// label_fingerprint = sha256("label" + canonical shipment + canonical layout + engine version)
///
/// Equal fingerprints imply byte-identical rendered documents.
pub fn label_fingerprint(
    shipment: &ReturnShipmentRecord,
    layout: &LabelLayout,
) -> Result<String, serde_json::Error> {
    let combined = format!(
        "label:{}:{}:{}",
        canonical_json(shipment)?,
        canonical_json(layout)?,
        crate::ENGINE_VERSION
    );
    Ok(sha256_hex(combined.as_bytes()))
}

/// query_fingerprint = sha256("query" + canonical state + page size)
pub fn query_fingerprint(state: &QueryState, page_size: usize) -> Result<String, serde_json::Error> {
    let combined = format!("query:{}:{}", canonical_json(state)?, page_size);
    Ok(sha256_hex(combined.as_bytes()))
}
