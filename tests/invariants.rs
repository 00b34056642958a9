//! Contract Invariant Tests
//!
//! Listing queries and return labels, exercised through the public API.

use std::cell::RefCell;
use std::path::PathBuf;

use chrono::NaiveDate;
use microgallery_core::{
    catalog::{ArtworkRecord, Catalog, SizeClass},
    criteria::{Criteria, QueryState},
    facets::FacetCatalog,
    label::{render, render_with, Party, ReturnShipmentRecord, ShippingType},
    print::{LabelLayout, PaperSize, PrintError, PrintTarget},
    query::{filter, paginate, sort, QueryPipeline, SortKey},
};

fn record(id: &str, price: u64) -> ArtworkRecord {
    ArtworkRecord {
        id: id.to_string(),
        title: format!("Work {id}"),
        artist_name: "Test Artist".to_string(),
        price,
        colors: vec!["blue".to_string()],
        size: SizeClass::M,
        technique: "oil".to_string(),
        styles: vec!["abstract".to_string()],
        listed_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        image_url: None,
    }
}

fn ids(records: &[ArtworkRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

fn shipment() -> ReturnShipmentRecord {
    ReturnShipmentRecord {
        return_id: "RET-2024-0042".to_string(),
        artwork_id: "mgj-005".to_string(),
        rental_start_date: "2024年4月1日".to_string(),
        rental_end_date: "2024年9月30日".to_string(),
        shipping_type: ShippingType::CashOnDelivery,
        corporate: Party {
            name: "株式会社サンプル商事".to_string(),
            address: "東京都千代田区丸の内1-1-1".to_string(),
            phone: "03-1234-5678".to_string(),
        },
        artist: Party {
            name: "高橋 雪".to_string(),
            address: "京都府京都市左京区2-3-4".to_string(),
            phone: "075-987-6543".to_string(),
        },
        barcode: Some("4901234567894".to_string()),
    }
}

fn state(query: &str) -> QueryState {
    QueryState::from_query_string(query)
}

#[test]
fn invariant_price_sort_is_stable() {
    let records = vec![record("1", 50_000), record("2", 90_000), record("3", 50_000)];

    assert_eq!(ids(&sort(&records, SortKey::PriceAsc)), vec!["1", "3", "2"]);
    assert_eq!(ids(&sort(&records, SortKey::PriceDesc)), vec!["2", "1", "3"]);
    assert_eq!(ids(&sort(&records, SortKey::Recommended)), vec!["1", "2", "3"]);
}

#[test]
fn invariant_paginate_last_partial_page() {
    let records = vec![record("1", 1), record("2", 2), record("3", 3)];

    let page = paginate(&records, 2, 2);
    assert_eq!(ids(&page.items), vec!["3"]);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_items, 3);
}

#[test]
fn invariant_paginate_clamps() {
    let records = vec![record("1", 1), record("2", 2), record("3", 3)];

    assert_eq!(paginate(&records, 2, 0), paginate(&records, 2, 1));
    assert_eq!(paginate(&records, 2, 7), paginate(&records, 2, 2));
}

#[test]
fn invariant_empty_criteria_keeps_everything() {
    let catalog = Catalog::seeded();
    let criteria = Criteria::from_state(&QueryState::default(), &FacetCatalog::canonical());

    assert_eq!(filter(catalog.list(), &criteria), catalog.list().to_vec());
}

#[test]
fn invariant_filter_preserves_input_order() {
    let pipeline = QueryPipeline::default().with_page_size(100);
    let page = pipeline.run(&state("colors=blue,red"));

    assert_eq!(
        ids(&page.items),
        vec!["mgj-001", "mgj-003", "mgj-004", "mgj-008", "mgj-010", "mgj-011"]
    );
}

#[test]
fn invariant_facets_and_across_or_within() {
    let pipeline = QueryPipeline::default();

    let page = pipeline.run(&state("colors=red&priceRanges=50000-100000"));
    assert_eq!(ids(&page.items), vec!["mgj-008"]);

    let page = pipeline.run(&state("colors=red&priceRanges=50000-100000,100000-300000"));
    assert_eq!(ids(&page.items), vec!["mgj-003", "mgj-008", "mgj-011"]);
}

#[test]
fn invariant_search_is_case_insensitive() {
    let pipeline = QueryPipeline::default();

    assert_eq!(ids(&pipeline.run(&state("q=MONOCHROME")).items), vec!["mgj-012"]);
    assert_eq!(ids(&pipeline.run(&state("q=%E5%A2%A8")).items), vec!["mgj-005"]);
    // style tags are searched too
    assert_eq!(pipeline.run(&state("q=still_life")).total_items, 1);
}

#[test]
fn invariant_malformed_selections_ignored() {
    let pipeline = QueryPipeline::default();
    let all = pipeline.run(&QueryState::default());

    let page = pipeline.run(&state("priceRanges=cheap,9-1&sizes=XXL&techniques=fresco&sort=hot"));
    assert_eq!(page, all);
}

#[test]
fn invariant_newest_first_ties_keep_order() {
    let pipeline = QueryPipeline::default().with_page_size(100);
    let page = pipeline.run(&state("sort=newest"));
    let order = ids(&page.items);

    assert_eq!(order.first(), Some(&"mgj-012"));
    let pos = |id: &str| order.iter().position(|o| *o == id).unwrap();
    assert!(pos("mgj-004") < pos("mgj-005"));
}

#[test]
fn invariant_catalog_file_feeds_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let json = serde_json::json!({
        "schemaVersion": "1.0.0",
        "artworks": [record("x-1", 10_000), record("x-2", 20_000)],
    });
    std::fs::write(&path, json.to_string()).unwrap();

    let catalog = Catalog::load_from_file(&path).unwrap();
    let pipeline = QueryPipeline::new(catalog, FacetCatalog::canonical());
    let page = pipeline.run(&state("sort=price_desc"));
    assert_eq!(ids(&page.items), vec!["x-2", "x-1"]);
}

#[test]
fn invariant_label_cash_on_delivery_badge() {
    let html = render(&shipment());

    assert!(html.contains("着払い"));
    assert!(!html.contains("元払い"));
}

#[test]
fn invariant_label_prepaid_badge() {
    let html = render(&ReturnShipmentRecord {
        shipping_type: ShippingType::Prepaid,
        ..shipment()
    });

    assert!(html.contains("元払い"));
    assert!(!html.contains("着払い"));
}

#[test]
fn invariant_label_contains_every_field() {
    let s = shipment();
    let html = render(&s);

    for field in [
        &s.return_id,
        &s.artwork_id,
        &s.rental_start_date,
        &s.rental_end_date,
        &s.corporate.name,
        &s.corporate.address,
        &s.corporate.phone,
        &s.artist.name,
        &s.artist.address,
        &s.artist.phone,
    ] {
        assert!(html.contains(field.as_str()), "missing {field}");
    }
    assert!(html.contains("4901234567894"));
}

#[test]
fn invariant_label_is_standalone_and_printable() {
    let html = render(&shipment());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<style>"));
    assert!(html.contains("@media print"));
    assert!(html.contains(".no-print { display: none !important; }"));
    assert!(!html.contains("<link"));
    assert!(!html.contains("<script"));
}

#[test]
fn invariant_label_deterministic() {
    assert_eq!(render(&shipment()), render(&shipment()));
}

#[test]
fn invariant_label_paper_size() {
    let html = render_with(&shipment(), &LabelLayout::for_paper(PaperSize::Label100x150));
    assert!(html.contains("size: 100mm 150mm"));
}

#[test]
fn invariant_label_from_sparse_json() {
    let s: ReturnShipmentRecord =
        serde_json::from_str(r#"{"returnId": "RET-9", "shippingType": "overnight"}"#).unwrap();
    assert_eq!(s.shipping_type, ShippingType::Prepaid);

    let html = render(&s);
    assert!(html.contains("RET-9"));
    assert!(html.contains("MGJ-0000-0000"));
}

struct RecordingTarget {
    documents: RefCell<Vec<String>>,
}

impl PrintTarget for RecordingTarget {
    fn deliver(&self, html: &str) -> Result<PathBuf, PrintError> {
        self.documents.borrow_mut().push(html.to_string());
        Ok(PathBuf::from("memory"))
    }
}

#[test]
fn invariant_print_side_effect_is_separate() {
    let target = RecordingTarget { documents: RefCell::new(vec![]) };
    let html = render(&shipment());

    target.deliver(&html).unwrap();
    assert_eq!(target.documents.borrow().as_slice(), &[html]);
}

#[test]
fn invariant_label_from_json_with_nulls() {
    let s: ReturnShipmentRecord = serde_json::from_str(
        r#"{
            "returnId": "RET-10",
            "artworkId": null,
            "rentalStartDate": null,
            "shippingType": null,
            "corporate": {"name": "株式会社サンプル商事", "phone": null},
            "artist": null
        }"#,
    )
    .unwrap();

    let html = render(&s);
    assert!(html.contains("RET-10"));
    assert!(html.contains("株式会社サンプル商事"));
    assert!(html.contains("元払い"));
    assert!(html.contains("MGJ-0000-0000"));
}

#[test]
fn invariant_label_markup_characters_escaped() {
    let html = render(&ReturnShipmentRecord {
        corporate: Party {
            name: r#"Tom & Jerry <Art> "Lease""#.to_string(),
            ..Party::default()
        },
        artwork_id: "a<b>&c".to_string(),
        ..shipment()
    });

    assert!(html.contains("Tom &amp; Jerry &lt;Art&gt; &quot;Lease&quot;"));
    assert!(html.contains("a&lt;b&gt;&amp;c"));
    assert!(!html.contains("<Art>"));
    assert!(!html.contains("a<b>"));
}
