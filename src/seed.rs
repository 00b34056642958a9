//! Built-in listings used until a catalog file is supplied.

use chrono::NaiveDate;

use crate::catalog::{ArtworkRecord, SizeClass};

fn listed(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn artwork(
    id: &str,
    title: &str,
    artist_name: &str,
    price: u64,
    colors: &[&str],
    size: SizeClass,
    technique: &str,
    styles: &[&str],
    listed_at: NaiveDate,
) -> ArtworkRecord {
    ArtworkRecord {
        id: id.to_string(),
        title: title.to_string(),
        artist_name: artist_name.to_string(),
        price,
        colors: colors.iter().map(|c| c.to_string()).collect(),
        size,
        technique: technique.to_string(),
        styles: styles.iter().map(|s| s.to_string()).collect(),
        listed_at,
        image_url: Some(format!("/images/artworks/{id}.jpg")),
    }
}

pub(crate) fn artworks() -> Vec<ArtworkRecord> {
    vec![
        artwork("mgj-001", "都市の夜明け", "山田 太郎", 50_000, &["blue", "gold"], SizeClass::L, "oil", &["abstract", "landscape"], listed(2024, 1, 12)),
        artwork("mgj-002", "静寂の森", "鈴木 花子", 35_000, &["green"], SizeClass::M, "watercolor", &["landscape"], listed(2024, 2, 3)),
        artwork("mgj-003", "Red Rhythm", "Kenji Mori", 120_000, &["red", "black"], SizeClass::XL, "acrylic", &["abstract", "pop"], listed(2024, 2, 20)),
        artwork("mgj-004", "港の記憶", "佐藤 健", 50_000, &["blue", "white"], SizeClass::M, "photography", &["landscape", "minimal"], listed(2024, 3, 8)),
        artwork("mgj-005", "墨の呼吸", "高橋 雪", 88_000, &["black", "white", "monochrome"], SizeClass::L, "sumi_e", &["traditional", "minimal"], listed(2024, 3, 8)),
        artwork("mgj-006", "Lemon Still Life", "Aiko Tanaka", 28_000, &["yellow", "green"], SizeClass::S, "oil", &["still_life"], listed(2024, 4, 1)),
        artwork("mgj-007", "光の断片", "伊藤 光", 310_000, &["gold", "white"], SizeClass::XL, "mixed_media", &["abstract"], listed(2024, 4, 18)),
        artwork("mgj-008", "渋谷ポートレート", "中村 蓮", 64_000, &["red", "blue"], SizeClass::M, "photography", &["portrait", "pop"], listed(2024, 5, 2)),
        artwork("mgj-009", "Quiet Geometry", "Mika Ono", 95_000, &["white", "black"], SizeClass::L, "print", &["minimal", "abstract"], listed(2024, 5, 27)),
        artwork("mgj-010", "海辺の午後", "小林 渚", 45_000, &["blue", "yellow"], SizeClass::S, "watercolor", &["landscape"], listed(2024, 6, 14)),
        artwork("mgj-011", "紅葉図", "加藤 楓", 180_000, &["red", "gold"], SizeClass::L, "sumi_e", &["traditional", "landscape"], listed(2024, 7, 9)),
        artwork("mgj-012", "Monochrome Tokyo", "Ren Watanabe", 72_000, &["monochrome", "black"], SizeClass::M, "photography", &["minimal"], listed(2024, 7, 30)),
    ]
}
