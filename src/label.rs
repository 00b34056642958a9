//! Return Shipping Label
//!
//! Produces a standalone HTML document for the browser print dialog.
//! Output depends only on the shipment and layout: no clock, no randomness.
//! Every interpolated field goes through maud's escaping.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::{Deserialize, Deserializer, Serialize};

use crate::print::LabelLayout;

/// Printed when the shipment carries no barcode.
pub const BARCODE_PLACEHOLDER: &str = "MGJ-0000-0000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingType {
    /// Recipient pays on arrival.
    CashOnDelivery,
    #[default]
    Prepaid,
}

impl ShippingType {
    /// Anything but `cash_on_delivery` is prepaid.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "cash_on_delivery" => ShippingType::CashOnDelivery,
            _ => ShippingType::Prepaid,
        }
    }

    pub fn badge_text(&self) -> &'static str {
        match self {
            ShippingType::CashOnDelivery => "着払い",
            ShippingType::Prepaid => "元払い",
        }
    }

    fn badge_class(&self) -> &'static str {
        match self {
            ShippingType::CashOnDelivery => "badge badge-cod",
            ShippingType::Prepaid => "badge badge-prepaid",
        }
    }
}

impl<'de> Deserialize<'de> for ShippingType {
    /// Accepts any JSON value; non-strings (including `null`) are prepaid.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map_or(ShippingType::Prepaid, Self::from_tag))
    }
}

/// `null` decodes as the type's default, same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReturnShipmentRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub return_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artwork_id: String,
    /// Display strings, printed as given.
    #[serde(deserialize_with = "null_as_default")]
    pub rental_start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rental_end_date: String,
    pub shipping_type: ShippingType,
    /// Sender: the host company returning the work.
    #[serde(deserialize_with = "null_as_default")]
    pub corporate: Party,
    /// Recipient: the artist.
    #[serde(deserialize_with = "null_as_default")]
    pub artist: Party,
    pub barcode: Option<String>,
}

impl ReturnShipmentRecord {
    pub fn barcode_value(&self) -> &str {
        self.barcode
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(BARCODE_PLACEHOLDER)
    }

    /// Required fields left blank. The label still renders; callers may warn.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields: [(&'static str, &str); 10] = [
            ("returnId", &self.return_id),
            ("artworkId", &self.artwork_id),
            ("rentalStartDate", &self.rental_start_date),
            ("rentalEndDate", &self.rental_end_date),
            ("corporate.name", &self.corporate.name),
            ("corporate.address", &self.corporate.address),
            ("corporate.phone", &self.corporate.phone),
            ("artist.name", &self.artist.name),
            ("artist.address", &self.artist.address),
            ("artist.phone", &self.artist.phone),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// One stripe of the decorative barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub width_px: u8,
    pub dark: bool,
}

/// Visual stripe pattern derived from the barcode text. Not scannable.
pub fn barcode_bars(value: &str) -> Vec<Bar> {
    let guard = [
        Bar { width_px: 2, dark: true },
        Bar { width_px: 1, dark: false },
        Bar { width_px: 2, dark: true },
    ];

    let mut bars = guard.to_vec();
    for byte in value.bytes() {
        bars.push(Bar { width_px: 1 + byte % 3, dark: false });
        bars.push(Bar { width_px: 1 + (byte / 3) % 4, dark: true });
    }
    bars.push(Bar { width_px: 1, dark: false });
    bars.extend_from_slice(&guard);
    bars
}

/// Render on the default A4 layout.
pub fn render(shipment: &ReturnShipmentRecord) -> String {
    render_with(shipment, &LabelLayout::default())
}

pub fn render_with(shipment: &ReturnShipmentRecord, layout: &LabelLayout) -> String {
    document(shipment, layout).into_string()
}

fn document(shipment: &ReturnShipmentRecord, layout: &LabelLayout) -> Markup {
    let barcode = shipment.barcode_value();

    html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="utf-8";
                title { "返却ラベル " (shipment.return_id) }
                style { (PreEscaped(stylesheet(layout))) }
            }
            body {
                div.no-print.instructions {
                    p { "このラベルを印刷し、梱包した作品の外箱に貼り付けてください。" }
                    button type="button" onclick="window.print()" { "印刷する" }
                }
                div.label {
                    div.label-header {
                        span.brand { "Micro Gallery Japan" }
                        span class=(shipment.shipping_type.badge_class()) {
                            (shipment.shipping_type.badge_text())
                        }
                    }
                    (party_block("お届け先", "to", &shipment.artist))
                    (party_block("ご依頼主", "from", &shipment.corporate))
                    table.meta {
                        tr { th { "返却ID" } td { (shipment.return_id) } }
                        tr { th { "作品ID" } td { (shipment.artwork_id) } }
                        tr {
                            th { "レンタル期間" }
                            td { (shipment.rental_start_date) " 〜 " (shipment.rental_end_date) }
                        }
                    }
                    div.barcode {
                        div.bars {
                            @for bar in barcode_bars(barcode) {
                                span class=(if bar.dark { "bar dark" } else { "bar" })
                                    style=(format!("width:{}px", bar.width_px)) {}
                            }
                        }
                        div.barcode-text { (barcode) }
                    }
                }
            }
        }
    }
}

fn party_block(heading: &str, class: &str, party: &Party) -> Markup {
    html! {
        section class=(format!("party party-{class}")) {
            h2 { (heading) }
            p.name { (party.name) " 様" }
            p.address { (party.address) }
            p.phone { "TEL: " (party.phone) }
        }
    }
}

fn stylesheet(layout: &LabelLayout) -> String {
    let (width_mm, _) = layout.paper.dimensions_mm();
    let label_width = width_mm.saturating_sub(layout.margin_mm * 2);
    format!(
        "@page {{ size: {page}; margin: {margin}mm; }}\n\
         * {{ box-sizing: border-box; }}\n\
         body {{ margin: 0; padding: 16px; background: #f3f4f6; color: #111827; \
         font-family: 'Hiragino Kaku Gothic ProN', 'Noto Sans JP', sans-serif; }}\n\
         .instructions {{ max-width: {label_width}mm; margin: 0 auto 12px; padding: 12px; \
         background: #fff7ed; border: 1px solid #fdba74; border-radius: 6px; font-size: 14px; }}\n\
         .label {{ width: {label_width}mm; margin: 0 auto; padding: 6mm; background: #fff; \
         border: 2px solid #111827; }}\n\
         .label-header {{ display: flex; justify-content: space-between; align-items: center; \
         border-bottom: 2px solid #111827; padding-bottom: 3mm; }}\n\
         .brand {{ font-weight: 700; letter-spacing: 0.05em; }}\n\
         .badge {{ padding: 1mm 4mm; font-weight: 700; font-size: 18px; border: 2px solid; }}\n\
         .badge-cod {{ color: #b91c1c; border-color: #b91c1c; }}\n\
         .badge-prepaid {{ color: #1d4ed8; border-color: #1d4ed8; }}\n\
         .party {{ padding: 3mm 0; border-bottom: 1px dashed #9ca3af; }}\n\
         .party h2 {{ margin: 0 0 1mm; font-size: 12px; color: #4b5563; }}\n\
         .party p {{ margin: 0.5mm 0; }}\n\
         .party-to .name {{ font-size: 20px; font-weight: 700; }}\n\
         .meta {{ width: 100%; margin: 3mm 0; border-collapse: collapse; font-size: 13px; }}\n\
         .meta th {{ width: 30%; text-align: left; color: #4b5563; font-weight: 400; }}\n\
         .barcode {{ text-align: center; padding-top: 2mm; }}\n\
         .bars {{ display: flex; justify-content: center; height: 14mm; }}\n\
         .bar {{ display: inline-block; height: 100%; background: #fff; }}\n\
         .bar.dark {{ background: #000; }}\n\
         .barcode-text {{ font-family: monospace; letter-spacing: 0.2em; margin-top: 1mm; }}\n\
         @media print {{\n\
         .no-print {{ display: none !important; }}\n\
         body {{ padding: 0; background: #fff; }}\n\
         .label {{ margin: 0; }}\n\
         .bar, .bar.dark {{ -webkit-print-color-adjust: exact; print-color-adjust: exact; }}\n\
         }}\n",
        page = layout.paper.css_page_size(),
        margin = layout.margin_mm,
    )
}
