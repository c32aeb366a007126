//! Loading the server-side product snapshot (`data/current-products.json`).

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AuditError, Result};
use crate::product::{PLACEHOLDER_TITLE, Product, is_super_deal};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    discount_rate: Option<f64>,
    #[serde(default)]
    is_rocket: Option<bool>,
    #[serde(default)]
    is_super_deal: Option<bool>,
    #[serde(default)]
    is_electronic: Option<bool>,
}

impl SnapshotEntry {
    fn into_product(self) -> Option<Product> {
        if self.id.is_empty() {
            return None;
        }
        let discount_rate = whole_percent(self.discount_rate.unwrap_or(0.0))?;

        Some(Product {
            is_super_deal: self
                .is_super_deal
                .unwrap_or_else(|| is_super_deal(discount_rate)),
            id: self.id,
            title: self.title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            discount_rate,
            is_fast_shipping: self.is_rocket.unwrap_or(false),
            is_electronics: self.is_electronic.unwrap_or(false),
        })
    }
}

/// `55` and `55.0` both read as 55; fractions and values outside 0-100 do not.
fn whole_percent(rate: f64) -> Option<u8> {
    if rate.fract() != 0.0 || !(0.0..=100.0).contains(&rate) {
        return None;
    }
    Some(rate as u8)
}

/// Parses snapshot JSON. The root must be an array. Absent or `null` fields
/// take their defaults; entries without an id, with a field of the wrong
/// type, or with a discount that is not a whole number in 0-100 are dropped.
pub fn parse_snapshot(json: &str) -> Result<Vec<Product>> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Array(entries) = root else {
        return Err(AuditError::DataFormat(format!(
            "snapshot root must be a JSON array, found {}",
            kind_of(&root)
        )));
    };

    let total = entries.len();
    let products: Vec<Product> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let product = serde_json::from_value::<SnapshotEntry>(entry)
                .ok()
                .and_then(SnapshotEntry::into_product);
            if product.is_none() {
                log::warn!("dropping snapshot entry #{index}: not a valid product record");
            }
            product
        })
        .collect();

    log::debug!("loaded {} of {} snapshot entries", products.len(), total);
    Ok(products)
}

pub fn load_snapshot(path: &Path) -> Result<Vec<Product>> {
    let json = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
    parse_snapshot(&json)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_entry() {
        let json = r#"[{"id":"1_1","title":"TV","discountRate":50,"isRocket":true,"isSuperDeal":true,"isElectronic":true}]"#;
        let products = parse_snapshot(json).unwrap();
        assert_eq!(
            products,
            vec![Product {
                id: "1_1".into(),
                title: "TV".into(),
                discount_rate: 50,
                is_fast_shipping: true,
                is_super_deal: true,
                is_electronics: true,
            }]
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let products = parse_snapshot(r#"[{"id":"2_2"}]"#).unwrap();
        let p = &products[0];
        assert_eq!(p.discount_rate, 0);
        assert_eq!(p.title, PLACEHOLDER_TITLE);
        assert!(!p.is_fast_shipping && !p.is_super_deal && !p.is_electronics);
    }

    #[test]
    fn test_super_deal_flag_derived_when_absent() {
        let json = r#"[
            {"id":"a","discountRate":49},
            {"id":"b","discountRate":70,"isSuperDeal":false}
        ]"#;
        let products = parse_snapshot(json).unwrap();
        assert!(products[0].is_super_deal);
        assert!(!products[1].is_super_deal);
    }

    #[test]
    fn test_null_flags_and_integral_float_rate_are_kept() {
        let json = r#"[
            {"id":"1_1","isRocket":null,"discountRate":30},
            {"id":"2_2","discountRate":55.0,"isRocket":true},
            {"id":"3_3","isElectronic":null,"isSuperDeal":null,"discountRate":null},
            {"id":"4_4","title":null,"discountRate":10,"isRocket":false,"isElectronic":true}
        ]"#;
        let products = parse_snapshot(json).unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1_1", "2_2", "3_3", "4_4"]);

        assert!(!products[0].is_fast_shipping);
        assert_eq!(products[1].discount_rate, 55);
        assert!(products[1].is_super_deal);
        assert!(!products[2].is_electronics);
        assert!(!products[2].is_super_deal);
        assert_eq!(products[2].discount_rate, 0);
        assert_eq!(products[3].title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_fractional_rate_is_dropped() {
        let products = parse_snapshot(r#"[{"id":"1_1","discountRate":55.5}]"#).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_invalid_entries_are_dropped() {
        let json = r#"[
            {"id":"ok"},
            {"title":"no id"},
            {"id":""},
            {"id":"neg","discountRate":-5},
            {"id":"big","discountRate":140},
            {"id":"typed","isRocket":"yes"},
            42
        ]"#;
        let products = parse_snapshot(json).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "ok");
    }

    #[test]
    fn test_non_array_root_is_data_format_error() {
        let err = parse_snapshot(r#"{"products":[]}"#).unwrap_err();
        assert!(matches!(err, AuditError::DataFormat(msg) if msg.contains("an object")));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(parse_snapshot("[{"), Err(AuditError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_snapshot(Path::new("/nonexistent/current-products.json")).unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
