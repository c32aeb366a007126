//! The product record shared by the HTML extractor and the snapshot loader.

/// Discount rate at or above which a product counts as a super deal.
pub const SUPER_DEAL_THRESHOLD: u8 = 49;

/// Title used when a listing carries no image `alt` text.
pub const PLACEHOLDER_TITLE: &str = "(no title)";

/// One listed item at a point in time.
///
/// Two records describe the same listing iff their `id` strings are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub discount_rate: u8,
    pub is_fast_shipping: bool,
    pub is_super_deal: bool,
    pub is_electronics: bool,
}

impl Product {
    /// Builds a record scraped from a listing page. `is_super_deal` is derived
    /// from the discount rate; pages carry no electronics flag.
    pub fn scraped(id: String, title: String, discount_rate: u8, is_fast_shipping: bool) -> Self {
        Product {
            id,
            title,
            discount_rate,
            is_fast_shipping,
            is_super_deal: is_super_deal(discount_rate),
            is_electronics: false,
        }
    }
}

pub fn is_super_deal(discount_rate: u8) -> bool {
    discount_rate >= SUPER_DEAL_THRESHOLD
}

/// Joins the two numeric query parameters into the listing key.
pub fn listing_id(product_id: &str, item_id: &str) -> String {
    format!("{}_{}", product_id, item_id)
}
