//! Listing-page extraction for fallcent.com.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::product::{PLACEHOLDER_TITLE, Product, listing_id};

mod selectors {
    use super::*;

    pub static CONTAINER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.small_product_div").unwrap());

    pub static FAST_SHIPPING_BADGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img[src*='web_rocket_icon']").unwrap());

    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

    pub static TITLED_IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img[alt]").unwrap());
}

static LISTING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"product_id=(\d+)&item_id=(\d+)").unwrap());

static PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)%").unwrap());

/// Which containers yield records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Every container with a parsable listing link.
    #[default]
    All,
    /// Only containers carrying the fast-shipping badge.
    FastShippingOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    /// Product containers seen on the page, whether or not they produced a record.
    pub containers: usize,
    /// Records in document order, not deduplicated.
    pub products: Vec<Product>,
}

/// Parses one listing page into product records.
///
/// Never fails: a container missing its link, ID parameters or carrying a
/// nonsensical discount is skipped and the pass continues.
pub fn extract_products(html: &str, mode: ExtractMode) -> Extraction {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for container in document.select(&selectors::CONTAINER) {
        extraction.containers += 1;

        let is_fast_shipping = container
            .select(&selectors::FAST_SHIPPING_BADGE)
            .next()
            .is_some();
        if mode == ExtractMode::FastShippingOnly && !is_fast_shipping {
            continue;
        }

        match extract_container(container, is_fast_shipping) {
            Some(product) => extraction.products.push(product),
            None => log::debug!(
                "skipping product container #{} without a usable listing",
                extraction.containers
            ),
        }
    }

    extraction
}

fn extract_container(container: ElementRef<'_>, is_fast_shipping: bool) -> Option<Product> {
    let href = container
        .select(&selectors::LINK)
        .next()?
        .value()
        .attr("href")?;
    let id = parse_listing_id(href)?;

    let title = container
        .select(&selectors::TITLED_IMAGE)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .unwrap_or(PLACEHOLDER_TITLE)
        .to_string();

    let discount_rate = match first_percentage(container) {
        Some(Some(rate)) => rate,
        Some(None) => {
            log::warn!("listing {id} has a discount outside 0-100%, dropping it");
            return None;
        }
        None => 0,
    };

    Some(Product::scraped(id, title, discount_rate, is_fast_shipping))
}

/// `product_id=..&item_id=..` from a listing href, joined as `{product}_{item}`.
pub fn parse_listing_id(href: &str) -> Option<String> {
    let caps = LISTING_ID.captures(href)?;
    Some(listing_id(&caps[1], &caps[2]))
}

/// First `N%` in the container's text nodes. The inner `None` marks a match
/// that is not a valid percentage.
fn first_percentage(container: ElementRef<'_>) -> Option<Option<u8>> {
    container.text().find_map(|text| {
        PERCENT.captures(text).map(|caps| {
            caps[1]
                .parse::<u8>()
                .ok()
                .filter(|rate| *rate <= 100)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(body: &str) -> String {
        format!(r#"<div class="small_product_div">{body}</div>"#)
    }

    fn page(containers: &[String]) -> String {
        format!("<html><body>{}</body></html>", containers.concat())
    }

    #[test]
    fn test_parse_listing_id() {
        assert_eq!(
            parse_listing_id("/product?product_id=123&item_id=456&vendor=1"),
            Some("123_456".to_string())
        );
        assert_eq!(parse_listing_id("/product?item_id=456&product_id=123"), None);
        assert_eq!(parse_listing_id("/product?product_id=abc&item_id=1"), None);
        assert_eq!(parse_listing_id(""), None);
    }

    #[test]
    fn test_extract_full_container() {
        let html = page(&[container(
            r#"<a href="/p?product_id=1&item_id=2"><img src="/img/thumb.jpg" alt="Air fryer"></a>
               <img src="https://cdn.example/web_rocket_icon.png">
               <span>52%</span><span>4.5 stars</span>"#,
        )]);

        let result = extract_products(&html, ExtractMode::All);
        assert_eq!(result.containers, 1);
        assert_eq!(
            result.products,
            vec![Product::scraped("1_2".into(), "Air fryer".into(), 52, true)]
        );
        assert!(result.products[0].is_super_deal);
    }

    #[test]
    fn test_missing_title_and_discount_use_defaults() {
        let html = page(&[container(r#"<a href="?product_id=7&item_id=8">link</a>"#)]);
        let result = extract_products(&html, ExtractMode::All);
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].title, PLACEHOLDER_TITLE);
        assert_eq!(result.products[0].discount_rate, 0);
        assert!(!result.products[0].is_fast_shipping);
    }

    #[test]
    fn test_fast_shipping_only_skips_unbadged() {
        let html = page(&[
            container(r#"<a href="?product_id=1&item_id=1"></a>"#),
            container(
                r#"<a href="?product_id=2&item_id=2"></a><img src="/web_rocket_icon.svg">"#,
            ),
        ]);

        let all = extract_products(&html, ExtractMode::All);
        assert_eq!(all.products.len(), 2);

        let fast = extract_products(&html, ExtractMode::FastShippingOnly);
        assert_eq!(fast.containers, 2);
        assert_eq!(fast.products.len(), 1);
        assert_eq!(fast.products[0].id, "2_2");
    }

    #[test]
    fn test_bad_link_does_not_abort_later_containers() {
        let html = page(&[
            container(r#"<a href="/deals/today">nothing here</a>"#),
            container(r#"<span>no link at all</span>"#),
            container(r#"<a href="?product_id=9&item_id=10">ok</a>"#),
        ]);
        let result = extract_products(&html, ExtractMode::All);
        assert_eq!(result.containers, 3);
        let ids: Vec<_> = result.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["9_10"]);
    }

    #[test]
    fn test_first_link_decides() {
        let html = page(&[container(
            r#"<a href="/seller">seller</a><a href="?product_id=1&item_id=1">item</a>"#,
        )]);
        assert!(extract_products(&html, ExtractMode::All).products.is_empty());
    }

    #[test]
    fn test_out_of_range_discount_drops_record() {
        let html = page(&[container(r#"<a href="?product_id=1&item_id=1"></a><b>250%</b>"#)]);
        assert!(extract_products(&html, ExtractMode::All).products.is_empty());
    }

    #[test]
    fn test_first_percentage_wins() {
        let html = page(&[container(
            r#"<a href="?product_id=1&item_id=1"></a><i>rated 98% positive</i><b>30%</b>"#,
        )]);
        let result = extract_products(&html, ExtractMode::All);
        assert_eq!(result.products[0].discount_rate, 98);
    }

    #[test]
    fn test_no_containers_is_empty() {
        let result = extract_products("<html><body><p>maintenance", ExtractMode::All);
        assert_eq!(result, Extraction::default());
        assert!(extract_products("", ExtractMode::FastShippingOnly).products.is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let html = page(&[
            container(r#"<a href="?product_id=3&item_id=3"></a><span>10%</span>"#),
            container(r#"<a href="?product_id=1&item_id=1"></a>"#),
            container(r#"<a href="?product_id=3&item_id=3"></a>"#),
        ]);
        let first = extract_products(&html, ExtractMode::All);
        let second = extract_products(&html, ExtractMode::All);
        assert_eq!(first, second);
        let ids: Vec<_> = first.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3_3", "1_1", "3_3"]);
    }
}
