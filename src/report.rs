//! Console reports. Each report is a `Display` value so callers decide where
//! the text goes.

use std::collections::HashMap;
use std::fmt;

use crate::classify::{BucketScheme, CategoryCounts, Histogram};
use crate::diff::{IdDiff, MatchRate, fast_shipping_ids};
use crate::extract::Extraction;
use crate::product::Product;

const TITLE_WIDTH: usize = 50;

fn rule(f: &mut fmt::Formatter<'_>, ch: char) -> fmt::Result {
    writeln!(f, "{}", ch.to_string().repeat(60))
}

fn short_title(title: &str) -> String {
    let mut chars = title.chars();
    let head: String = chars.by_ref().take(TITLE_WIDTH).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn write_histogram(f: &mut fmt::Formatter<'_>, histogram: &Histogram) -> fmt::Result {
    writeln!(f, "Discount distribution:")?;
    for (label, count) in histogram.entries() {
        writeln!(f, "  {label}: {count}")?;
    }
    Ok(())
}

/// Snapshot summary: category counts and the decade histogram.
pub struct CountReport<'a> {
    pub products: &'a [Product],
}

impl fmt::Display for CountReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = CategoryCounts::of(self.products);
        writeln!(f, "Products in snapshot: {}", counts.total)?;
        writeln!(f)?;
        writeln!(f, "By category:")?;
        writeln!(f, "  Super deals (49%+): {}", counts.super_deal)?;
        writeln!(f, "  Electronics: {}", counts.electronics)?;
        writeln!(f, "  Fast shipping: {}", counts.fast_shipping)?;
        writeln!(f)?;
        write_histogram(f, &Histogram::of(BucketScheme::Decades, self.products))
    }
}

/// Fast-shipping listings of the snapshot against those on a captured page.
pub struct CompareReport<'a> {
    pub server: &'a [Product],
    pub page: &'a Extraction,
}

impl CompareReport<'_> {
    pub fn diff(&self) -> IdDiff {
        IdDiff::compute(
            fast_shipping_ids(self.server),
            fast_shipping_ids(&self.page.products),
        )
    }
}

fn titles<'a>(products: &'a [Product]) -> HashMap<&'a str, &'a str> {
    let mut titles = HashMap::new();
    for p in products.iter().filter(|p| p.is_fast_shipping) {
        titles.entry(p.id.as_str()).or_insert(p.title.as_str());
    }
    titles
}

fn write_listing<'a>(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    ids: impl ExactSizeIterator<Item = &'a String>,
    titles: &HashMap<&str, &str>,
) -> fmt::Result {
    if ids.len() == 0 {
        return writeln!(f, "{heading}: none");
    }
    writeln!(f, "{heading} ({}):", ids.len())?;
    for id in ids {
        let title = titles.get(id.as_str()).copied().unwrap_or_default();
        writeln!(f, "- {id}: {}", short_title(title))?;
    }
    Ok(())
}

impl fmt::Display for CompareReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let server_titles = titles(self.server);
        let page_titles = titles(&self.page.products);
        let diff = self.diff();

        let server_fast = self.server.iter().filter(|p| p.is_fast_shipping).count();
        writeln!(f, "Server fast-shipping products: {server_fast}")?;
        let mut server_ids: Vec<_> = server_titles.iter().collect();
        server_ids.sort();
        for (i, (id, title)) in server_ids.into_iter().enumerate() {
            writeln!(f, "{}. {id} - {}", i + 1, short_title(title))?;
        }
        writeln!(f)?;

        let page_fast: Vec<_> = self
            .page
            .products
            .iter()
            .filter(|p| p.is_fast_shipping)
            .collect();
        writeln!(f, "Page fast-shipping products: {}", page_fast.len())?;
        for (i, p) in page_fast.iter().enumerate() {
            writeln!(f, "{}. {} - {}", i + 1, p.id, short_title(&p.title))?;
        }
        writeln!(f)?;

        rule(f, '=')?;
        write_listing(
            f,
            "Only on server",
            diff.only_in_reference.iter(),
            &server_titles,
        )?;
        write_listing(f, "Only on page", diff.only_in_observed.iter(), &page_titles)?;
        writeln!(f, "On both: {}", diff.common.len())?;
        writeln!(f, "Match rate: {}", diff.match_rate())
    }
}

/// Live-page verification of the crawler's snapshot.
pub struct VerifyReport<'a> {
    pub server: &'a [Product],
    pub page: &'a Extraction,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Healthy,
    BelowThreshold,
    NothingObserved,
}

impl VerifyReport<'_> {
    pub fn diff(&self) -> IdDiff {
        IdDiff::compute(
            fast_shipping_ids(self.server),
            fast_shipping_ids(&self.page.products),
        )
    }

    pub fn verdict(&self) -> Verdict {
        match self.diff().match_rate() {
            MatchRate::NotApplicable => Verdict::NothingObserved,
            MatchRate::Percent(p) if p < self.threshold => Verdict::BelowThreshold,
            MatchRate::Percent(_) => Verdict::Healthy,
        }
    }
}

impl fmt::Display for VerifyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let server = CategoryCounts::of(self.server);
        writeln!(f, "=== Server snapshot ===")?;
        writeln!(f, "Products: {}", server.total)?;
        writeln!(f, "Fast shipping: {}", server.fast_shipping)?;
        writeln!(f, "Super deals (49%+): {}", server.super_deal)?;
        writeln!(f)?;
        write_histogram(f, &Histogram::of(BucketScheme::SuperDeal, self.server))?;
        writeln!(f)?;

        let fast: Vec<&Product> = self
            .page
            .products
            .iter()
            .filter(|p| p.is_fast_shipping)
            .collect();
        let page = CategoryCounts::of(fast.iter().copied());
        writeln!(f, "=== Live page ===")?;
        writeln!(f, "Product containers: {}", self.page.containers)?;
        writeln!(f, "Fast shipping: {}", page.total)?;
        writeln!(f, "Super deals (49%+): {}", page.super_deal)?;
        writeln!(f)?;

        let diff = self.diff();
        writeln!(f, "=== Comparison ===")?;
        writeln!(f, "Matching fast-shipping products: {}", diff.common.len())?;
        writeln!(f, "Only on server: {}", diff.only_in_reference.len())?;
        writeln!(f, "Only on page: {}", diff.only_in_observed.len())?;
        writeln!(f, "Collection rate: {}", diff.match_rate())?;

        match self.verdict() {
            Verdict::Healthy => writeln!(f, "OK: the crawler is collecting most products."),
            Verdict::BelowThreshold => writeln!(
                f,
                "WARNING: collection rate is below {:.1}%, the crawling logic may need a look.",
                self.threshold
            ),
            Verdict::NothingObserved => {
                writeln!(f, "WARNING: no fast-shipping products found on the page.")
            }
        }
    }
}
