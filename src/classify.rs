//! Category counts and discount-rate histograms over product records.

use crate::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts {
    pub total: usize,
    pub fast_shipping: usize,
    pub super_deal: usize,
    pub electronics: usize,
}

impl CategoryCounts {
    pub fn of<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(CategoryCounts::default(), |mut counts, p| {
                counts.total += 1;
                counts.fast_shipping += usize::from(p.is_fast_shipping);
                counts.super_deal += usize::from(p.is_super_deal);
                counts.electronics += usize::from(p.is_electronics);
                counts
            })
    }
}

/// Fixed bucket boundaries for discount histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketScheme {
    /// `<30`, `30-39`, `40-49`, `50-59`, `>=60`.
    Decades,
    /// `0-19`, `20-29`, `30-39`, `40-48`, `>=49`; the top bucket is the super-deal range.
    SuperDeal,
}

struct Bucket {
    lower: u8,
    label: &'static str,
}

const DECADES: [Bucket; 5] = [
    Bucket { lower: 0, label: "<30%" },
    Bucket { lower: 30, label: "30-39%" },
    Bucket { lower: 40, label: "40-49%" },
    Bucket { lower: 50, label: "50-59%" },
    Bucket { lower: 60, label: ">=60%" },
];

const SUPER_DEAL: [Bucket; 5] = [
    Bucket { lower: 0, label: "0-19%" },
    Bucket { lower: 20, label: "20-29%" },
    Bucket { lower: 30, label: "30-39%" },
    Bucket { lower: 40, label: "40-48%" },
    Bucket { lower: 49, label: ">=49%" },
];

impl BucketScheme {
    fn buckets(self) -> &'static [Bucket] {
        match self {
            BucketScheme::Decades => &DECADES,
            BucketScheme::SuperDeal => &SUPER_DEAL,
        }
    }

    /// Bucket labels, lowest range first.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        self.buckets().iter().map(|b| b.label)
    }

    /// Index of the bucket holding `rate`. Boundaries belong to the higher bucket.
    pub fn bucket_of(self, rate: u8) -> usize {
        self.buckets()
            .iter()
            .rposition(|b| rate >= b.lower)
            .unwrap_or(0)
    }
}

/// Per-bucket counts in scheme order; empty buckets stay at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    scheme: BucketScheme,
    counts: Vec<usize>,
}

impl Histogram {
    pub fn of<'a>(scheme: BucketScheme, products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut counts = vec![0; scheme.buckets().len()];
        for p in products {
            counts[scheme.bucket_of(p.discount_rate)] += 1;
        }
        Histogram { scheme, counts }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(label, count)` pairs, lowest range first.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.scheme.labels().zip(self.counts.iter().copied())
    }

    pub fn count(&self, label: &str) -> Option<usize> {
        self.entries().find(|(l, _)| *l == label).map(|(_, c)| c)
    }
}
