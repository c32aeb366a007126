//! ID-set comparison between the server snapshot and a freshly observed page.

use std::collections::BTreeSet;
use std::fmt;

use crate::product::Product;

/// Result of comparing a reference ID set against an observed one. Sets are
/// sorted so listings come out in the same order on every run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdDiff {
    pub common: BTreeSet<String>,
    pub only_in_reference: BTreeSet<String>,
    pub only_in_observed: BTreeSet<String>,
    observed_len: usize,
}

impl IdDiff {
    pub fn compute<'a, R, O>(reference: R, observed: O) -> Self
    where
        R: IntoIterator<Item = &'a str>,
        O: IntoIterator<Item = &'a str>,
    {
        let reference: BTreeSet<&str> = reference.into_iter().collect();
        let observed: BTreeSet<&str> = observed.into_iter().collect();

        IdDiff {
            common: owned(reference.intersection(&observed)),
            only_in_reference: owned(reference.difference(&observed)),
            only_in_observed: owned(observed.difference(&reference)),
            observed_len: observed.len(),
        }
    }

    /// Share of observed IDs also present in the reference.
    pub fn match_rate(&self) -> MatchRate {
        if self.observed_len == 0 {
            MatchRate::NotApplicable
        } else {
            MatchRate::Percent(self.common.len() as f64 / self.observed_len as f64 * 100.0)
        }
    }
}

fn owned(ids: impl Iterator<Item = impl ToString>) -> BTreeSet<String> {
    ids.map(|id| id.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchRate {
    Percent(f64),
    /// Nothing was observed.
    NotApplicable,
}

impl MatchRate {
    pub fn percent(self) -> Option<f64> {
        match self {
            MatchRate::Percent(p) => Some(p),
            MatchRate::NotApplicable => None,
        }
    }
}

/// One decimal place, or `N/A`.
impl fmt::Display for MatchRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRate::Percent(p) => write!(f, "{:.1}%", p),
            MatchRate::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// IDs of the fast-shipping records in `products`.
pub fn fast_shipping_ids(products: &[Product]) -> BTreeSet<&str> {
    products
        .iter()
        .filter(|p| p.is_fast_shipping)
        .map(|p| p.id.as_str())
        .collect()
}
