//! Filter/sort pipeline from raw search results to the list shown on screen.
//!
//! Store matching is case-insensitive in both directions: the filter keeps
//! offers whose retailer equals the selected store ignoring case, and the
//! store option list collapses names that differ only by case, keeping the
//! first spelling seen.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::offers::Offer;

const ALL_STORES: &str = "All Stores";

/// Result ordering selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Source order, untouched.
    #[default]
    Recommended,
    /// Ascending by base price.
    Low,
    /// Descending by base price.
    High,
}

impl SortOption {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::Recommended => "recommended",
            SortOption::Low => "low",
            SortOption::High => "high",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recommended" => Ok(SortOption::Recommended),
            "low" => Ok(SortOption::Low),
            "high" => Ok(SortOption::High),
            other => Err(format!(
                "unknown sort option \"{other}\" (expected recommended, low, or high)"
            )),
        }
    }
}

/// Store restriction selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreFilter {
    #[default]
    All,
    Store(String),
}

impl StoreFilter {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            StoreFilter::All => ALL_STORES,
            StoreFilter::Store(name) => name,
        }
    }

    /// Whether `retailer` passes this filter.
    #[must_use]
    pub fn matches(&self, retailer: &str) -> bool {
        match self {
            StoreFilter::All => true,
            StoreFilter::Store(name) => same_store(name, retailer),
        }
    }
}

impl fmt::Display for StoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StoreFilter {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case(ALL_STORES) {
            StoreFilter::All
        } else {
            StoreFilter::Store(s.to_string())
        }
    }
}

impl FromStr for StoreFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(StoreFilter::from(s))
    }
}

fn same_store(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Produces the filtered, ordered list to display.
///
/// `results` is never mutated. Sorting is stable, so offers with equal prices
/// keep their source order.
#[must_use]
pub fn derive_display_list(
    results: &[Offer],
    store_filter: &StoreFilter,
    sort_option: SortOption,
) -> Vec<Offer> {
    let mut list: Vec<Offer> = results
        .iter()
        .filter(|o| store_filter.matches(&o.retailer))
        .cloned()
        .collect();

    match sort_option {
        SortOption::Recommended => {}
        SortOption::Low => {
            list.sort_by(|a, b| a.base_price_twd().total_cmp(&b.base_price_twd()));
        }
        SortOption::High => {
            list.sort_by(|a, b| b.base_price_twd().total_cmp(&a.base_price_twd()));
        }
    }

    list
}

/// `"All Stores"` followed by each retailer in first-seen order.
#[must_use]
pub fn derive_store_options(results: &[Offer]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = vec![ALL_STORES.to_string()];
    for offer in results {
        let name = offer.retailer.as_str();
        if name.trim().is_empty() {
            continue;
        }
        if seen.insert(name.to_lowercase()) {
            options.push(name.to_string());
        }
    }
    options
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
