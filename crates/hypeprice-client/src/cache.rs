//! Short-lived cache of successful search responses, keyed by exact query.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use hypeprice_core::Offer;

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Vec<Offer>, Instant)>>,
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a cached copy if one was stored less than `ttl` ago.
    #[must_use]
    pub fn get(&self, query: &str) -> Option<Vec<Offer>> {
        self.get_at(query, Instant::now())
    }

    pub fn insert(&self, query: &str, results: Vec<Offer>) {
        self.insert_at(query, results, Instant::now());
    }

    fn get_at(&self, query: &str, now: Instant) -> Option<Vec<Offer>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = now >= entries.get(query)?.1;
        if expired {
            entries.remove(query);
            return None;
        }
        entries.get(query).map(|(results, _)| results.clone())
    }

    /// Stores `results` and evicts every entry that has already expired.
    fn insert_at(&self, query: &str, results: Vec<Offer>, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, (_, expires_at)| now < *expires_at);
        entries.insert(query.to_owned(), (results, now + self.ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_entry_before_expiry() {
        let cache = ResponseCache::new(Duration::from_secs(120));
        let now = Instant::now();
        cache.insert_at("barbour", vec![Offer::new("A", 1.0)], now);
        let hit = cache.get_at("barbour", now + Duration::from_secs(119));
        assert_eq!(hit.map(|r| r.len()), Some(1));
    }

    #[test]
    fn expired_entry_is_evicted() {
        let cache = ResponseCache::new(Duration::from_secs(120));
        let now = Instant::now();
        cache.insert_at("barbour", vec![Offer::new("A", 1.0)], now);
        assert!(cache
            .get_at("barbour", now + Duration::from_secs(120))
            .is_none());
        assert!(cache.get_at("barbour", now).is_none());
    }

    #[test]
    fn insert_sweeps_expired_entries_for_other_queries() {
        let cache = ResponseCache::new(Duration::from_secs(120));
        let now = Instant::now();
        cache.insert_at("barbour", Vec::new(), now);
        cache.insert_at("carhartt", Vec::new(), now + Duration::from_secs(60));
        cache.insert_at("stussy", Vec::new(), now + Duration::from_secs(150));

        let entries = cache.entries.lock().unwrap();
        assert!(!entries.contains_key("barbour"));
        assert!(entries.contains_key("carhartt"));
        assert!(entries.contains_key("stussy"));
    }

    #[test]
    fn keys_are_exact_query_strings() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("Barbour", Vec::new());
        assert!(cache.get("Barbour").is_some());
        assert!(cache.get("barbour").is_none());
    }
}
