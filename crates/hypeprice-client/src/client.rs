//! HTTP client for the price-comparison search endpoint.
//!
//! Sends `POST <base>/api/search` with `{"q": query}` and returns the offer
//! list from the `results` field. There is no retry, no request timeout, and
//! no de-duplication of concurrent submissions; callers that can overlap
//! searches use [`hypeprice_core::ViewState`] generations to discard stale
//! outcomes.

use std::time::Duration;

use hypeprice_core::{Offer, SearchResponse, ViewState};
use reqwest::{Client, Url};
use serde::Serialize;

use crate::cache::ResponseCache;
use crate::error::SearchError;

const SEARCH_PATH: &str = "api/search";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

/// Client for `POST /api/search`.
///
/// Use [`SearchClient::new`] with the backend base URL; tests point it at a
/// wiremock server.
pub struct SearchClient {
    client: Client,
    endpoint: Url,
    cache: Option<ResponseCache>,
}

impl SearchClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEndpoint`] if `base_url` is not a valid
    /// URL, or [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, SearchError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        let endpoint = Self::endpoint_url(base_url)?;
        Ok(Self {
            client,
            endpoint,
            cache: None,
        })
    }

    /// Enables response caching for `ttl`. A zero `ttl` leaves caching off.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = (!ttl.is_zero()).then(|| ResponseCache::new(ttl));
        self
    }

    /// Runs one search and returns the offers in source order.
    ///
    /// A missing or `null` `results` field yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`SearchError::RequestFailed`] on a non-2xx status.
    /// - [`SearchError::Http`] on network or TLS failure.
    /// - [`SearchError::Decode`] if the body is not the expected JSON.
    pub async fn search(&self, query: &str) -> Result<Vec<Offer>, SearchError> {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(query)) {
            tracing::debug!(query, count = hit.len(), "search served from cache");
            return Ok(hit);
        }

        tracing::info!(query, endpoint = %self.endpoint, "search triggered");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SearchRequest { q: query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "search API error");
            return Err(SearchError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<SearchResponse>(&body).map_err(|e| {
            SearchError::Decode {
                context: format!("search response for \"{query}\""),
                source: e,
            }
        })?;
        let results = parsed.into_results();
        tracing::debug!(query, count = results.len(), "search returned");

        if let Some(cache) = &self.cache {
            cache.insert(query, results.clone());
        }
        Ok(results)
    }

    /// Builds `<base>/api/search`, keeping any path prefix on the base URL.
    fn endpoint_url(base_url: &str) -> Result<Url, SearchError> {
        let invalid = |reason: String| SearchError::InvalidEndpoint {
            base_url: base_url.to_owned(),
            reason,
        };
        // Exactly one trailing slash so `join` appends instead of replacing the
        // last path segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", base.scheme())));
        }
        base.join(SEARCH_PATH).map_err(|e| invalid(e.to_string()))
    }
}

/// Runs a search against `view`, applying the outcome only if no newer search
/// was started in the meantime.
///
/// Returns `true` when the outcome was applied. Errors are folded into
/// `view.error` as their user-facing message.
pub async fn run_search(client: &SearchClient, view: &mut ViewState, query: &str) -> bool {
    let ticket = view.begin_search(query);
    let outcome = client.search(query).await.map_err(|e| {
        tracing::warn!(query, error = %e, "search failed");
        e.user_message()
    });
    view.finish_search(&ticket, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_api_search() {
        let url = SearchClient::endpoint_url("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/search");
    }

    #[test]
    fn endpoint_strips_trailing_slashes() {
        let url = SearchClient::endpoint_url("https://prices.example.com//").unwrap();
        assert_eq!(url.as_str(), "https://prices.example.com/api/search");
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let url = SearchClient::endpoint_url("https://example.com/hypeprice").unwrap();
        assert_eq!(url.as_str(), "https://example.com/hypeprice/api/search");
    }

    #[test]
    fn endpoint_rejects_garbage() {
        let err = SearchClient::endpoint_url("not a url").unwrap_err();
        assert!(
            matches!(err, SearchError::InvalidEndpoint { .. }),
            "expected InvalidEndpoint, got: {err:?}"
        );
    }

    #[test]
    fn endpoint_rejects_non_http_scheme() {
        let err = SearchClient::endpoint_url("ftp://example.com").unwrap_err();
        assert!(matches!(err, SearchError::InvalidEndpoint { .. }));
    }

    #[test]
    fn zero_ttl_disables_cache() {
        let client = SearchClient::new("http://localhost:8000", "test/0.1")
            .unwrap()
            .with_cache_ttl(Duration::ZERO);
        assert!(client.cache.is_none());
    }

    #[test]
    fn request_body_is_q_only() {
        let body = serde_json::to_value(SearchRequest { q: "barbour" }).unwrap();
        assert_eq!(body, serde_json::json!({ "q": "barbour" }));
    }

    #[test]
    fn user_messages_match_error_kind() {
        assert_eq!(
            SearchError::RequestFailed { status: 502 }.user_message(),
            "Search failed: 502"
        );
        let decode = SearchError::Decode {
            context: "x".to_string(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert_eq!(decode.user_message(), "Network error");
    }
}
