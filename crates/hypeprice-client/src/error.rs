use thiserror::Error;

/// Errors returned by [`crate::SearchClient::search`].
///
/// Two kinds reach the user: a non-success HTTP status (`RequestFailed`) and
/// everything else, which is reported as a generic network error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend answered with a non-2xx status.
    #[error("search request failed with HTTP status {status}")]
    RequestFailed { status: u16 },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON of the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid search endpoint \"{base_url}\": {reason}")]
    InvalidEndpoint { base_url: String, reason: String },
}

impl SearchError {
    /// Message shown in place of the result list.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SearchError::RequestFailed { status } => format!("Search failed: {status}"),
            SearchError::Http(_) | SearchError::Decode { .. } => "Network error".to_string(),
            SearchError::InvalidEndpoint { .. } => self.to_string(),
        }
    }
}
