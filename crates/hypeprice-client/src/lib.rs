pub mod cache;
pub mod client;
pub mod error;

pub use cache::ResponseCache;
pub use client::{run_search, SearchClient};
pub use error::SearchError;
