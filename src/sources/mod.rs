use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;
use crate::query::SearchQuery;

pub mod reddit;
pub mod youtube;

pub use reddit::RedditSource;
pub use youtube::YouTubeSource;

/// An upstream content provider queried once per search.
///
/// Implementations own their fault handling: a provider that can degrade to
/// an empty result should do so itself. An `Err` here is treated by the
/// aggregator as "nothing from this source".
pub trait ContentSource: Send + Sync {
    type Item: Send;

    /// Display name, also used as the `source` field of produced items.
    fn name(&self) -> &'static str;

    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Self::Item>, SourceError>> + Send;
}

/// Build the pooled HTTP client a source uses for every request.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| SourceError::Client(format!("failed to build HTTP client: {e}")))
}

/// Decode each raw entry on its own. Entries that do not fit `T` are logged
/// and skipped.
pub fn decode_entries<T: DeserializeOwned>(
    entries: Vec<serde_json::Value>,
    source: &str,
) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(source, error = %err, "skipping malformed entry");
                None
            }
        })
        .collect()
}
