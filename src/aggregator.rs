use futures::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::config::Config;
use crate::data_models::{ForumItem, SearchResponse, VideoItem};
use crate::error::{SourceError, ValidationError};
use crate::query::{SearchQuery, SearchRequest};
use crate::sources::{ContentSource, RedditSource, YouTubeSource};

/// Fans a search out to the video and forum sources and assembles the
/// response envelope. A failing source contributes an empty list.
pub struct Aggregator<V, F> {
    videos: V,
    forums: F,
}

impl Aggregator<YouTubeSource, RedditSource> {
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Ok(Self::new(
            YouTubeSource::new(config.youtube.clone())?,
            RedditSource::new(config.reddit.clone())?,
        ))
    }
}

impl<V, F> Aggregator<V, F>
where
    V: ContentSource<Item = VideoItem>,
    F: ContentSource<Item = ForumItem>,
{
    pub fn new(videos: V, forums: F) -> Self {
        Self { videos, forums }
    }

    pub fn videos(&self) -> &V {
        &self.videos
    }

    pub fn forums(&self) -> &F {
        &self.forums
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ValidationError> {
        let query = SearchQuery::build(request)?;
        tracing::info!(query = %query, "searching");

        let (videos, manuals) = tokio::join!(
            isolated(&self.videos, &query),
            isolated(&self.forums, &query)
        );
        tracing::info!(
            videos = videos.len(),
            manuals = manuals.len(),
            "search complete"
        );

        Ok(SearchResponse::new(query, videos, manuals))
    }
}

/// Run one source, turning an error or a panic into an empty result.
async fn isolated<S: ContentSource>(source: &S, query: &SearchQuery) -> Vec<S::Item> {
    match AssertUnwindSafe(source.search(query)).catch_unwind().await {
        Ok(Ok(items)) => items,
        Ok(Err(err)) => {
            tracing::warn!(source = source.name(), error = %err, "source failed");
            Vec::new()
        }
        Err(_) => {
            tracing::error!(source = source.name(), "source panicked");
            Vec::new()
        }
    }
}
