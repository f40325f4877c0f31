//! Video results from the YouTube Data API v3.
//!
//! One `search` call finds candidate videos, then a single batched `videos`
//! call fetches duration and view statistics for all of them at once.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::config::{DEFAULT_USER_AGENT, YouTubeConfig};
use crate::data_models::{ResultKind, VideoItem};
use crate::error::SourceError;
use crate::format::{UNKNOWN, format_duration, format_view_count};
use crate::query::SearchQuery;

use super::{ContentSource, build_client, decode_entries};

const SOURCE_NAME: &str = "YouTube";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Deserialize, Debug)]
struct SearchListResponse {
    items: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: String,
    description: String,
    channel_title: String,
    published_at: String,
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Debug, Default)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Deserialize, Debug)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Deserialize, Debug)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VideoDetail {
    id: String,
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Deserialize, Debug)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

/// Display-ready values from the detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStats {
    pub duration: String,
    pub view_count: String,
}

impl VideoStats {
    pub fn unknown() -> Self {
        Self {
            duration: UNKNOWN.to_string(),
            view_count: UNKNOWN.to_string(),
        }
    }
}

fn stats_from_detail(detail: VideoDetail) -> VideoStats {
    let duration = detail
        .content_details
        .and_then(|c| c.duration)
        .and_then(|d| format_duration(&d))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let view_count =
        format_view_count(detail.statistics.as_ref().and_then(|s| s.view_count.as_deref()));
    VideoStats {
        duration,
        view_count,
    }
}

pub struct YouTubeSource {
    client: reqwest::Client,
    config: YouTubeConfig,
}

impl YouTubeSource {
    pub fn new(config: YouTubeConfig) -> Result<Self, SourceError> {
        let client = build_client(DEFAULT_USER_AGENT, config.timeout)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        // Request URLs carry the API key, keep them out of errors and logs.
        let response = self
            .client
            .get(self.endpoint(path))
            .query(params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::Http(e.without_url()))?;
        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Http(e.without_url()))
    }

    async fn try_search(
        &self,
        api_key: &str,
        query: &SearchQuery,
    ) -> Result<Vec<VideoItem>, SourceError> {
        let max_results = self.config.max_results.to_string();
        let listing: SearchListResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", query.as_str()),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                    ("order", "relevance"),
                    ("videoDuration", self.config.video_duration.as_str()),
                    ("publishedAfter", self.config.published_after.as_str()),
                    ("key", api_key),
                ],
            )
            .await?;

        let items: Vec<SearchItem> = decode_entries(listing.items.unwrap_or_default(), SOURCE_NAME);
        let mut candidates: Vec<(String, Snippet)> = items
            .into_iter()
            .filter_map(|item| item.id.video_id.map(|id| (id, item.snippet)))
            .collect();
        candidates.truncate(self.config.max_results as usize);

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = candidates.iter().map(|(id, _)| id.as_str()).collect();
        let mut stats = match self.fetch_stats(api_key, &ids).await {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(error = %err, "YouTube video details lookup failed");
                HashMap::new()
            }
        };

        let videos = candidates
            .into_iter()
            .map(|(id, snippet)| {
                let stats = stats.remove(&id).unwrap_or_else(VideoStats::unknown);
                to_video_item(id, snippet, stats)
            })
            .collect();
        Ok(videos)
    }

    /// One batched detail lookup for every id, keyed by video id.
    async fn fetch_stats(
        &self,
        api_key: &str,
        ids: &[&str],
    ) -> Result<HashMap<String, VideoStats>, SourceError> {
        let joined = ids.join(",");
        let details: VideoListResponse = self
            .get_json(
                "videos",
                &[
                    ("part", "contentDetails,statistics"),
                    ("id", joined.as_str()),
                    ("key", api_key),
                ],
            )
            .await?;

        let details: Vec<VideoDetail> = decode_entries(details.items, SOURCE_NAME);
        Ok(details
            .into_iter()
            .map(|detail| (detail.id.clone(), stats_from_detail(detail)))
            .collect())
    }
}

impl ContentSource for YouTubeSource {
    type Item = VideoItem;

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoItem>, SourceError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::debug!("no YouTube API key configured, skipping video search");
            return Ok(Vec::new());
        };

        match self.try_search(api_key, query).await {
            Ok(videos) => {
                tracing::debug!(count = videos.len(), "YouTube returned videos");
                Ok(videos)
            }
            Err(err) => {
                tracing::warn!(error = %err, "YouTube search failed");
                Ok(Vec::new())
            }
        }
    }
}

fn to_video_item(id: String, snippet: Snippet, stats: VideoStats) -> VideoItem {
    let thumbnails = snippet.thumbnails;
    let thumbnail = thumbnails
        .medium
        .and_then(|t| t.url)
        .or_else(|| thumbnails.default.and_then(|t| t.url));
    let description = Some(snippet.description).filter(|d| !d.trim().is_empty());

    VideoItem {
        url: format!("{WATCH_URL}{id}"),
        id,
        title: snippet.title,
        description,
        kind: ResultKind::Video,
        source: SOURCE_NAME.to_string(),
        thumbnail,
        channel_title: snippet.channel_title,
        published_at: snippet.published_at,
        duration: stats.duration,
        view_count: stats.view_count,
    }
}
