use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::query::SearchQuery;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Video,
    Forum,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub source: String,
    pub thumbnail: Option<String>,
    pub channel_title: String,
    pub published_at: String,
    pub duration: String,
    pub view_count: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForumItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub source: String,
    pub thumbnail: Option<String>,
    pub score: i64,
    pub comments: i64,
    pub subreddit: String,
    pub created: String,
}

impl ForumItem {
    /// Combined ranking metric.
    pub fn engagement(&self) -> i64 {
        self.score + self.comments
    }
}

/// Either kind of result, viewed through the fields they share.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResultItem {
    Video(VideoItem),
    Forum(ForumItem),
}

impl ResultItem {
    pub fn kind(&self) -> ResultKind {
        match self {
            ResultItem::Video(v) => v.kind,
            ResultItem::Forum(f) => f.kind,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ResultItem::Video(v) => &v.title,
            ResultItem::Forum(f) => &f.title,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ResultItem::Video(v) => &v.url,
            ResultItem::Forum(f) => &f.url,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            ResultItem::Video(v) => &v.source,
            ResultItem::Forum(f) => &f.source,
        }
    }

    /// Two-line plain text rendering used by the CLI.
    pub fn summary_line(&self) -> String {
        let tag = match self.kind() {
            ResultKind::Video => "video",
            ResultKind::Forum => "forum",
        };
        format!(
            "[{tag}] {} ({})\n    {}",
            self.title(),
            self.source(),
            self.url()
        )
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SearchResponse {
    pub videos: Vec<VideoItem>,
    pub manuals: Vec<ForumItem>,
    pub query: SearchQuery,
    pub timestamp: String,
}

impl SearchResponse {
    pub fn new(query: SearchQuery, videos: Vec<VideoItem>, manuals: Vec<ForumItem>) -> Self {
        Self::at(query, videos, manuals, Utc::now())
    }

    pub fn at(
        query: SearchQuery,
        videos: Vec<VideoItem>,
        manuals: Vec<ForumItem>,
        now: DateTime<Utc>,
    ) -> Self {
        SearchResponse {
            videos,
            manuals,
            query,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Videos first, then forum posts, each in their ranked order.
    pub fn items(&self) -> impl Iterator<Item = ResultItem> + '_ {
        self.videos
            .iter()
            .cloned()
            .map(ResultItem::Video)
            .chain(self.manuals.iter().cloned().map(ResultItem::Forum))
    }
}
