//! Forum results from Reddit's public JSON listings.
//!
//! Every configured community is queried concurrently, each call under its
//! own timeout. A community that fails or hangs is logged and skipped; the
//! survivors are pooled, ranked by engagement and truncated.

use futures::future::join_all;
use serde::Deserialize;
use std::cmp::Reverse;

use crate::config::{ForumStrategy, RedditConfig};
use crate::data_models::{ForumItem, ResultKind};
use crate::error::SourceError;
use crate::format::{format_created, truncate_description};
use crate::query::SearchQuery;

use super::{ContentSource, build_client, decode_entries};

const SOURCE_NAME: &str = "Reddit";
const PERMALINK_BASE: &str = "https://reddit.com";
const DESCRIPTION_CHARS: usize = 200;

/// Values Reddit puts in `thumbnail` when there is no image.
const THUMBNAIL_SENTINELS: &[&str] = &["self", "default", "nsfw", "spoiler", "image", ""];

#[derive(Deserialize, Debug, Default)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Deserialize, Debug, Default)]
struct ListingData {
    #[serde(default)]
    children: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct Child {
    data: Post,
}

#[derive(Deserialize, Debug, Clone)]
struct Post {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    permalink: String,
    thumbnail: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    created_utc: f64,
}

pub struct RedditSource {
    client: reqwest::Client,
    config: RedditConfig,
}

impl RedditSource {
    pub fn new(config: RedditConfig) -> Result<Self, SourceError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    fn listing_url(&self, subreddit: &str, listing: &str) -> String {
        format!(
            "{}/r/{subreddit}/{listing}.json",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn get_listing(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Listing, reqwest::Error> {
        self.client
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<Listing>()
            .await
    }

    async fn fetch_listing(
        &self,
        url: String,
        params: &[(&str, &str)],
    ) -> Result<Vec<Post>, SourceError> {
        let listing = tokio::time::timeout(self.config.timeout, self.get_listing(&url, params))
            .await
            .map_err(|_| SourceError::Timeout(self.config.timeout))??;

        let children: Vec<Child> = decode_entries(listing.data.children, SOURCE_NAME);
        Ok(children.into_iter().map(|c| c.data).collect())
    }

    async fn fetch_subreddit(
        &self,
        subreddit: &str,
        query: &SearchQuery,
        terms: &[String],
    ) -> Result<Vec<ForumItem>, SourceError> {
        let posts = match self.config.strategy {
            ForumStrategy::Search => {
                let limit = self.config.per_subreddit_limit.to_string();
                self.fetch_listing(
                    self.listing_url(subreddit, "search"),
                    &[
                        ("q", query.as_str()),
                        ("restrict_sr", "on"),
                        ("sort", "relevance"),
                        ("t", self.config.time_window.as_str()),
                        ("limit", limit.as_str()),
                    ],
                )
                .await?
            }
            ForumStrategy::Hot => {
                let limit = self.config.hot_listing_limit.to_string();
                let posts = self
                    .fetch_listing(
                        self.listing_url(subreddit, "hot"),
                        &[("limit", limit.as_str())],
                    )
                    .await?;
                posts
                    .into_iter()
                    .filter(|p| matches_terms(&p.title, &p.selftext, terms))
                    .take(self.config.per_subreddit_limit as usize)
                    .collect()
            }
        };

        Ok(posts.into_iter().map(to_forum_item).collect())
    }

    /// Top of the fallback community's hot listing, unfiltered.
    async fn fetch_fallback(&self) -> Vec<ForumItem> {
        let subreddit = &self.config.fallback_subreddit;
        let limit = self.config.fallback_limit.to_string();
        match self
            .fetch_listing(
                self.listing_url(subreddit, "hot"),
                &[("limit", limit.as_str())],
            )
            .await
        {
            Ok(posts) => posts
                .into_iter()
                .take(self.config.fallback_limit)
                .map(to_forum_item)
                .collect(),
            Err(err) => {
                tracing::warn!(subreddit = %subreddit, error = %err, "fallback listing failed");
                Vec::new()
            }
        }
    }

    async fn collect(&self, query: &SearchQuery) -> Vec<ForumItem> {
        let terms = query.terms();
        let terms = terms.as_slice();

        let outcomes = join_all(self.config.subreddits.iter().map(|subreddit| async move {
            let outcome = self.fetch_subreddit(subreddit, query, terms).await;
            (subreddit, outcome)
        }))
        .await;

        let mut pool: Vec<ForumItem> = Vec::new();
        for (subreddit, outcome) in outcomes {
            match outcome {
                Ok(items) => {
                    tracing::debug!(subreddit = %subreddit, count = items.len(), "subreddit returned posts");
                    pool.extend(items);
                }
                Err(err) => {
                    tracing::warn!(subreddit = %subreddit, error = %err, "subreddit query failed");
                }
            }
        }

        if pool.is_empty() {
            tracing::info!(
                subreddit = %self.config.fallback_subreddit,
                "no matching posts, using fallback listing"
            );
            pool = self.fetch_fallback().await;
        }

        rank_by_engagement(pool, self.config.max_results)
    }
}

impl ContentSource for RedditSource {
    type Item = ForumItem;

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ForumItem>, SourceError> {
        let items = self.collect(query).await;
        tracing::debug!(count = items.len(), "Reddit returned posts");
        Ok(items)
    }
}

/// Sort by `score + comments`, highest first, keeping upstream order for ties.
pub fn rank_by_engagement(mut items: Vec<ForumItem>, max_results: usize) -> Vec<ForumItem> {
    items.sort_by_key(|item| Reverse(item.engagement()));
    items.truncate(max_results);
    items
}

/// Whether any query term occurs in the title or body, ignoring case.
pub fn matches_terms(title: &str, body: &str, terms: &[String]) -> bool {
    let title = title.to_lowercase();
    let body = body.to_lowercase();
    terms
        .iter()
        .any(|term| title.contains(term.as_str()) || body.contains(term.as_str()))
}

pub fn usable_thumbnail(thumbnail: Option<&str>) -> Option<String> {
    thumbnail
        .map(str::trim)
        .filter(|t| !THUMBNAIL_SENTINELS.contains(t))
        .filter(|t| t.starts_with("http://") || t.starts_with("https://"))
        .map(str::to_string)
}

fn to_forum_item(post: Post) -> ForumItem {
    ForumItem {
        url: format!("{PERMALINK_BASE}{}", post.permalink),
        description: truncate_description(&post.selftext, DESCRIPTION_CHARS),
        thumbnail: usable_thumbnail(post.thumbnail.as_deref()),
        created: format_created(post.created_utc),
        id: post.id,
        title: post.title,
        kind: ResultKind::Forum,
        source: SOURCE_NAME.to_string(),
        score: post.score,
        comments: post.num_comments,
        subreddit: post.subreddit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, score: i64, comments: i64) -> ForumItem {
        ForumItem {
            id: id.to_string(),
            title: format!("Post {id}"),
            description: None,
            url: format!("https://reddit.com/r/buildapc/comments/{id}"),
            kind: ResultKind::Forum,
            source: SOURCE_NAME.to_string(),
            thumbnail: None,
            score,
            comments,
            subreddit: "buildapc".to_string(),
            created: "1/1/2024".to_string(),
        }
    }

    #[test]
    fn engagement_ranking_prefers_combined_metric() {
        let ranked = rank_by_engagement(vec![item("a", 10, 5), item("b", 3, 20)], 10);
        assert_eq!(ranked[0].id, "b");
        assert_eq!(ranked[1].id, "a");
    }

    #[test]
    fn ranking_truncates_and_keeps_tie_order() {
        let items = (0..15).map(|i| item(&i.to_string(), 1, 1)).collect();
        let ranked = rank_by_engagement(items, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].id, "0");
        assert_eq!(ranked[9].id, "9");
    }

    #[test]
    fn term_matching_is_case_insensitive() {
        let terms = vec!["nvidia".to_string(), "gpu".to_string()];
        assert!(matches_terms("New NVIDIA driver", "", &terms));
        assert!(matches_terms("Help", "my Gpu is loud", &terms));
        assert!(!matches_terms("Case fans", "airflow question", &terms));
    }

    #[test]
    fn thumbnail_sentinels_are_dropped() {
        assert_eq!(usable_thumbnail(Some("self")), None);
        assert_eq!(usable_thumbnail(Some("default")), None);
        assert_eq!(usable_thumbnail(Some("nsfw")), None);
        assert_eq!(usable_thumbnail(Some("")), None);
        assert_eq!(usable_thumbnail(None), None);
        assert_eq!(
            usable_thumbnail(Some("https://b.thumbs.redditmedia.com/x.jpg")).as_deref(),
            Some("https://b.thumbs.redditmedia.com/x.jpg")
        );
    }
}
