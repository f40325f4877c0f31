use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_REDDIT_API_BASE: &str = "https://www.reddit.com";
pub const DEFAULT_USER_AGENT: &str = "PCManualFinder/1.0";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
    pub youtube: YouTubeConfig,
    pub reddit: RedditConfig,
}

#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    /// No key means the video source is switched off.
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_results: u32,
    /// `videoDuration` filter; "medium" keeps 4 to 20 minute videos.
    pub video_duration: String,
    /// RFC 3339 lower bound for `publishedAfter`.
    pub published_after: String,
    pub timeout: Duration,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_YOUTUBE_API_BASE.to_string(),
            max_results: 10,
            video_duration: "medium".to_string(),
            published_after: "2020-01-01T00:00:00Z".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForumStrategy {
    /// Relevance-ranked search restricted to the community, last year only.
    Search,
    /// Community "hot" listing filtered locally by query terms.
    Hot,
}

impl FromStr for ForumStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "hot" | "trending" => Ok(Self::Hot),
            other => Err(ConfigError::Invalid(format!(
                "unknown forum strategy {other:?}, expected \"search\" or \"hot\""
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub base_url: String,
    pub user_agent: String,
    pub subreddits: Vec<String>,
    pub strategy: ForumStrategy,
    /// Posts requested from each community.
    pub per_subreddit_limit: u32,
    /// Listing size for the hot strategy before term filtering.
    pub hot_listing_limit: u32,
    /// Search recency window (`t` parameter).
    pub time_window: String,
    pub timeout: Duration,
    pub max_results: usize,
    pub fallback_subreddit: String,
    pub fallback_limit: usize,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REDDIT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            subreddits: [
                "buildapc",
                "pcmasterrace",
                "techsupport",
                "hardware",
                "AMD",
                "intel",
                "nvidia",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            strategy: ForumStrategy::Search,
            per_subreddit_limit: 5,
            hot_listing_limit: 25,
            time_window: "year".to_string(),
            timeout: Duration::from_secs(5),
            max_results: 10,
            fallback_subreddit: "buildapc".to_string(),
            fallback_limit: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: PathBuf::from("public"),
            youtube: YouTubeConfig::default(),
            reddit: RedditConfig::default(),
        }
    }
}

impl Config {
    /// Build from environment variables, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Config {
        let youtube_defaults = YouTubeConfig::default();
        let reddit_defaults = RedditConfig::default();

        let subreddits = get_env_opt("REDDIT_SUBREDDITS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or(reddit_defaults.subreddits);

        let strategy = match get_env_opt("REDDIT_STRATEGY") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring REDDIT_STRATEGY");
                reddit_defaults.strategy
            }),
            None => reddit_defaults.strategy,
        };

        Config {
            port: get_env_parsed("PORT", 3000),
            static_dir: PathBuf::from(get_env_or_default("STATIC_DIR", "public")),
            youtube: YouTubeConfig {
                api_key: get_env_opt("YOUTUBE_API_KEY"),
                base_url: get_env_or_default("YOUTUBE_API_BASE", &youtube_defaults.base_url),
                max_results: get_env_parsed("YOUTUBE_MAX_RESULTS", youtube_defaults.max_results),
                video_duration: get_env_or_default(
                    "YOUTUBE_VIDEO_DURATION",
                    &youtube_defaults.video_duration,
                ),
                published_after: get_env_or_default(
                    "YOUTUBE_PUBLISHED_AFTER",
                    &youtube_defaults.published_after,
                ),
                timeout: youtube_defaults.timeout,
            },
            reddit: RedditConfig {
                base_url: get_env_or_default("REDDIT_API_BASE", &reddit_defaults.base_url),
                user_agent: get_env_or_default("REDDIT_USER_AGENT", &reddit_defaults.user_agent),
                subreddits,
                strategy,
                timeout: Duration::from_secs(get_env_parsed(
                    "REDDIT_TIMEOUT_SECS",
                    reddit_defaults.timeout.as_secs(),
                )),
                ..reddit_defaults
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.youtube.max_results == 0 {
            return Err(ConfigError::Invalid(
                "YouTube max_results must be greater than 0".into(),
            ));
        }
        if self.reddit.max_results == 0 || self.reddit.per_subreddit_limit == 0 {
            return Err(ConfigError::Invalid(
                "Reddit result limits must be greater than 0".into(),
            ));
        }
        if self.youtube.timeout.is_zero() || self.reddit.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeouts must be greater than 0".into()));
        }
        if self.reddit.subreddits.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one subreddit must be configured".into(),
            ));
        }
        Ok(())
    }
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env_opt(key).unwrap_or_else(|| default.to_string())
}

fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    get_env_opt(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.youtube.max_results, 10);
        assert_eq!(config.youtube.video_duration, "medium");
        assert_eq!(config.youtube.published_after, "2020-01-01T00:00:00Z");
        assert_eq!(config.reddit.subreddits.len(), 7);
        assert_eq!(config.reddit.timeout, Duration::from_secs(5));
        assert_eq!(config.reddit.strategy, ForumStrategy::Search);
    }

    #[test]
    fn empty_subreddits_rejected() {
        let mut config = Config::default();
        config.reddit.subreddits.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = Config::default();
        config.reddit.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn strategy_parses() {
        assert_eq!("search".parse::<ForumStrategy>().unwrap(), ForumStrategy::Search);
        assert_eq!(" HOT ".parse::<ForumStrategy>().unwrap(), ForumStrategy::Hot);
        assert_eq!("trending".parse::<ForumStrategy>().unwrap(), ForumStrategy::Hot);
        assert!("newest".parse::<ForumStrategy>().is_err());
    }
}
