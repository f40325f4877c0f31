#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Barrier;

use pcguide::data_models::{ForumItem, ResultKind, VideoItem};
use pcguide::error::SourceError;
use pcguide::query::SearchQuery;
use pcguide::sources::ContentSource;

pub enum Behavior {
    Items(usize),
    Fail,
    Panic,
    /// Wait for the other source before answering.
    Rendezvous(Arc<Barrier>, usize),
}

/// In-memory source producing numbered items.
pub struct StubSource<T> {
    name: &'static str,
    behavior: Behavior,
    make: fn(usize) -> T,
    calls: AtomicUsize,
}

impl<T> StubSource<T> {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: Send> ContentSource for StubSource<T> {
    type Item = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<T>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Items(n) => Ok((0..*n).map(self.make).collect()),
            Behavior::Fail => Err(SourceError::Client("stub failure".into())),
            Behavior::Panic => panic!("stub source exploded"),
            Behavior::Rendezvous(barrier, n) => {
                barrier.wait().await;
                Ok((0..*n).map(self.make).collect())
            }
        }
    }
}

pub fn video_source(behavior: Behavior) -> StubSource<VideoItem> {
    StubSource {
        name: "stub-videos",
        behavior,
        make: video,
        calls: AtomicUsize::new(0),
    }
}

pub fn forum_source(behavior: Behavior) -> StubSource<ForumItem> {
    StubSource {
        name: "stub-forums",
        behavior,
        make: forum,
        calls: AtomicUsize::new(0),
    }
}

pub fn video(i: usize) -> VideoItem {
    VideoItem {
        id: format!("vid{i}"),
        title: format!("Video {i}"),
        description: Some("How to install it".to_string()),
        url: format!("https://www.youtube.com/watch?v=vid{i}"),
        kind: ResultKind::Video,
        source: "YouTube".to_string(),
        thumbnail: None,
        channel_title: "Builds".to_string(),
        published_at: "2023-01-01T00:00:00Z".to_string(),
        duration: "10:00".to_string(),
        view_count: "1,000".to_string(),
    }
}

pub fn forum(i: usize) -> ForumItem {
    ForumItem {
        id: format!("post{i}"),
        title: format!("Post {i}"),
        description: None,
        url: format!("https://reddit.com/r/buildapc/comments/post{i}"),
        kind: ResultKind::Forum,
        source: "Reddit".to_string(),
        thumbnail: None,
        score: 10,
        comments: i as i64,
        subreddit: "buildapc".to_string(),
        created: "1/1/2024".to_string(),
    }
}
