use axum::{Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::aggregator::Aggregator;
use crate::data_models::{ForumItem, VideoItem};
use crate::sources::ContentSource;

pub mod handlers;
pub mod models;

pub fn create_router<V, F>(aggregator: Arc<Aggregator<V, F>>, static_dir: impl AsRef<Path>) -> Router
where
    V: ContentSource<Item = VideoItem> + 'static,
    F: ContentSource<Item = ForumItem> + 'static,
{
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/search", get(handlers::search_handler::<V, F>))
        .with_state(aggregator)
        // Static file serving for the UI
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
}
