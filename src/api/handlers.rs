use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use std::sync::Arc;
use std::time::Instant;

use crate::aggregator::Aggregator;
use crate::data_models::{ForumItem, SearchResponse, VideoItem};
use crate::query::SearchRequest;
use crate::sources::ContentSource;

use super::models::ApiError;

pub async fn search_handler<V, F>(
    State(aggregator): State<Arc<Aggregator<V, F>>>,
    request: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError>
where
    V: ContentSource<Item = VideoItem> + 'static,
    F: ContentSource<Item = ForumItem> + 'static,
{
    let start = Instant::now();

    let Query(request) = request.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // Aggregation runs as its own task so that an unexpected fault becomes a
    // 500 for this request rather than a dropped connection.
    let task = tokio::spawn(async move { aggregator.search(&request).await });

    let response = match task.await {
        Ok(Ok(response)) => response,
        Ok(Err(invalid)) => return Err(ApiError::BadRequest(invalid.to_string())),
        Err(err) => {
            tracing::error!(error = %err, "search task failed");
            return Err(ApiError::Internal);
        }
    };

    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search request served"
    );
    Ok(Json(response))
}
