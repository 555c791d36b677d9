//! JSON API over the content collections

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::content::{ContentItem, ContentRepository, ContentSummary, YearGroup};
use crate::Site;

/// Errors returned to API clients
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Filters for the item listing
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Build the API router
pub fn router(site: Arc<Site>) -> Router {
    Router::new()
        .route("/api", get(collections_handler))
        .route("/api/:collection", get(list_handler))
        .route("/api/:collection/categories", get(categories_handler))
        .route("/api/:collection/latest", get(latest_handler))
        .route("/api/:collection/archive", get(archive_handler))
        .route("/api/:collection/items/:slug", get(item_handler))
        .route("/api/:collection/refresh", post(refresh_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(site)
}

/// Start the API server
pub async fn start(site: Site, ip: &str, port: u16) -> Result<()> {
    let app = router(Arc::new(site));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving content API at http://{}:{}/api", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a repository query on the blocking pool.
/// Repositories read the filesystem synchronously on a cache miss.
async fn query<T, F>(site: Arc<Site>, collection: String, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&ContentRepository) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        site.collection(&collection)
            .map(f)
            .ok_or_else(|| ApiError::NotFound(format!("Unknown collection: {}", collection)))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
}

async fn collections_handler(State(site): State<Arc<Site>>) -> Json<Vec<String>> {
    Json(
        site.collection_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

async fn list_handler(
    State(site): State<Arc<Site>>,
    Path(collection): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ContentSummary>>, ApiError> {
    let items = query(site, collection, move |repo| filter_items(repo, &params)).await?;
    Ok(Json(items.iter().map(ContentSummary::from).collect()))
}

fn filter_items(repo: &ContentRepository, params: &ListParams) -> Vec<ContentItem> {
    let items = match &params.category {
        Some(category) => repo.get_by_category(category),
        None => repo.get_all(),
    };

    match &params.q {
        Some(q) => {
            let q = q.to_lowercase();
            items.into_iter().filter(|item| item.matches(&q)).collect()
        }
        None => items,
    }
}

async fn categories_handler(
    State(site): State<Arc<Site>>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let categories = query(site, collection, |repo| repo.get_categories()).await?;
    Ok(Json(categories))
}

async fn latest_handler(
    State(site): State<Arc<Site>>,
    Path(collection): Path<String>,
) -> Result<Json<ContentSummary>, ApiError> {
    let latest = query(site, collection.clone(), |repo| repo.latest()).await?;
    latest
        .as_ref()
        .map(|item| Json(item.into()))
        .ok_or_else(|| ApiError::NotFound(format!("{} is empty", collection)))
}

async fn archive_handler(
    State(site): State<Arc<Site>>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<YearGroup>>, ApiError> {
    let groups = query(site, collection, |repo| repo.by_year()).await?;
    Ok(Json(groups))
}

async fn item_handler(
    State(site): State<Arc<Site>>,
    Path((collection, slug)): Path<(String, String)>,
) -> Result<Json<ContentItem>, ApiError> {
    let lookup = slug.clone();
    let item = query(site, collection, move |repo| repo.get_by_slug(&lookup)).await?;
    item.map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No item with slug: {}", slug)))
}

async fn refresh_handler(
    State(site): State<Arc<Site>>,
    Path(collection): Path<String>,
) -> Result<StatusCode, ApiError> {
    query(site, collection, |repo| repo.invalidate()).await?;
    Ok(StatusCode::NO_CONTENT)
}
