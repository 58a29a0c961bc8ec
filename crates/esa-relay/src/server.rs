//! HTTP surface of the relay.
//!
//! - `GET /`: static landing page
//! - `GET /mcp-data`: every post of the first upstream page, normalized
//! - `POST /search`: case-insensitive substring search over the same data
//!
//! Every data request hits esa.io afresh; nothing is cached between requests.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info};

use esa_common::esa::{EsaClient, EsaClientError};
use esa_common::mcp_api::{normalize, NormalizedDocument, SearchRequest, SearchResponse};

use crate::error::AppError;
use crate::search::filter_documents;

const INDEX_HTML: &str = r#"
    <h1>ESA MCP Server</h1>
    <p>The server is running.</p>
    <p>API endpoints:</p>
    <ul>
      <li><a href="/mcp-data">/mcp-data</a> - esa.io posts in MCP format</li>
      <li>/search (POST) - search esa.io posts</li>
    </ul>
"#;

pub fn router(esa: EsaClient) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/mcp-data", get(mcp_data))
        .route("/search", post(search))
        .with_state(Arc::new(esa))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn mcp_data(
    State(esa): State<Arc<EsaClient>>,
) -> Result<Json<Vec<NormalizedDocument>>, AppError> {
    let documents = fetch_documents(&esa).await.map_err(AppError::Fetch)?;
    Ok(Json(documents))
}

/// The body is parsed leniently: a missing body, invalid JSON, or a
/// non-string `query` all count as "no query".
async fn search(
    State(esa): State<Arc<EsaClient>>,
    body: Bytes,
) -> Result<Json<SearchResponse>, AppError> {
    let request: SearchRequest = serde_json::from_slice(&body).unwrap_or_default();
    let query = request
        .query
        .filter(|q| !q.is_empty())
        .ok_or(AppError::MissingQuery)?;

    let documents = fetch_documents(&esa).await.map_err(AppError::Processing)?;
    let results = filter_documents(documents, &query);
    info!(query = %query, matches = results.len(), "search completed");
    Ok(Json(SearchResponse::from(results)))
}

async fn fetch_documents(esa: &EsaClient) -> Result<Vec<NormalizedDocument>, EsaClientError> {
    let posts = esa.fetch_posts().await.inspect_err(|e| {
        error!(error = %e, team = %esa.config().team_name, "esa.io API error");
    })?;
    Ok(normalize(posts))
}
