//! HTTP transport: maps the `/pmservice` routes onto [`PmService`].
//!
//! ## Routes
//!
//! - `GET /pmservice` — every document.
//! - `GET /pmservice/query?error=&factor=&value=[&amount=|&startDate=&endDate=]`
//!   — filtered documents with simulated measurement error.
//! - `GET /pmservice/:id` — array with the matching document, or empty.
//! - `DELETE /pmservice/:id` — 200 whether or not a document matched.
//!   `DELETE /pmservice/query` is a malformed id (400), not a 405.
//!
//! Errors are returned as `{ "error": "<message>" }` with the status from
//! [`ServiceError::status_code`].

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::errors::ServiceError;
use crate::resolver::QueryParams;
use crate::service::PmService;

pub const BASE_PATH: &str = "/pmservice";

type ApiResult = Result<Json<Vec<Value>>, ServiceError>;

/// Build an axum `Router` serving the given service.
pub fn router(service: Arc<PmService>) -> Router {
    Router::new()
        .route(BASE_PATH, get(find_all_handler))
        .route(&format!("{BASE_PATH}/query"), get(query_handler).delete(delete_query_handler))
        .route(&format!("{BASE_PATH}/:id"), get(find_by_id_handler).delete(delete_handler))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:8080"`).
pub async fn serve(service: Arc<PmService>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}

async fn find_all_handler(State(service): State<Arc<PmService>>) -> ApiResult {
    log::debug!("GET {BASE_PATH}");
    service.find_all().map(Json)
}

async fn find_by_id_handler(State(service): State<Arc<PmService>>, Path(id): Path<String>) -> ApiResult {
    log::debug!("GET {BASE_PATH}/{id}");
    service.find_by_id(&id).map(Json)
}

async fn query_handler(
    State(service): State<Arc<PmService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult {
    let params = QueryParams::from(pairs);
    log::debug!("GET {BASE_PATH}/query {params:?}");
    service.find_by_params(&params).map(Json)
}

async fn delete_handler(
    State(service): State<Arc<PmService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    service.delete(&id)?;
    Ok(StatusCode::OK)
}

// `/query` shadows the `:id` template for every method, so a delete aimed
// at it gets the same identifier check as any other malformed id.
async fn delete_query_handler(State(service): State<Arc<PmService>>) -> Result<StatusCode, ServiceError> {
    service.delete("query")?;
    Ok(StatusCode::OK)
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.is_client_error() {
            log::warn!("rejected request: {self}");
        } else {
            log::error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
