use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use esa_common::esa::EsaClientError;
use esa_common::mcp_api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("query is required")]
    MissingQuery,

    /// Upstream failure on `GET /mcp-data`.
    #[error("failed to fetch data from esa.io")]
    Fetch(#[source] EsaClientError),

    /// Upstream failure on `POST /search`. The wording differs from `Fetch`
    /// and both messages are part of the HTTP contract.
    #[error("an error occurred while processing the request")]
    Processing(#[source] EsaClientError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingQuery => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Fetch(_) | AppError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
