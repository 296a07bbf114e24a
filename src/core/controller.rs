use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

#[derive(Clone)]
pub struct AppState {
    pub config: Configuration,
    pub catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(config: Configuration, catalog: Arc<dyn CatalogService>) -> AppState {
        AppState {
            config,
            catalog,
        }
    }
}

// ErrorEntry is the single element of an error body: [{"logref": "error", "message": "..."}]
#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEntry {
    pub logref: String,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(message: &str) -> Self {
        Self {
            logref: "error".to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ServerError {
    pub status: StatusCode,
    pub message: String,
}

impl ServerError {
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    ServerError::bad_request(format!("{}", err).as_str())
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Database { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandError::DuplicateKey { .. } => {
                StatusCode::CONFLICT
            }
            CommandError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            CommandError::Runtime { retryable: true, .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CommandError::Runtime { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandError::Serialization { .. } => {
                StatusCode::BAD_REQUEST
            }
            CommandError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
        };
        ServerError::new(status, err.message())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("request failed with {}: {}", self.status, self.message);
        }
        (self.status, Json(vec![ErrorEntry::new(self.message.as_str())])).into_response()
    }
}
