// Route exports
pub mod account;
pub mod admin;
pub mod chatbot;
pub mod guard;
pub mod landlord;
pub mod listings;

use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::models::ErrorResponse;
use crate::services::{PasswordHasher, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub hasher: PasswordHasher,
}

/// Mount the chatbot at the root and everything else under `/api/v1`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(chatbot::configure).service(
        web::scope("/api/v1")
            .configure(listings::configure)
            .configure(account::configure)
            .configure(admin::configure)
            .configure(landlord::configure),
    );
}

/// JSON body for a failed request
pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

/// Log a store failure and answer 500
pub fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, context, err.to_string())
}

pub fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {}", errors);
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string())
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}
