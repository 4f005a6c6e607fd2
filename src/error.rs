use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use crate::domain::models::booking::BookingRejection;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Booking rejected: {0:?}")]
    Booking(BookingRejection),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Stable machine-readable code sent next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => "INTERNAL",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION",
            AppError::Booking(rejection) => rejection.code(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Booking(BookingRejection::Failed) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Booking(BookingRejection::NoOpenGira) => StatusCode::NOT_FOUND,
            AppError::Booking(_) => StatusCode::CONFLICT,
        }
    }

    /// Message safe to show to a visitor. Database details never leak.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => "Internal error".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Booking(rejection) => rejection.message().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => error!("Database error: {:?}", e),
            AppError::InternalWithMsg(msg) => error!("Internal error: {}", msg),
            AppError::Booking(rejection) => warn!("Booking rejected: {:?}", rejection),
            _ => {}
        }

        let body = Json(json!({
            "error": self.public_message(),
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}
