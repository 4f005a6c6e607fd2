use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;
use crate::domain::models::booking::BookingInput;
use crate::api::extractors::json::JsonBody;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<BookingInput>,
) -> Result<impl IntoResponse, AppError> {
    let confirmation = state.booking_service.submit(payload).await?;

    info!(
        booking_id = %confirmation.booking.id,
        gira_id = %confirmation.booking.gira_id,
        remaining = confirmation.remaining,
        "booking created"
    );

    Ok((StatusCode::CREATED, Json(confirmation)))
}
