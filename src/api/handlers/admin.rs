use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;
use crate::api::dtos::requests::{CreateGiraRequest, UpdateGiraRequest};
use crate::api::extractors::json::JsonBody;
use crate::api::extractors::auth::StaffAuth;
use crate::domain::models::gira::{Gira, GiraOccupancy, NewGiraParams};
use crate::domain::services::export::{attendees_csv, export_filename};
use crate::domain::services::gira_feed::GiraChange;
use crate::error::AppError;
use crate::state::AppState;

pub const INVALID_CAPACITY_MESSAGE: &str = "Defina uma capacidade válida (mínimo 1).";
pub const MISSING_DATE_MESSAGE: &str = "Informe a data da gira.";
pub const INVALID_DATE_MESSAGE: &str = "Data inválida. Use o formato AAAA-MM-DD.";
const GIRA_NOT_FOUND: &str = "Gira não encontrada.";

fn parse_gira_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation(MISSING_DATE_MESSAGE.into()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(INVALID_DATE_MESSAGE.into()))
}

fn check_capacity(capacity: i32) -> Result<i32, AppError> {
    if capacity < 1 {
        return Err(AppError::Validation(INVALID_CAPACITY_MESSAGE.into()));
    }
    Ok(capacity)
}

async fn load_gira(state: &AppState, gira_id: &str) -> Result<Gira, AppError> {
    state.gira_repo.find_by_id(gira_id).await?
        .ok_or(AppError::NotFound(GIRA_NOT_FOUND.into()))
}

pub async fn list_giras(
    State(state): State<Arc<AppState>>,
    _staff: StaffAuth,
) -> Result<impl IntoResponse, AppError> {
    let giras = state.gira_repo.list().await?;

    let mut result: Vec<GiraOccupancy> = Vec::with_capacity(giras.len());
    for gira in giras {
        result.push(state.booking_service.occupancy(gira).await?);
    }

    Ok(Json(result))
}

pub async fn create_gira(
    State(state): State<Arc<AppState>>,
    StaffAuth(claims): StaffAuth,
    JsonBody(payload): JsonBody<CreateGiraRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_gira_date(&payload.date)?;
    let capacity = check_capacity(payload.capacity)?;

    let gira = Gira::new(NewGiraParams {
        title: payload.title,
        date,
        capacity,
        kind: payload.kind,
        active: payload.active.unwrap_or(true),
    });

    let created = state.gira_repo.create(&gira).await?;
    state.gira_feed.publish(GiraChange::GiraCreated { gira: created.clone() });

    info!(gira_id = %created.id, staff = %claims.username, active = created.active, "Created gira");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_gira(
    State(state): State<Arc<AppState>>,
    StaffAuth(claims): StaffAuth,
    Path(gira_id): Path<String>,
    JsonBody(payload): JsonBody<UpdateGiraRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut gira = load_gira(&state, &gira_id).await?;

    if let Some(raw) = payload.date.as_deref() {
        gira.date = parse_gira_date(raw)?;
    }

    if let Some(cap) = payload.capacity {
        let cap = check_capacity(cap)?;
        let booked = state.booking_repo.count_by_gira(&gira.id).await?;
        if booked > i64::from(cap) {
            return Err(AppError::Conflict(format!(
                "Não é possível reduzir a capacidade para {}. Já existem {} agendamentos.",
                cap, booked
            )));
        }
        gira.capacity = cap;
    }

    if let Some(title) = payload.title {
        let title = title.trim();
        if !title.is_empty() {
            gira.title = title.to_string();
        }
    }

    if let Some(kind) = payload.kind {
        let kind = kind.trim();
        gira.kind = if kind.is_empty() { None } else { Some(kind.to_string()) };
    }

    if let Some(active) = payload.active {
        gira.active = active;
    }

    let updated = state.gira_repo.update(&gira).await?;
    state.gira_feed.publish(GiraChange::GiraUpdated { gira: updated.clone() });

    info!(gira_id = %updated.id, staff = %claims.username, active = updated.active, "Updated gira");
    Ok(Json(updated))
}

pub async fn list_attendees(
    State(state): State<Arc<AppState>>,
    _staff: StaffAuth,
    Path(gira_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let gira = load_gira(&state, &gira_id).await?;
    let bookings = state.booking_repo.list_by_gira(&gira.id).await?;
    Ok(Json(bookings))
}

pub async fn export_attendees(
    State(state): State<Arc<AppState>>,
    StaffAuth(claims): StaffAuth,
    Path(gira_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let gira = load_gira(&state, &gira_id).await?;
    let bookings = state.booking_repo.list_by_gira(&gira.id).await?;

    let body = attendees_csv(&bookings, state.config.display_timezone);
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&gira.title));

    info!(gira_id = %gira.id, rows = bookings.len(), staff = %claims.username, "Exported attendees");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_must_be_iso() {
        assert_eq!(parse_gira_date(" 2025-12-07 ").unwrap(), NaiveDate::from_ymd_opt(2025, 12, 7).unwrap());
        assert!(matches!(parse_gira_date("07/12/2025"), Err(AppError::Validation(m)) if m == INVALID_DATE_MESSAGE));
        assert!(matches!(parse_gira_date(""), Err(AppError::Validation(m)) if m == MISSING_DATE_MESSAGE));
    }

    #[test]
    fn capacity_must_be_positive() {
        assert_eq!(check_capacity(1).unwrap(), 1);
        assert!(matches!(check_capacity(0), Err(AppError::Validation(_))));
        assert!(matches!(check_capacity(-3), Err(AppError::Validation(_))));
    }
}
