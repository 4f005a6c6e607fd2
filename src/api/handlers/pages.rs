use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;
use tracing::{error, info, warn};
use crate::api::dtos::requests::{AdminLoginForm, AdminLogoutForm, AdminPageQuery, BookingFormRequest};
use crate::api::extractors::maybe_auth::MaybeStaff;
use crate::api::handlers::auth::{clear_session_cookie, set_session_cookie};
use crate::api::views::{
    render, AdminPageState, AttendeeRow, BookingFormFields, BookingPageState, GiraOption,
    LOAD_ATTENDEES_FAILED, LOAD_GIRAS_FAILED,
};
use crate::domain::models::auth::Claims;
use crate::domain::models::gira::{Gira, GiraOccupancy};
use crate::error::AppError;
use crate::state::AppState;

const INVALID_LOGIN_MESSAGE: &str = "Usuário ou senha inválidos.";

async fn booking_page(state: &AppState) -> BookingPageState {
    match state.booking_service.availability().await {
        Ok(availability) => BookingPageState::from_availability(availability),
        Err(e) => {
            error!("Failed to load active gira: {}", e);
            BookingPageState::load_failed()
        }
    }
}

fn render_booking(state: &AppState, template: &str, action: &str, page: &BookingPageState) -> Result<Html<String>, AppError> {
    let mut ctx = page.context()?;
    ctx.insert("form_action", action);
    Ok(Html(render(&state.templates, template, &ctx)?))
}

async fn submit_booking_form(
    state: &AppState,
    template: &str,
    action: &str,
    form: BookingFormRequest,
) -> Result<Response, AppError> {
    let outcome = state.booking_service.submit(form.to_input()).await;
    let mut page = booking_page(state).await;

    let status = match outcome {
        Ok(confirmation) => {
            info!(booking_id = %confirmation.booking.id, "booking created from page form");
            page.apply_success(&confirmation);
            StatusCode::OK
        }
        Err(e) => {
            warn!("Booking form rejected: {}", e);
            let status = e.status();
            page.apply_error(BookingFormFields::from(&form), &e);
            status
        }
    };

    Ok((status, render_booking(state, template, action, &page)?).into_response())
}

pub async fn landing(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = booking_page(&state).await;
    render_booking(&state, "index.html", "/", &page)
}

pub async fn landing_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BookingFormRequest>,
) -> Result<Response, AppError> {
    submit_booking_form(&state, "index.html", "/", form).await
}

pub async fn booking_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = booking_page(&state).await;
    render_booking(&state, "agendar.html", "/agendar", &page)
}

pub async fn booking_form_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BookingFormRequest>,
) -> Result<Response, AppError> {
    submit_booking_form(&state, "agendar.html", "/agendar", form).await
}

fn login_page(state: &AppState, status: StatusCode, error: Option<&str>) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("error", &error);
    Ok((status, Html(render(&state.templates, "admin_login.html", &ctx)?)).into_response())
}

/// Picks the requested gira, else the active one, else the most recent.
fn pick_selected<'a>(giras: &'a [Gira], requested: Option<&str>) -> Option<&'a Gira> {
    requested
        .and_then(|id| giras.iter().find(|g| g.id == id))
        .or_else(|| giras.iter().find(|g| g.active))
        .or_else(|| giras.first())
}

async fn admin_dashboard(state: &AppState, claims: Claims, requested: Option<&str>) -> Result<AdminPageState, AppError> {
    let mut page = AdminPageState {
        username: claims.username,
        csrf_token: claims.csrf_token,
        ..AdminPageState::default()
    };

    let giras = match state.gira_repo.list().await {
        Ok(giras) => giras,
        Err(e) => {
            error!("Failed to list giras: {}", e);
            page.error = Some(LOAD_GIRAS_FAILED.to_string());
            return Ok(page);
        }
    };

    let selected = pick_selected(&giras, requested).cloned();
    page.giras = giras
        .iter()
        .map(|g| GiraOption {
            id: g.id.clone(),
            label: AdminPageState::gira_label(g),
            selected: selected.as_ref().is_some_and(|s| s.id == g.id),
        })
        .collect();

    let Some(gira) = selected else {
        return Ok(page);
    };

    let tz = state.config.display_timezone;
    match state.booking_repo.list_by_gira(&gira.id).await {
        Ok(bookings) => {
            let booked = bookings.len() as i64;
            page.attendees = bookings.into_iter().map(|b| AttendeeRow::new(b, tz)).collect();
            page.selected = Some(GiraOccupancy::new(gira, booked));
        }
        Err(e) => {
            error!("Failed to list bookings for gira {}: {}", gira.id, e);
            page.error = Some(LOAD_ATTENDEES_FAILED.to_string());
        }
    }

    Ok(page)
}

pub async fn admin(
    State(state): State<Arc<AppState>>,
    MaybeStaff(claims): MaybeStaff,
    Query(query): Query<AdminPageQuery>,
) -> Result<Response, AppError> {
    let Some(claims) = claims else {
        return login_page(&state, StatusCode::OK, None);
    };

    let page = admin_dashboard(&state, claims, query.gira.as_deref()).await?;
    let html = render(&state.templates, "admin.html", &page.context()?)?;
    Ok(Html(html).into_response())
}

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(form): Form<AdminLoginForm>,
) -> Result<Response, AppError> {
    match state.auth_service.login(form.username.trim(), &form.password).await {
        Ok((user, access_jwt, _csrf)) => {
            set_session_cookie(&cookies, &access_jwt, state.auth_service.session_minutes());
            info!("Staff logged in through admin page: {}", user.id);
            Ok(Redirect::to("/admin").into_response())
        }
        Err(AppError::Unauthorized) => login_page(&state, StatusCode::UNAUTHORIZED, Some(INVALID_LOGIN_MESSAGE)),
        Err(e) => Err(e),
    }
}

pub async fn admin_logout(
    cookies: Cookies,
    MaybeStaff(claims): MaybeStaff,
    Form(form): Form<AdminLogoutForm>,
) -> Result<Response, AppError> {
    if let Some(claims) = claims
        && claims.csrf_token != form.csrf_token
    {
        return Err(AppError::Forbidden("Invalid CSRF token".into()));
    }

    clear_session_cookie(&cookies);
    Ok(Redirect::to("/admin").into_response())
}

pub async fn not_found(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let html = render(&state.templates, "not_found.html", &Context::new())?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}
