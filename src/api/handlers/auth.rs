use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::info;
use crate::api::dtos::requests::LoginRequest;
use crate::api::extractors::json::JsonBody;
use crate::api::extractors::auth::SESSION_COOKIE;
use crate::domain::models::auth::{AuthResponse, StaffProfile};
use crate::error::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, access_jwt, csrf_token) = state.auth_service
        .login(&payload.username, &payload.password)
        .await?;

    set_session_cookie(&cookies, &access_jwt, state.auth_service.session_minutes());

    info!("Staff logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token,
        user: StaffProfile {
            id: user.id,
            username: user.username,
        },
    }))
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    clear_session_cookie(&cookies);
    info!("Staff logged out");
    StatusCode::OK
}

pub fn set_session_cookie(cookies: &Cookies, token: &str, minutes: i64) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(Duration::minutes(minutes));
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies) {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
}
