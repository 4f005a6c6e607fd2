use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

pub const SESSION_COOKIE: &str = "staff_session";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// A signed-in staff member. Non-safe methods must echo the CSRF token from the login response.
pub struct StaffAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for StaffAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(AppError::Internal)?;

        let access_token = cookies.get(SESSION_COOKIE)
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let claims = state.auth_service.verify(&access_token)?;

        let method = &parts.method;
        if method != Method::GET && method != Method::HEAD && method != Method::OPTIONS {
            let csrf_header_val = parts.headers.get(CSRF_HEADER)
                .ok_or(AppError::Forbidden("Missing CSRF token".into()))?
                .to_str()
                .map_err(|_| AppError::Forbidden("Invalid CSRF token".into()))?;

            if csrf_header_val != claims.csrf_token {
                return Err(AppError::Forbidden("Invalid CSRF token".into()));
            }
        }

        Span::current().record("staff_id", claims.sub.as_str());

        Ok(StaffAuth(claims))
    }
}
