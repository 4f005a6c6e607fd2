use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::api::extractors::auth::SESSION_COOKIE;
use std::convert::Infallible;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

/// Staff session if one is present and valid; visitors otherwise.
pub struct MaybeStaff(pub Option<Claims>);

impl FromRequestParts<Arc<AppState>> for MaybeStaff {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeStaff(None));
        };

        let Some(cookie) = cookies.get(SESSION_COOKIE) else {
            return Ok(MaybeStaff(None));
        };

        match state.auth_service.verify(cookie.value()) {
            Ok(claims) => Ok(MaybeStaff(Some(claims))),
            Err(_) => {
                // Expired or tampered token: treat as a visitor.
                debug!("Ignoring invalid staff session cookie");
                Ok(MaybeStaff(None))
            }
        }
    }
}
