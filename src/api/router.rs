use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{admin, auth, booking, gira, health, pages};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Pages
        .route("/", get(pages::landing).post(pages::landing_submit))
        .route("/agendar", get(pages::booking_form).post(pages::booking_form_submit))
        .route("/admin", get(pages::admin))
        .route("/admin/login", post(pages::admin_login))
        .route("/admin/logout", post(pages::admin_logout))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Public booking flow
        .route("/api/v1/giras/active", get(gira::get_active_gira))
        .route("/api/v1/giras/events", get(gira::gira_events))
        .route("/api/v1/bookings", post(booking::create_booking))

        // Admin
        .route("/api/v1/admin/giras", get(admin::list_giras).post(admin::create_gira))
        .route("/api/v1/admin/giras/{gira_id}", put(admin::update_gira))
        .route("/api/v1/admin/giras/{gira_id}/bookings", get(admin::list_attendees))
        .route("/api/v1/admin/giras/{gira_id}/export.csv", get(admin::export_attendees))

        .fallback(pages::not_found)

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        staff_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}