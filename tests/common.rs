#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use tuluz_agendamento::{
    api::{router::create_router, views::load_templates},
    config::Config,
    infra::factory::{run_sqlite_migrations, Repositories},
    state::AppState,
};
use uuid::Uuid;

pub const STAFF_USERNAME: &str = "zelador";
pub const STAFF_PASSWORD: &str = "luz-amor-caridade";

pub struct AuthHeaders {
    pub session_token: String,
    pub csrf_token: String,
}

impl AuthHeaders {
    pub fn cookie(&self) -> String {
        format!("staff_session={}", self.session_token)
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            staff_session_minutes: 60,
            display_timezone: chrono_tz::America::Sao_Paulo,
            admin_username: None,
            admin_password: None,
        };

        let templates = load_templates().expect("Failed to load templates");
        let state = AppState::new(config, Repositories::sqlite(pool.clone()), templates)
            .expect("Failed to build app state");

        state.auth_service
            .ensure_staff_account(STAFF_USERNAME, STAFF_PASSWORD)
            .await
            .expect("Failed to create staff account");

        let state = Arc::new(state);
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn login(&self) -> AuthHeaders {
        let payload = json!({
            "username": STAFF_USERNAME,
            "password": STAFF_PASSWORD
        });

        let response = self.request(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let session_token = session_cookie(&response).expect("No staff_session cookie returned");
        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            session_token,
            csrf_token,
        }
    }

    /// Creates a gira through the admin API and returns its JSON.
    pub async fn create_gira(&self, auth: &AuthHeaders, payload: Value) -> Value {
        let response = self.request(
            Request::builder()
                .method("POST")
                .uri("/api/v1/admin/giras")
                .header(header::COOKIE, auth.cookie())
                .header("X-CSRF-Token", &auth.csrf_token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await;

        assert_eq!(response.status(), StatusCode::CREATED, "gira creation failed");
        parse_body(response).await
    }

    /// An active gira one week ahead with the given capacity.
    pub async fn open_gira(&self, capacity: i32) -> String {
        let auth = self.login().await;
        let date = (Utc::now() + Duration::days(7)).format("%Y-%m-%d").to_string();
        let gira = self.create_gira(&auth, json!({
            "title": "Gira de Caboclo",
            "date": date,
            "capacity": capacity,
            "active": true
        })).await;
        gira["id"].as_str().unwrap().to_string()
    }

    pub async fn book(&self, payload: Value) -> Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri("/api/v1/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await
    }

    pub async fn booking_count(&self, gira_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE gira_id = ?")
            .bind(gira_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub fn session_cookie(response: &Response) -> Option<String> {
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|c| c.starts_with("staff_session="))
        .map(|c| {
            let value = &c["staff_session=".len()..];
            value.split(';').next().unwrap_or_default().to_string()
        })
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
