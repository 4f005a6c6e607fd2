use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::ports::{BookingRepository, GiraRepository, StaffRepository};
use crate::api::views::load_templates;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_gira_repo::PostgresGiraRepo,
    postgres_staff_repo::PostgresStaffRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_gira_repo::SqliteGiraRepo,
    sqlite_staff_repo::SqliteStaffRepo,
};

pub struct Repositories {
    pub gira_repo: Arc<dyn GiraRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub staff_repo: Arc<dyn StaffRepository>,
}

impl Repositories {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            gira_repo: Arc::new(SqliteGiraRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            staff_repo: Arc::new(SqliteStaffRepo::new(pool)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            gira_repo: Arc::new(PostgresGiraRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            staff_repo: Arc::new(PostgresStaffRepo::new(pool)),
        }
    }
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().map_err(AppError::Database)?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        sqlx::migrate!("./migrations/postgres")
            .run(&pool)
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))?;

        Repositories::postgres(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;

        Repositories::sqlite(pool)
    };

    let templates = load_templates()?;
    let state = AppState::new(config.clone(), repos, templates)?;

    match (&config.admin_username, &config.admin_password) {
        (Some(username), Some(password)) => state.auth_service.ensure_staff_account(username, password).await?,
        _ => warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set; no staff account bootstrapped"),
    }

    Ok(state)
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
