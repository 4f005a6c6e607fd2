use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use crate::infra::repositories::classify::classify_booking_insert;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, gira_id, name, identity_key, first_visit, phone, email, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.gira_id).bind(&booking.name).bind(&booking.identity_key)
            .bind(booking.first_visit).bind(&booking.phone).bind(&booking.email).bind(&booking.notes)
            .bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(classify_booking_insert)
    }
    async fn count_by_gira(&self, gira_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE gira_id = ?").bind(gira_id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn exists_identity(&self, gira_id: &str, identity_key: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, String>("SELECT id FROM bookings WHERE gira_id = ? AND identity_key = ? LIMIT 1")
            .bind(gira_id).bind(identity_key).fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        Ok(found.is_some())
    }
    async fn list_by_gira(&self, gira_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE gira_id = ? ORDER BY created_at ASC").bind(gira_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
