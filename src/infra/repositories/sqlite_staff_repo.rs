use crate::domain::{models::staff::StaffUser, ports::StaffRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteStaffRepo {
    pool: SqlitePool,
}

impl SqliteStaffRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for SqliteStaffRepo {
    async fn create(&self, user: &StaffUser) -> Result<StaffUser, AppError> {
        sqlx::query_as::<_, StaffUser>(
            "INSERT INTO staff_users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?) RETURNING id, username, password_hash, created_at",
        )
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<StaffUser>, AppError> {
        sqlx::query_as::<_, StaffUser>(
            "SELECT id, username, password_hash, created_at FROM staff_users WHERE username = ?",
        )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
