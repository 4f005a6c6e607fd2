use crate::domain::{models::gira::Gira, ports::GiraRepository};
use crate::error::AppError;
use crate::infra::repositories::classify::{classify_gira_update, CAPACITY_BELOW_BOOKINGS};
use async_trait::async_trait;
use sqlx::{SqlitePool, Sqlite, Transaction};

pub struct SqliteGiraRepo {
    pool: SqlitePool,
}

impl SqliteGiraRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn deactivate_others(tx: &mut Transaction<'_, Sqlite>, keep_id: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE giras SET active = 0 WHERE active = 1 AND id != ?")
        .bind(keep_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl GiraRepository for SqliteGiraRepo {
    async fn create(&self, gira: &Gira) -> Result<Gira, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if gira.active {
            deactivate_others(&mut tx, &gira.id).await?;
        }
        let created = sqlx::query_as::<_, Gira>(
            r#"INSERT INTO giras (id, date, title, capacity, kind, active, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&gira.id)
            .bind(gira.date)
            .bind(&gira.title)
            .bind(gira.capacity)
            .bind(&gira.kind)
            .bind(gira.active)
            .bind(gira.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Gira>, AppError> {
        sqlx::query_as::<_, Gira>("SELECT * FROM giras WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active(&self) -> Result<Option<Gira>, AppError> {
        sqlx::query_as::<_, Gira>("SELECT * FROM giras WHERE active = 1 ORDER BY date ASC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn is_active(&self, id: &str) -> Result<Option<bool>, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT active FROM giras WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Gira>, AppError> {
        sqlx::query_as::<_, Gira>("SELECT * FROM giras ORDER BY date DESC, created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, gira: &Gira) -> Result<Gira, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Take the write lock before anything is counted so no booking lands in between.
        let found = sqlx::query("UPDATE giras SET active = active WHERE id = ?")
            .bind(&gira.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if found.rows_affected() == 0 {
            return Err(AppError::NotFound("Gira not found".into()));
        }

        if gira.active {
            deactivate_others(&mut tx, &gira.id).await?;
        }
        let updated = sqlx::query_as::<_, Gira>(
            r#"UPDATE giras SET date=?, title=?, capacity=?, kind=?, active=?
               WHERE id=? AND (SELECT COUNT(*) FROM bookings WHERE gira_id = ?) <= ?
               RETURNING *"#
        )
            .bind(gira.date)
            .bind(&gira.title)
            .bind(gira.capacity)
            .bind(&gira.kind)
            .bind(gira.active)
            .bind(&gira.id)
            .bind(&gira.id)
            .bind(gira.capacity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(classify_gira_update)?
            .ok_or(AppError::Conflict(CAPACITY_BELOW_BOOKINGS.into()))?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
