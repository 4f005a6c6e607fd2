use crate::domain::{models::gira::Gira, ports::GiraRepository};
use crate::error::AppError;
use crate::infra::repositories::classify::{classify_gira_update, CAPACITY_BELOW_BOOKINGS};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresGiraRepo {
    pool: PgPool,
}

impl PostgresGiraRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn deactivate_others(tx: &mut Transaction<'_, Postgres>, keep_id: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE giras SET active = FALSE WHERE active = TRUE AND id != $1")
        .bind(keep_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl GiraRepository for PostgresGiraRepo {
    async fn create(&self, gira: &Gira) -> Result<Gira, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if gira.active {
            deactivate_others(&mut tx, &gira.id).await?;
        }
        let created = sqlx::query_as::<_, Gira>(
            r#"INSERT INTO giras (id, date, title, capacity, kind, active, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
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
        sqlx::query_as::<_, Gira>("SELECT * FROM giras WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active(&self) -> Result<Option<Gira>, AppError> {
        sqlx::query_as::<_, Gira>("SELECT * FROM giras WHERE active = TRUE ORDER BY date ASC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn is_active(&self, id: &str) -> Result<Option<bool>, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT active FROM giras WHERE id = $1")
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

        // Same row lock the booking trigger takes, so inserts wait for this transaction.
        sqlx::query("SELECT id FROM giras WHERE id = $1 FOR UPDATE")
            .bind(&gira.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Gira not found".into()))?;

        if gira.active {
            deactivate_others(&mut tx, &gira.id).await?;
        }
        let updated = sqlx::query_as::<_, Gira>(
            r#"UPDATE giras SET date=$1, title=$2, capacity=$3, kind=$4, active=$5
               WHERE id=$6 AND (SELECT COUNT(*) FROM bookings WHERE gira_id = $6) <= $3
               RETURNING *"#
        )
            .bind(gira.date)
            .bind(&gira.title)
            .bind(gira.capacity)
            .bind(&gira.kind)
            .bind(gira.active)
            .bind(&gira.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(classify_gira_update)?
            .ok_or(AppError::Conflict(CAPACITY_BELOW_BOOKINGS.into()))?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
