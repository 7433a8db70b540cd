use crate::models::tariff::Tariff;
use crate::utils::errors::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Advisory lock key serialising tariff writes for one vehicle category.
pub fn category_lock_key(vehicle_category_id: Uuid) -> i64 {
    let bits = vehicle_category_id.as_u128();
    ((bits >> 64) as u64 ^ bits as u64) as i64
}

pub struct TariffRepository {
    pool: PgPool,
}

impl TariffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active tariffs of one vehicle category, including every capacity band.
    pub async fn active_for_category(&self, vehicle_category_id: Uuid) -> Result<Vec<Tariff>, AppError> {
        let tariffs = sqlx::query_as::<_, Tariff>(
            r#"
            SELECT * FROM tariffs
            WHERE vehicle_category_id = $1 AND is_active = TRUE
            ORDER BY effective_from
            "#
        )
        .bind(vehicle_category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tariffs)
    }

    /// Open a transaction holding the category's advisory lock until it
    /// commits or rolls back.
    pub async fn lock_category(
        &self,
        vehicle_category_id: Uuid,
    ) -> Result<Transaction<'static, Postgres>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(category_lock_key(vehicle_category_id))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    pub async fn active_for_category_in(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_category_id: Uuid,
    ) -> Result<Vec<Tariff>, AppError> {
        let tariffs = sqlx::query_as::<_, Tariff>(
            r#"
            SELECT * FROM tariffs
            WHERE vehicle_category_id = $1 AND is_active = TRUE
            ORDER BY effective_from
            "#
        )
        .bind(vehicle_category_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(tariffs)
    }

    pub async fn create_in(
        tx: &mut Transaction<'_, Postgres>,
        tariff: &Tariff,
    ) -> Result<Tariff, AppError> {
        let created = sqlx::query_as::<_, Tariff>(
            r#"
            INSERT INTO tariffs (
                id, vehicle_category_id, engine_capacity_band_id, rate_type, rate,
                effective_from, effective_to, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#
        )
        .bind(tariff.id)
        .bind(tariff.vehicle_category_id)
        .bind(tariff.engine_capacity_band_id)
        .bind(tariff.rate_type)
        .bind(tariff.rate)
        .bind(tariff.effective_from)
        .bind(tariff.effective_to)
        .bind(tariff.is_active)
        .bind(tariff.created_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(created)
    }
}
