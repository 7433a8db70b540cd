use crate::models::vehicle_master::{EngineCapacity, VehicleMake, VehicleModel, VehicleYear};
use crate::services::vehicle_import_service::ReferenceData;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct VehicleMasterRepository {
    pool: PgPool,
}

impl VehicleMasterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn active_makes(&self) -> Result<Vec<VehicleMake>, AppError> {
        let makes = sqlx::query_as::<_, VehicleMake>(
            "SELECT id, name_en, name_ar, is_active FROM vehicle_makes WHERE is_active = TRUE"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(makes)
    }

    pub async fn active_models(&self) -> Result<Vec<VehicleModel>, AppError> {
        let models = sqlx::query_as::<_, VehicleModel>(
            "SELECT id, make_id, name_en, name_ar, is_active FROM vehicle_models WHERE is_active = TRUE"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(models)
    }

    pub async fn active_models_for_make(&self, make_id: Uuid) -> Result<Vec<VehicleModel>, AppError> {
        let models = sqlx::query_as::<_, VehicleModel>(
            r#"
            SELECT id, make_id, name_en, name_ar, is_active
            FROM vehicle_models
            WHERE make_id = $1 AND is_active = TRUE
            "#
        )
        .bind(make_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(models)
    }

    pub async fn active_years(&self) -> Result<Vec<VehicleYear>, AppError> {
        let years = sqlx::query_as::<_, VehicleYear>(
            "SELECT id, year, is_active FROM vehicle_years WHERE is_active = TRUE ORDER BY year DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(years)
    }

    pub async fn active_capacities(&self) -> Result<Vec<EngineCapacity>, AppError> {
        let capacities = sqlx::query_as::<_, EngineCapacity>(
            r#"
            SELECT id, capacity, name_en, name_ar, is_active
            FROM engine_capacities
            WHERE is_active = TRUE
            ORDER BY capacity
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(capacities)
    }

    /// Everything the importer resolves against, loaded once per import.
    pub async fn load_reference_data(&self) -> Result<ReferenceData, AppError> {
        Ok(ReferenceData {
            makes: self.active_makes().await?,
            models: self.active_models().await?,
            years: self.active_years().await?,
            capacities: self.active_capacities().await?,
        })
    }
}
