use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::common_dto::ApiResponse;
use crate::dto::tariff_dto::CreateTariffRequest;
use crate::models::tariff::Tariff;
use crate::repositories::tariff_repository::TariffRepository;
use crate::services::tariff_service::{build_tariff, find_overlap};
use crate::utils::errors::{conflict_error, AppError};

pub struct TariffController {
    repository: TariffRepository,
}

impl TariffController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TariffRepository::new(pool),
        }
    }

    /// Overlap check and insert run under the category's advisory lock, so
    /// concurrent requests for one category are serialised.
    pub async fn create(&self, request: CreateTariffRequest) -> Result<ApiResponse<Tariff>, AppError> {
        let candidate = build_tariff(request)?;

        let mut tx = self
            .repository
            .lock_category(candidate.vehicle_category_id)
            .await?;
        let existing =
            TariffRepository::active_for_category_in(&mut tx, candidate.vehicle_category_id).await?;

        if let Some(overlapping) = find_overlap(&existing, &candidate) {
            warn!(
                "❌ Tariff for category {} overlaps tariff {}",
                candidate.vehicle_category_id, overlapping.id
            );
            return Err(overlap_error(overlapping));
        }

        let tariff = TariffRepository::create_in(&mut tx, &candidate).await?;
        tx.commit().await?;
        info!("✅ Tariff {} created", tariff.id);

        Ok(ApiResponse::success_with_message(
            tariff,
            "Tariff created successfully".to_string(),
        ))
    }

    pub async fn list(&self, vehicle_category_id: Uuid) -> Result<Vec<Tariff>, AppError> {
        self.repository.active_for_category(vehicle_category_id).await
    }
}

fn overlap_error(overlapping: &Tariff) -> AppError {
    let period = format!(
        "{} to {}",
        overlapping.effective_from,
        overlapping
            .effective_to
            .map(|d| d.to_string())
            .unwrap_or_else(|| "open".to_string())
    );

    conflict_error("Tariff", "overlapping effective period", &period)
}
