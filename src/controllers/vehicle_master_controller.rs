use std::cmp::Reverse;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_master_dto::DropdownOption;
use crate::repositories::vehicle_master_repository::VehicleMasterRepository;
use crate::utils::errors::AppError;
use crate::utils::localization::{localized_label, Language};

pub struct VehicleMasterController {
    repository: VehicleMasterRepository,
}

impl VehicleMasterController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleMasterRepository::new(pool),
        }
    }

    pub async fn makes(&self, lang: Language) -> Result<Vec<DropdownOption>, AppError> {
        let makes = self.repository.active_makes().await?;
        Ok(sorted_by_label(
            makes
                .iter()
                .map(|make| DropdownOption::new(make.id, localized_label(make, lang)))
                .collect(),
        ))
    }

    pub async fn models(
        &self,
        make_id: Uuid,
        lang: Language,
    ) -> Result<Vec<DropdownOption>, AppError> {
        let models = self.repository.active_models_for_make(make_id).await?;
        Ok(sorted_by_label(
            models
                .iter()
                .map(|model| DropdownOption::new(model.id, localized_label(model, lang)))
                .collect(),
        ))
    }

    /// Most recent year first
    pub async fn years(&self) -> Result<Vec<DropdownOption>, AppError> {
        let mut years = self.repository.active_years().await?;
        years.sort_by_key(|y| Reverse(y.year));

        Ok(years
            .iter()
            .map(|year| DropdownOption::new(year.id, year.year.to_string()))
            .collect())
    }

    pub async fn engine_capacities(&self, lang: Language) -> Result<Vec<DropdownOption>, AppError> {
        let mut capacities = self.repository.active_capacities().await?;
        capacities.sort_by(|a, b| a.capacity.cmp(&b.capacity));

        Ok(capacities
            .iter()
            .map(|capacity| DropdownOption::new(capacity.id, capacity.label(lang)))
            .collect())
    }
}

fn sorted_by_label(mut options: Vec<DropdownOption>) -> Vec<DropdownOption> {
    options.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()));
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_label_ignores_case() {
        let options = sorted_by_label(vec![
            DropdownOption::new(Uuid::new_v4(), "toyota"),
            DropdownOption::new(Uuid::new_v4(), "Audi"),
            DropdownOption::new(Uuid::new_v4(), "Nissan"),
        ]);
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Audi", "Nissan", "toyota"]);
    }
}
