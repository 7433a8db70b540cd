use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common_dto::ApiResponse;
use crate::dto::customer_dto::CustomerDetailResponse;
use crate::models::customer::Customer;
use crate::repositories::customer_repository::CustomerRepository;
use crate::services::customer_service::parse_customer_form;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::localization::{localized_label, Language};

pub struct CustomerController {
    repository: CustomerRepository,
}

impl CustomerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        form: HashMap<String, String>,
    ) -> Result<ApiResponse<Customer>, AppError> {
        let submission = parse_customer_form(&form)?;

        let customer = self
            .repository
            .create_with_children(
                &submission.header,
                &submission.bank_details,
                &submission.vehicles,
            )
            .await?;

        info!(
            "✅ Customer {} created with {} bank details and {} vehicles",
            customer.id,
            submission.bank_details.len(),
            submission.vehicles.len()
        );

        Ok(ApiResponse::success_with_message(
            customer,
            "Customer created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(
        &self,
        id: Uuid,
        lang: Language,
    ) -> Result<CustomerDetailResponse, AppError> {
        let customer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))?;

        let bank_details = self.repository.bank_details(id).await?;
        let vehicles = self.repository.active_vehicles(id).await?;

        Ok(CustomerDetailResponse {
            display_name: localized_label(&customer, lang),
            customer,
            bank_details,
            vehicles,
        })
    }
}
