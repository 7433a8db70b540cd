use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::customer::{Customer, CustomerVehicle, VehicleIdentifiers};
use crate::repositories::customer_repository::CustomerRepository;
use crate::repositories::vehicle_master_repository::VehicleMasterRepository;
use crate::services::vehicle_import_service::{ReferenceData, VehicleImportStore};
use crate::utils::errors::AppResult;

/// PostgreSQL-backed store for the vehicle importer
pub struct PgVehicleImportStore {
    customers: CustomerRepository,
    master: VehicleMasterRepository,
}

impl PgVehicleImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool.clone()),
            master: VehicleMasterRepository::new(pool),
        }
    }
}

#[async_trait]
impl VehicleImportStore for PgVehicleImportStore {
    async fn find_active_customer(&self, customer_id: Uuid) -> AppResult<Option<Customer>> {
        self.customers.find_active(customer_id).await
    }

    async fn load_reference_data(&self) -> AppResult<ReferenceData> {
        self.master.load_reference_data().await
    }

    async fn active_vehicle_identifiers(
        &self,
        customer_id: Uuid,
    ) -> AppResult<Vec<VehicleIdentifiers>> {
        self.customers.active_vehicle_identifiers(customer_id).await
    }

    async fn insert_customer_vehicles(&self, vehicles: &[CustomerVehicle]) -> AppResult<u64> {
        self.customers.insert_vehicles(vehicles).await
    }
}
