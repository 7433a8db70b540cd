//! Customer model
//!
//! Customers own bank details and vehicles. Vehicles are created either
//! through the customer form or by the bulk importer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::localization::LocalizedName;

/// Maps to the `customers` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name_en: String,
    pub name_ar: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl LocalizedName for Customer {
    fn name_en(&self) -> &str {
        &self.name_en
    }

    fn name_ar(&self) -> Option<&str> {
        Some(&self.name_ar)
    }
}

/// Maps to the `customer_bank_details` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerBankDetail {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub bank_id: Uuid,
    pub account_holder: String,
    pub account_number: String,
    pub iban: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// Maps to the `customer_vehicles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CustomerVehicle {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub make_id: Uuid,
    pub model_id: Uuid,
    pub year_id: Uuid,
    pub engine_capacity_id: Option<Uuid>,
    pub registration_number: Option<String>,
    pub chassis_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration and chassis numbers of an existing active vehicle
#[derive(Debug, Clone, Default, FromRow)]
pub struct VehicleIdentifiers {
    pub registration_number: Option<String>,
    pub chassis_number: Option<String>,
}
