use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::tariff::RateType;

// Request to create a tariff
#[derive(Debug, Deserialize)]
pub struct CreateTariffRequest {
    pub vehicle_category_id: Uuid,
    pub engine_capacity_band_id: Option<Uuid>,
    pub rate_type: RateType,
    pub rate: Decimal,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

// Filters for listing tariffs
#[derive(Debug, Deserialize)]
pub struct TariffFilters {
    pub vehicle_category_id: Uuid,
}
