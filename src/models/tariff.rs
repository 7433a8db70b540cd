//! Tariff model
//!
//! A tariff prices a vehicle category (optionally narrowed to an engine
//! capacity band) over an effective date range.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rate type - maps to the `tariff_rate_type` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "tariff_rate_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    /// Percentage of the insured value
    Percentage,
    /// Fixed premium amount
    Fixed,
}

/// Maps to the `tariffs` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tariff {
    pub id: Uuid,
    pub vehicle_category_id: Uuid,
    pub engine_capacity_band_id: Option<Uuid>,
    pub rate_type: RateType,
    pub rate: Decimal,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Tariff {
    /// Whether two tariffs price the same thing.
    pub fn same_scope(&self, other: &Tariff) -> bool {
        self.vehicle_category_id == other.vehicle_category_id
            && self.engine_capacity_band_id == other.engine_capacity_band_id
    }

    /// Inclusive date-range intersection; a missing end date is open-ended.
    pub fn period_overlaps(&self, other: &Tariff) -> bool {
        let starts_before_other_ends = other
            .effective_to
            .map_or(true, |end| self.effective_from <= end);
        let ends_after_other_starts = self
            .effective_to
            .map_or(true, |end| end >= other.effective_from);

        starts_before_other_ends && ends_after_other_starts
    }
}
