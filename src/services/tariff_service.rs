//! Tariff rules
//!
//! Request validation and effective-date overlap detection for tariffs.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::tariff_dto::CreateTariffRequest;
use crate::models::tariff::{RateType, Tariff};
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::{validate_date_range, validate_positive};

/// Build a new active tariff from a request, validating rate and period.
pub fn build_tariff(request: CreateTariffRequest) -> Result<Tariff, AppError> {
    validate_date_range(request.effective_from, request.effective_to)
        .map_err(|_| bad_request_error("effective_to must not be before effective_from"))?;

    validate_positive(request.rate).map_err(|_| bad_request_error("rate must be positive"))?;

    if request.rate_type == RateType::Percentage && request.rate > Decimal::ONE_HUNDRED {
        return Err(bad_request_error("percentage rate must not exceed 100"));
    }

    Ok(Tariff {
        id: Uuid::new_v4(),
        vehicle_category_id: request.vehicle_category_id,
        engine_capacity_band_id: request.engine_capacity_band_id,
        rate_type: request.rate_type,
        rate: request.rate,
        effective_from: request.effective_from,
        effective_to: request.effective_to,
        is_active: true,
        created_at: Utc::now(),
    })
}

/// First active tariff with the same scope whose period intersects the
/// candidate's.
pub fn find_overlap<'a>(existing: &'a [Tariff], candidate: &Tariff) -> Option<&'a Tariff> {
    existing.iter().find(|tariff| {
        tariff.is_active
            && tariff.id != candidate.id
            && tariff.same_scope(candidate)
            && tariff.period_overlaps(candidate)
    })
}
