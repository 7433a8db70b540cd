use serde::Serialize;

use crate::services::vehicle_import_service::{ImportFailure, ImportOutcome, RowFailure};
use crate::utils::localization::Language;

// Response of the bulk vehicle import endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleImportResponse {
    pub success: bool,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<ImportRowError>,
    pub message: String,
}

// One rejected row, with the values as submitted
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    pub row_number: usize,
    pub make: String,
    pub model: String,
    pub year: String,
    pub engine_capacity: String,
    pub registration_number: String,
    pub chassis_number: String,
    pub error_message: String,
}

impl ImportRowError {
    pub fn from_failure(failure: &RowFailure, lang: Language) -> Self {
        let row = &failure.row;
        Self {
            row_number: row.row_number,
            make: row.make.clone(),
            model: row.model.clone(),
            year: row.year.clone(),
            engine_capacity: row.engine_capacity.clone(),
            registration_number: row.registration_number.clone(),
            chassis_number: row.chassis_number.clone(),
            error_message: failure.error.message(lang),
        }
    }
}

impl VehicleImportResponse {
    pub fn from_outcome(outcome: &ImportOutcome, lang: Language) -> Self {
        Self {
            success: outcome.is_success(),
            total_rows: outcome.total_rows,
            success_count: outcome.success_count,
            error_count: outcome.error_count,
            errors: outcome
                .failures
                .iter()
                .map(|failure| ImportRowError::from_failure(failure, lang))
                .collect(),
            message: outcome.summary(lang),
        }
    }

    pub fn from_failure(failure: &ImportFailure, lang: Language) -> Self {
        Self {
            success: false,
            total_rows: 0,
            success_count: 0,
            error_count: 0,
            errors: Vec::new(),
            message: failure.message(lang),
        }
    }
}
