//! Customer form intake
//!
//! This module turns a flat urlencoded customer form into a validated
//! submission: header fields, bank details and vehicles.

use std::collections::{HashMap, HashSet};

use validator::Validate;

use crate::dto::customer_dto::{BankDetailEntry, CustomerFormHeader, VehicleEntry};
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::form_array::decode_form_group;
use crate::utils::validation::identifier_key;

/// Upper bound on records decoded per repeating group
pub const MAX_FORM_ROWS: usize = 50;

#[derive(Debug, Clone)]
pub struct CustomerSubmission {
    pub header: CustomerFormHeader,
    pub bank_details: Vec<BankDetailEntry>,
    pub vehicles: Vec<VehicleEntry>,
}

/// Decode and validate a posted customer form.
pub fn parse_customer_form(form: &HashMap<String, String>) -> Result<CustomerSubmission, AppError> {
    let header = CustomerFormHeader::from_form(form);
    header.validate()?;

    let bank_details: Vec<BankDetailEntry> = decode_form_group(form, MAX_FORM_ROWS)?;
    let vehicles: Vec<VehicleEntry> = decode_form_group(form, MAX_FORM_ROWS)?;

    ensure_single_primary(&bank_details)?;
    ensure_unique_identifiers(&vehicles)?;

    Ok(CustomerSubmission {
        header,
        bank_details,
        vehicles,
    })
}

fn ensure_single_primary(details: &[BankDetailEntry]) -> Result<(), AppError> {
    if details.iter().filter(|d| d.is_primary).count() > 1 {
        return Err(bad_request_error("Only one bank detail can be marked as primary"));
    }
    Ok(())
}

fn ensure_unique_identifiers(vehicles: &[VehicleEntry]) -> Result<(), AppError> {
    let mut registrations = HashSet::new();
    let mut chassis = HashSet::new();

    for (index, vehicle) in vehicles.iter().enumerate() {
        if let Some(key) = identifier_key(vehicle.registration_number.as_deref()) {
            if !registrations.insert(key) {
                return Err(bad_request_error(&format!(
                    "Vehicles[{}]: registration number '{}' is repeated",
                    index,
                    vehicle.registration_number.as_deref().unwrap_or_default()
                )));
            }
        }
        if let Some(key) = identifier_key(vehicle.chassis_number.as_deref()) {
            if !chassis.insert(key) {
                return Err(bad_request_error(&format!(
                    "Vehicles[{}]: chassis number '{}' is repeated",
                    index,
                    vehicle.chassis_number.as_deref().unwrap_or_default()
                )));
            }
        }
    }

    Ok(())
}
