use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::customer::{Customer, CustomerBankDetail, CustomerVehicle};
use crate::utils::form_array::{FormArrayError, FormGroup, GroupFields};
use crate::utils::validation::validate_phone;

// Header fields of the customer form
#[derive(Debug, Clone, Validate)]
pub struct CustomerFormHeader {
    #[validate(length(min = 2, max = 200))]
    pub name_en: String,

    #[validate(length(min = 2, max = 200))]
    pub name_ar: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
}

impl CustomerFormHeader {
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let text = |key: &str| form.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let optional = |key: &str| Some(text(key)).filter(|v| !v.is_empty());

        Self {
            name_en: text("NameEn"),
            name_ar: text("NameAr"),
            email: optional("Email"),
            phone: optional("Phone"),
        }
    }
}

// One `BankDetails[i]` row of the customer form
#[derive(Debug, Clone, PartialEq)]
pub struct BankDetailEntry {
    pub bank_id: Uuid,
    pub account_holder: String,
    pub account_number: String,
    pub iban: Option<String>,
    pub is_primary: bool,
}

impl FormGroup for BankDetailEntry {
    const PREFIX: &'static str = "BankDetails";
    const SENTINEL: &'static str = "BankId";

    fn from_group(group: &GroupFields) -> Result<Self, FormArrayError> {
        let iban = group
            .optional("Iban")
            .map(|iban| iban.replace(' ', "").to_uppercase());

        if let Some(iban) = &iban {
            if iban.len() < 15 || iban.len() > 34 || !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(FormArrayError::InvalidValue {
                    prefix: Self::PREFIX.to_string(),
                    index: group.index(),
                    field: "Iban",
                    value: iban.clone(),
                });
            }
        }

        Ok(Self {
            bank_id: group.parse_required("BankId")?,
            account_holder: group.required("AccountHolder")?,
            account_number: group.required("AccountNumber")?,
            iban,
            is_primary: group.flag("IsPrimary"),
        })
    }
}

// One `Vehicles[i]` row of the customer form
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleEntry {
    pub make_id: Uuid,
    pub model_id: Uuid,
    pub year_id: Uuid,
    pub engine_capacity_id: Option<Uuid>,
    pub registration_number: Option<String>,
    pub chassis_number: Option<String>,
}

impl FormGroup for VehicleEntry {
    const PREFIX: &'static str = "Vehicles";
    const SENTINEL: &'static str = "MakeId";

    fn from_group(group: &GroupFields) -> Result<Self, FormArrayError> {
        Ok(Self {
            make_id: group.parse_required("MakeId")?,
            model_id: group.parse_required("ModelId")?,
            year_id: group.parse_required("YearId")?,
            engine_capacity_id: group.parse_optional("EngineCapacityId")?,
            registration_number: group.optional("RegistrationNumber"),
            chassis_number: group.optional("ChassisNumber"),
        })
    }
}

// Customer with its sub-collections
#[derive(Debug, Serialize)]
pub struct CustomerDetailResponse {
    pub customer: Customer,
    pub display_name: String,
    pub bank_details: Vec<CustomerBankDetail>,
    pub vehicles: Vec<CustomerVehicle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::form_array::decode_form_group;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_header_validation() {
        let header = CustomerFormHeader::from_form(&form(&[
            ("NameEn", " Ahmed Ali "),
            ("NameAr", "أحمد علي"),
            ("Email", ""),
            ("Phone", "+971 50 123 4567"),
        ]));
        assert_eq!(header.name_en, "Ahmed Ali");
        assert_eq!(header.email, None);
        assert!(header.validate().is_ok());

        let bad = CustomerFormHeader::from_form(&form(&[
            ("NameEn", "A"),
            ("NameAr", "أحمد"),
            ("Email", "not-an-email"),
        ]));
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name_en"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_bank_details_decoding() {
        let bank_id = Uuid::new_v4();
        let form = form(&[
            ("BankDetails[0].BankId", bank_id.to_string().as_str()),
            ("BankDetails[0].AccountHolder", "Ahmed Ali"),
            ("BankDetails[0].AccountNumber", "0012345678"),
            ("BankDetails[0].Iban", "ae07 0331 2345 6789 0123 456"),
            ("BankDetails[0].IsPrimary", "true,false"),
        ]);

        let details: Vec<BankDetailEntry> = decode_form_group(&form, 10).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].bank_id, bank_id);
        assert_eq!(details[0].iban.as_deref(), Some("AE070331234567890123456"));
        assert!(details[0].is_primary);
    }

    #[test]
    fn test_bank_detail_rejects_malformed_iban() {
        let form = form(&[
            ("BankDetails[0].BankId", "550e8400-e29b-41d4-a716-446655440000"),
            ("BankDetails[0].AccountHolder", "Ahmed Ali"),
            ("BankDetails[0].AccountNumber", "0012345678"),
            ("BankDetails[0].Iban", "AE07-0331"),
        ]);

        let err = decode_form_group::<BankDetailEntry>(&form, 10).unwrap_err();
        assert_eq!(err.index(), 0);
        assert_eq!(err.prefix(), "BankDetails");
    }

    #[test]
    fn test_vehicle_decoding() {
        let (make, model, year) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let form = form(&[
            ("Vehicles[0].MakeId", make.to_string().as_str()),
            ("Vehicles[0].ModelId", model.to_string().as_str()),
            ("Vehicles[0].YearId", year.to_string().as_str()),
            ("Vehicles[0].EngineCapacityId", ""),
            ("Vehicles[0].RegistrationNumber", "ABC-1234"),
        ]);

        let vehicles: Vec<VehicleEntry> = decode_form_group(&form, 10).unwrap();
        assert_eq!(
            vehicles,
            vec![VehicleEntry {
                make_id: make,
                model_id: model,
                year_id: year,
                engine_capacity_id: None,
                registration_number: Some("ABC-1234".to_string()),
                chassis_number: None,
            }]
        );
    }
}
