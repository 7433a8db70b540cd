//! Vehicle master data
//!
//! Reference entities used to resolve imported vehicle rows: makes, models
//! scoped to a make, model years and engine capacities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::localization::{Language, LocalizedName};

/// Maps to the `vehicle_makes` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleMake {
    pub id: Uuid,
    pub name_en: String,
    pub name_ar: String,
    pub is_active: bool,
}

/// Maps to the `vehicle_models` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleModel {
    pub id: Uuid,
    pub make_id: Uuid,
    pub name_en: String,
    pub name_ar: String,
    pub is_active: bool,
}

/// Maps to the `vehicle_years` table; `year` is unique
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleYear {
    pub id: Uuid,
    pub year: i32,
    pub is_active: bool,
}

/// Maps to the `engine_capacities` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EngineCapacity {
    pub id: Uuid,
    pub capacity: Decimal,
    pub name_en: Option<String>,
    pub name_ar: Option<String>,
    pub is_active: bool,
}

impl LocalizedName for VehicleMake {
    fn name_en(&self) -> &str {
        &self.name_en
    }

    fn name_ar(&self) -> Option<&str> {
        Some(&self.name_ar)
    }
}

impl LocalizedName for VehicleModel {
    fn name_en(&self) -> &str {
        &self.name_en
    }

    fn name_ar(&self) -> Option<&str> {
        Some(&self.name_ar)
    }
}

impl EngineCapacity {
    /// Capacity rendered without trailing zeros, e.g. `2.50` -> `2.5`.
    pub fn capacity_text(&self) -> String {
        self.capacity.normalize().to_string()
    }

    /// Dropdown label; falls back to the numeric capacity when no display
    /// name is configured.
    pub fn label(&self, lang: Language) -> String {
        let en = self.name_en.as_deref().unwrap_or_default();
        let ar = self.name_ar.as_deref().unwrap_or_default();
        let picked = lang.pick(en, ar).trim();
        if picked.is_empty() {
            self.capacity_text()
        } else {
            picked.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_engine_capacity_label() {
        let capacity = EngineCapacity {
            id: Uuid::new_v4(),
            capacity: Decimal::from_str("2.50").unwrap(),
            name_en: None,
            name_ar: Some("2.5 لتر".to_string()),
            is_active: true,
        };

        assert_eq!(capacity.capacity_text(), "2.5");
        assert_eq!(capacity.label(Language::English), "2.5");
        assert_eq!(capacity.label(Language::Arabic), "2.5 لتر");
    }
}
