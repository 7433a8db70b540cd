//! Services module
//!
//! Business logic of the application. Services encapsulate operations that
//! span several repositories or need rules beyond plain persistence.

pub mod customer_service;
pub mod spreadsheet;
pub mod tariff_service;
pub mod vehicle_import_service;
