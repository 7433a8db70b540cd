//! Request and response DTOs
//!
//! Shapes exchanged with API clients, kept separate from the database models.

pub mod common_dto;
pub mod customer_dto;
pub mod tariff_dto;
pub mod vehicle_import_dto;
pub mod vehicle_master_dto;
