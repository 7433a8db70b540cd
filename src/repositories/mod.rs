//! Repositories
//!
//! SQL access to PostgreSQL, one repository per aggregate.

pub mod customer_repository;
pub mod tariff_repository;
pub mod vehicle_import_store;
pub mod vehicle_master_repository;
