//! Data models
//!
//! This module contains the data models that map to the PostgreSQL schema
//! in `migrations/`.

pub mod customer;
pub mod tariff;
pub mod vehicle_master;
