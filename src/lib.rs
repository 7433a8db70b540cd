//! Insurance back office
//!
//! Customer, vehicle master data and tariff administration, including the
//! bulk vehicle import from spreadsheets.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
