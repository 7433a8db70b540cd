//! System utilities
//!
//! This module contains error handling, validation, localization and form
//! decoding helpers shared across the application.

pub mod errors;
pub mod form_array;
pub mod localization;
pub mod validation;
