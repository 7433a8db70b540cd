pub mod customer_controller;
pub mod tariff_controller;
pub mod vehicle_import_controller;
pub mod vehicle_master_controller;
