pub mod config_db;
pub mod landscape_db;
pub mod loan_db;
