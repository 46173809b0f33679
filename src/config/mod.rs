pub mod app_config;
pub mod config;
pub mod store;
