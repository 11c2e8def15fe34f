pub mod error_utils;
pub mod loader;
pub mod models;
pub mod plugin;
pub mod validation;
