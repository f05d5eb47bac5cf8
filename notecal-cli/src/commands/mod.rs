pub mod config;
pub mod date;
pub mod import;
