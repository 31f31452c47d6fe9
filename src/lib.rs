pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod models;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
