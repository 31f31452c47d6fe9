mod client;
mod config;
mod proxy;
mod script;
mod store;

pub use client::ClientError;
pub use config::ConfigError;
pub use proxy::ProxyError;
pub use script::ScriptError;
pub use store::StoreError;
