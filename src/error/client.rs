use thiserror::Error;

use super::ProxyError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("URL is required")]
    UrlRequired,
    #[error("Network error: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}
