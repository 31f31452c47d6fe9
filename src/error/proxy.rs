use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// 代理端点可能返回的错误，`Display` 文本就是响应体里的 `error` 字段。
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Only POST allowed")]
    MethodNotAllowed,
    #[error("URL is required")]
    UrlRequired,
    #[error("Invalid URL")]
    InvalidUrl { url: String },
    #[error("cURL error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::UrlRequired | ProxyError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            ProxyError::Transport { .. } | ProxyError::BuildClient { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `{"error": "..."}`
    pub fn error_body(&self) -> String {
        json!({ "error": self.to_string() }).to_string()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "application/json")],
            self.error_body(),
        )
            .into_response()
    }
}
