use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::core::parse_headers::build_header_map;
use crate::error::ProxyError;
use crate::models::environment::value_to_string;
use crate::models::proxy_form::ProxyForm;
use crate::models::result::ForwardResult;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// `postbench 0.1.0 (Ubuntu; 22.04)`
pub fn user_agent() -> String {
    let info = os_info::get();
    let os_type = info.os_type();
    let os_version = info.version().to_string();
    let app_name = env!("CARGO_PKG_NAME");
    let app_version = crate::VERSION;
    format!("{} {} ({}; {})", app_name, app_version, os_type, os_version)
}

/// 构建转发用的http客户端，超时固定，自动跟随重定向
pub fn build_client(timeout_secs: u64) -> Result<Client, ProxyError> {
    let client_builder = Client::builder().user_agent(user_agent());
    let client_builder = if timeout_secs > 0 {
        client_builder.timeout(Duration::from_secs(timeout_secs))
    } else {
        client_builder
    };
    client_builder
        .build()
        .map_err(|source| ProxyError::BuildClient { source })
}

/// 校验 url：必须能解析，并且带 scheme 和 host
pub(crate) fn validate_url(raw: &str) -> Result<Url, ProxyError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ProxyError::UrlRequired);
    }
    match Url::parse(raw) {
        Ok(url) if url.has_host() => Ok(url),
        _ => Err(ProxyError::InvalidUrl {
            url: raw.to_string(),
        }),
    }
}

/// 请求头是 JSON 对象，解析失败按空处理
pub(crate) fn parse_header_json(raw: &str) -> Vec<(String, String)> {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(map) => map
            .into_iter()
            .map(|(key, value)| (key, value_to_string(&value)))
            .collect(),
        Err(e) => {
            if !raw.trim().is_empty() {
                warn!("headers 不是合法的 JSON 对象，忽略: {}", e);
            }
            Vec::new()
        }
    }
}

/// 真正向目标地址发请求，响应体原样返回
pub async fn forward(client: &Client, form: &ProxyForm) -> Result<ForwardResult, ProxyError> {
    let url = validate_url(&form.url)?;
    let headers = parse_header_json(&form.headers);
    let mut header_map = build_header_map(headers.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    // 构建请求方法，未知方法一律按 GET 发送
    let method = Method::from_str(&form.method.trim().to_uppercase()).unwrap_or(Method::GET);
    let sends_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
    let method = match method {
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE => method,
        _ => Method::GET,
    };

    debug!(method = %method, url = %url, "转发请求");
    let mut request = client.request(method, url.clone());
    if sends_body {
        // 没写 Content-Type 时按表单提交
        if !form.body.is_empty() && !header_map.contains_key(CONTENT_TYPE) {
            header_map.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
        }
        request = request.body(form.body.clone());
    }
    request = request.headers(header_map);

    let response = request
        .send()
        .await
        .map_err(|source| ProxyError::Transport { source })?;
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|source| ProxyError::Transport { source })?;
    debug!(status, bytes = body.len(), url = %url, "上游已响应");

    Ok(ForwardResult {
        status,
        body: body.to_vec(),
    })
}
