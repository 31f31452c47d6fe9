use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::core::capture_variables::capture_variables;
use crate::core::forward::{build_client, forward};
use crate::core::parse_headers::{apply_bearer_token, parse_header_block};
use crate::core::render_response::render_response;
use crate::core::run_tests::run_tests;
use crate::core::substitute_env_vars::substitute_env_vars;
use crate::error::ClientError;
use crate::models::capture_rule::CaptureRule;
use crate::models::environment::Environment;
use crate::models::proxy_form::ProxyForm;
use crate::models::result::{ResponseView, SendOutcome};
use crate::models::saved_request::RequestDraft;

/// 请求怎么发出去：经过代理，或者在进程内直接转发
pub enum Transport {
    Proxy { client: Client, endpoint: String },
    Direct { client: Client },
}

impl Transport {
    pub fn proxy(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|source| ClientError::BuildClient { source })?;
        Ok(Transport::Proxy {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn direct(timeout_secs: u64) -> Result<Self, ClientError> {
        Ok(Transport::Direct {
            client: build_client(timeout_secs)?,
        })
    }
}

/// 替换变量、组装请求头、发送，然后抓取变量、格式化响应、执行测试
pub async fn send_request(
    draft: &RequestDraft,
    env: &mut Environment,
    transport: &Transport,
    rules: &[CaptureRule],
) -> Result<SendOutcome, ClientError> {
    let url = draft.url.trim();
    if url.is_empty() {
        return Err(ClientError::UrlRequired);
    }

    let url = substitute_env_vars(url, &env.vars);
    let body = substitute_env_vars(draft.body.trim(), &env.vars);
    let headers_text = substitute_env_vars(draft.headers.trim(), &env.vars);

    let mut headers = parse_header_block(&headers_text);
    apply_bearer_token(&mut headers, env);
    let headers_json = Value::Object(
        headers
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>(),
    )
    .to_string();

    info!(method = %draft.method, url = %url, "sending request");
    let (status, text) = match transport {
        Transport::Proxy { client, endpoint } => {
            let mut params = vec![("url", url), ("method", draft.method.clone())];
            if !body.is_empty() {
                params.push(("body", body));
            }
            params.push(("headers", headers_json));

            let response = client
                .post(endpoint)
                .form(&params)
                .send()
                .await
                .map_err(|source| ClientError::Network { source })?;
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|source| ClientError::Network { source })?;
            (status, text)
        }
        Transport::Direct { client } => {
            let form = ProxyForm {
                url,
                method: draft.method.clone(),
                body,
                headers: headers_json,
            };
            // 和代理一样，把转发错误变成 JSON 错误响应
            match forward(client, &form).await {
                Ok(result) => (result.status, String::from_utf8_lossy(&result.body).into_owned()),
                Err(e) => (e.status_code().as_u16(), e.error_body()),
            }
        }
    };
    debug!(status, bytes = text.len(), "response received");

    let captured = capture_variables(&text, rules, &mut env.vars);
    if !captured.is_empty() {
        info!(vars = ?captured, environment = %env.name, "captured variables");
    }
    let rendered = render_response(&text);

    let tests = draft.tests.trim();
    let report = if tests.is_empty() {
        None
    } else {
        Some(run_tests(tests, &ResponseView { status, text: &text }))
    };

    Ok(SendOutcome {
        status,
        body: text,
        rendered,
        captured,
        report,
    })
}
