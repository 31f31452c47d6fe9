use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::core::forward::{build_client, forward};
use crate::error::ProxyError;
use crate::models::proxy_form::ProxyForm;

/// 代理共享状态
#[derive(Clone)]
pub struct ProxyState {
    pub client: Client,
}

impl ProxyState {
    pub fn new(timeout_secs: u64) -> Result<Self, ProxyError> {
        Ok(ProxyState {
            client: build_client(timeout_secs)?,
        })
    }
}

/// `/api` 和兼容旧前端的 `/api.php` 都只接受 POST，预检请求除外
pub fn router(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", post(relay).fallback(method_not_allowed))
        .route("/api.php", post(relay).fallback(method_not_allowed))
        .layer(cors)
        .layer(middleware::from_fn(reject_plain_options))
        .with_state(Arc::new(state))
}

/// 真正的预检请求交给 CORS 层，普通的 OPTIONS 与其他非 POST 方法一样返回 405
async fn reject_plain_options(request: Request, next: Next) -> Response {
    let is_preflight = request
        .headers()
        .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);
    if request.method() != Method::OPTIONS || is_preflight {
        return next.run(request).await;
    }
    let mut response = ProxyError::MethodNotAllowed.into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// 启动代理
pub async fn serve(addr: SocketAddr, timeout_secs: u64) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, timeout_secs).await
}

/// 在已绑定的端口上启动，测试里用 `127.0.0.1:0`
pub async fn serve_on(listener: TcpListener, timeout_secs: u64) -> anyhow::Result<()> {
    let state = ProxyState::new(timeout_secs)?;
    info!(addr = %listener.local_addr()?, timeout_secs, "Starting proxy server");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn relay(
    State(state): State<Arc<ProxyState>>,
    form: Result<Form<ProxyForm>, FormRejection>,
) -> Response {
    // 不是表单的请求体当作空表单处理，后面会报 URL is required
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("无法解析表单: {}", rejection);
            ProxyForm::default()
        }
    };

    match forward(&state.client, &form).await {
        Ok(result) => {
            info!(method = %form.method, url = %form.url, status = result.status, "relayed");
            let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::OK);
            (status, [(header::CONTENT_TYPE, "application/json")], result.body).into_response()
        }
        Err(e) => {
            warn!(method = %form.method, url = %form.url, "{}", e);
            e.into_response()
        }
    }
}

async fn method_not_allowed() -> Response {
    ProxyError::MethodNotAllowed.into_response()
}
