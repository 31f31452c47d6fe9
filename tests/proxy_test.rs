use std::time::Duration;

use postbench::core::proxy_server;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_proxy() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = proxy_server::serve_on(listener, 10).await;
    });
    format!("http://{}/api", addr)
}

async fn relay(proxy: &str, fields: &[(&str, &str)]) -> reqwest::Response {
    reqwest::Client::new()
        .post(proxy)
        .header("Origin", "http://localhost:3000")
        .form(fields)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn relays_upstream_body_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":1,"name":"alice"}"#))
        .expect(1)
        .mount(&upstream)
        .await;

    let proxy = start_proxy().await;
    let url = format!("{}/users/1", upstream.uri());
    let response = relay(&proxy, &[("url", &url), ("method", "GET"), ("headers", "{}")]).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.text().await.unwrap(), r#"{"id":1,"name":"alice"}"#);
}

#[tokio::test]
async fn only_post_is_allowed() {
    let proxy = start_proxy().await;
    let response = reqwest::get(&proxy).await.unwrap();

    assert_eq!(response.status(), 405);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Only POST allowed"}));
}

#[tokio::test]
async fn plain_options_is_not_allowed() {
    let proxy = start_proxy().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, &proxy)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 405);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Only POST allowed"}));
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let proxy = start_proxy().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, &proxy)
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let proxy = start_proxy().await;
    let client = reqwest::Client::new();
    for method in [reqwest::Method::PUT, reqwest::Method::DELETE] {
        let response = client.request(method, &proxy).send().await.unwrap();
        assert_eq!(response.status(), 405);
    }
}

#[tokio::test]
async fn upstream_timeout_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&upstream)
        .await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = proxy_server::serve_on(listener, 1).await;
    });

    let proxy = format!("http://{}/api", addr);
    let url = format!("{}/slow", upstream.uri());
    let response = relay(&proxy, &[("url", &url)]).await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("cURL error: "));
}

#[tokio::test]
async fn legacy_php_path_is_served() {
    let proxy = start_proxy().await.replace("/api", "/api.php");
    let response = relay(&proxy, &[("method", "GET")]).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn missing_and_invalid_urls_are_rejected() {
    let proxy = start_proxy().await;

    let response = relay(&proxy, &[("method", "GET")]).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "URL is required");

    let response = relay(&proxy, &[("url", "not a url")]).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid URL");
}

#[tokio::test]
async fn non_form_body_counts_as_missing_url() {
    let proxy = start_proxy().await;
    let response = reqwest::Client::new()
        .post(&proxy)
        .json(&json!({"url": "http://example.com"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "URL is required");
}

#[tokio::test]
async fn forwards_method_headers_and_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/items/7"))
        .and(header("x-api-key", "secret"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"lamp"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&upstream)
        .await;

    let proxy = start_proxy().await;
    let url = format!("{}/items/7", upstream.uri());
    let headers = json!({"X-Api-Key": "secret", "Content-Type": "application/json"}).to_string();
    let response = relay(
        &proxy,
        &[
            ("url", &url),
            ("method", "put"),
            ("body", r#"{"name":"lamp"}"#),
            ("headers", &headers),
        ],
    )
    .await;

    assert_eq!(response.status(), 201);
    assert_eq!(response.text().await.unwrap(), r#"{"ok":true}"#);
}

#[tokio::test]
async fn post_body_without_content_type_is_sent_as_form() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&upstream)
        .await;

    let proxy = start_proxy().await;
    let url = format!("{}/login", upstream.uri());
    let response = relay(&proxy, &[("url", &url), ("method", "POST"), ("body", "user=alice")]).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn unknown_method_falls_back_to_get() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&upstream)
        .await;

    let proxy = start_proxy().await;
    let url = format!("{}/ping", upstream.uri());
    let response = relay(&proxy, &[("url", &url), ("method", "OPTIONS"), ("body", "ignored")]).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "pong");
}

#[tokio::test]
async fn follows_redirects() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/new", upstream.uri()).as_str()),
        )
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"moved":true}"#))
        .mount(&upstream)
        .await;

    let proxy = start_proxy().await;
    let url = format!("{}/old", upstream.uri());
    let response = relay(&proxy, &[("url", &url)]).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), r#"{"moved":true}"#);
}

#[tokio::test]
async fn upstream_error_status_is_relayed() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"not found"}"#))
        .mount(&upstream)
        .await;

    let proxy = start_proxy().await;
    let url = format!("{}/missing", upstream.uri());
    let response = relay(&proxy, &[("url", &url)]).await;

    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), r#"{"message":"not found"}"#);
}

#[tokio::test]
async fn transport_failure_is_500() {
    let proxy = start_proxy().await;
    let response = relay(&proxy, &[("url", "http://127.0.0.1:1/"), ("method", "GET")]).await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("cURL error: "));
}
