use serde::{Deserialize, Serialize};

/// 代理端点接收的表单字段
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyForm {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub body: String,
    /// JSON 编码的对象
    #[serde(default = "default_headers")]
    pub headers: String,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_headers() -> String {
    "{}".to_string()
}
