use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// 编辑中的请求，还没有 id 和时间戳
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestDraft {
    pub name: String,
    pub method: String,
    pub url: String,
    /// 每行一个 `Key: Value`
    pub headers: String,
    pub body: String,
    pub tests: String,
}

/// 保存在模块里的请求，字段名与导出文件保持一致
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedRequest {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tests: String,
    #[serde(default)]
    pub timestamp: String,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RequestDraft {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        RequestDraft {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// 生成一条新记录，id 取当前毫秒时间戳
    pub fn into_saved(self) -> SavedRequest {
        let now = OffsetDateTime::now_utc();
        let id = (now.unix_timestamp_nanos() / 1_000_000) as i64;
        let timestamp = now.format(&Rfc3339).unwrap_or_else(|_| id.to_string());
        SavedRequest {
            id,
            name: self.name,
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            tests: self.tests,
            timestamp,
        }
    }
}

impl SavedRequest {
    pub fn draft(&self) -> RequestDraft {
        RequestDraft {
            name: self.name.clone(),
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            tests: self.tests.clone(),
        }
    }

    /// 只有这几种方法会带请求体
    pub fn has_body(&self) -> bool {
        matches!(self.method.to_uppercase().as_str(), "POST" | "PUT" | "PATCH")
    }
}
