use serde::{Deserialize, Serialize};

/// 从响应里用 jsonpath 取值写回环境变量
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureRule {
    pub key: String,
    pub jsonpath: String,
}

impl CaptureRule {
    pub fn new(key: impl Into<String>, jsonpath: impl Into<String>) -> Self {
        CaptureRule {
            key: key.into(),
            jsonpath: jsonpath.into(),
        }
    }
}
