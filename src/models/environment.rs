use std::collections::BTreeMap;

use serde_json::Value;

pub const DEFAULT_ENVIRONMENT: &str = "Default";
pub const LOCAL_ENVIRONMENT: &str = "Local";

pub type Vars = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub name: String,
    pub vars: Vars,
}

impl Environment {
    pub fn new(name: impl Into<String>, vars: Vars) -> Self {
        Environment {
            name: name.into(),
            vars,
        }
    }

    /// 什么都没保存过时使用的初始变量
    pub fn seed() -> Self {
        let mut vars = Vars::new();
        vars.insert("base_url".to_string(), "http://localhost:8080".to_string());
        for key in ["token", "userId", "alice_id", "bob_id", "conversation_id"] {
            vars.insert(key.to_string(), String::new());
        }
        Environment::new(DEFAULT_ENVIRONMENT, vars)
    }

    /// 非空的 token
    pub fn token(&self) -> Option<&str> {
        self.vars
            .get("token")
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(DEFAULT_ENVIRONMENT, Vars::new())
    }
}

/// 导入的文件里变量值可能是数字或布尔（自动抓取的 userId 常见），统一转成字符串
pub fn vars_from_json(map: BTreeMap<String, Value>) -> Vars {
    map.into_iter()
        .map(|(key, value)| (key, value_to_string(&value)))
        .collect()
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
