use jsonpath_lib::select;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::capture_rule::CaptureRule;
use crate::models::environment::{value_to_string, Vars};

/// 默认抓取登录接口返回的 token 和 userId
pub fn default_capture_rules() -> Vec<CaptureRule> {
    vec![
        CaptureRule::new("token", "$.token"),
        CaptureRule::new("userId", "$.userId"),
    ]
}

/// 按规则从响应体中提取变量写回环境，返回被写入的变量名。
///
/// 响应不是 JSON 时什么都不做；一条规则只有在恰好匹配到一个非空值时才生效。
pub fn capture_variables(response_text: &str, rules: &[CaptureRule], vars: &mut Vars) -> Vec<String> {
    let json: Value = match serde_json::from_str(response_text) {
        Ok(json) => json,
        Err(_) => return Vec::new(),
    };
    let mut captured = Vec::new();
    for rule in rules {
        // 通过jsonpath提取数据
        let results = match select(&json, &rule.jsonpath) {
            Ok(results) => results,
            Err(e) => {
                warn!(key = %rule.key, jsonpath = %rule.jsonpath, "JSONPath 查询失败: {:?}", e);
                continue;
            }
        };
        if results.len() != 1 {
            if results.len() > 1 {
                debug!(key = %rule.key, "匹配到多个值，跳过");
            }
            continue;
        }
        let value = results[0];
        if !is_truthy(value) {
            continue;
        }
        vars.insert(rule.key.clone(), value_to_string(value));
        captured.push(rule.key.clone());
    }
    captured
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_token_and_numeric_user_id() {
        crate::logger::init_test();
        let mut vars = Vars::new();
        let captured = capture_variables(
            r#"{"token":"abc.def","userId":7}"#,
            &default_capture_rules(),
            &mut vars,
        );
        assert_eq!(captured, vec!["token".to_string(), "userId".to_string()]);
        assert_eq!(vars["token"], "abc.def");
        assert_eq!(vars["userId"], "7");
    }

    #[test]
    fn falsy_values_are_ignored() {
        let mut vars = Vars::from([("token".to_owned(), "old".to_owned())]);
        let captured = capture_variables(
            r#"{"token":"","userId":0}"#,
            &default_capture_rules(),
            &mut vars,
        );
        assert!(captured.is_empty());
        assert_eq!(vars["token"], "old");
    }

    #[test]
    fn non_json_body_is_ignored() {
        let mut vars = Vars::new();
        assert!(capture_variables("<html>", &default_capture_rules(), &mut vars).is_empty());
        assert!(vars.is_empty());
    }

    #[test]
    fn custom_rule_reaches_nested_value() {
        let mut vars = Vars::new();
        let rules = vec![CaptureRule::new("conversation_id", "$.data.conversation.id")];
        let captured = capture_variables(
            r#"{"data":{"conversation":{"id":"c-1"}}}"#,
            &rules,
            &mut vars,
        );
        assert_eq!(captured, vec!["conversation_id".to_string()]);
        assert_eq!(vars["conversation_id"], "c-1");
    }

    #[test]
    fn multiple_matches_are_skipped() {
        let mut vars = Vars::new();
        let rules = vec![CaptureRule::new("id", "$.items[*].id")];
        let captured = capture_variables(r#"{"items":[{"id":1},{"id":2}]}"#, &rules, &mut vars);
        assert!(captured.is_empty());
    }
}
