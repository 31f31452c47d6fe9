use serde_json::Value;

/// JSON 响应按两格缩进格式化，其他内容原样返回
pub fn render_response(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_prints_json() {
        assert_eq!(
            render_response(r#"{"a":[1,2],"b":"x"}"#),
            "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": \"x\"\n}"
        );
    }

    #[test]
    fn passes_through_text() {
        assert_eq!(render_response("<h1>hi</h1>"), "<h1>hi</h1>");
    }
}
