use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use tracing::warn;

use crate::models::environment::Environment;

/// 解析请求头文本，每行一个 `Key: Value`，只在第一个冒号处切分
pub fn parse_header_block(text: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        let mut parts = line.splitn(2, ':');
        let (key, value) = match (parts.next(), parts.next()) {
            (Some(key), Some(value)) => (key.trim(), value.trim()),
            _ => continue,
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }
        // 同名的后者覆盖前者
        match headers.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => headers.push((key.to_string(), value.to_string())),
        }
    }
    headers
}

/// 环境里有 token 且没有手写 Authorization 时自动加上 Bearer
pub fn apply_bearer_token(headers: &mut Vec<(String, String)>, env: &Environment) {
    let token = match env.token() {
        Some(token) => token,
        None => return,
    };
    let has_auth = headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case(AUTHORIZATION.as_str()));
    if !has_auth {
        headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
    }
}

/// 转成 reqwest 的 HeaderMap，非法的名称或值跳过
pub(crate) fn build_header_map<'a, I>(headers: I) -> HeaderMap
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = match name.trim().parse::<HeaderName>() {
            Ok(header_name) => header_name,
            Err(_) => {
                warn!(header = name, "无法解析头部名称");
                continue;
            }
        };
        match HeaderValue::from_str(value.trim()) {
            Ok(header_value) => {
                map.insert(header_name, header_value);
            }
            Err(_) => warn!(header = name, "无法解析头部值"),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::environment::Vars;

    #[test]
    fn parses_lines_and_skips_blank_parts() {
        let headers = parse_header_block(
            "Content-Type: application/json\n\nX-Empty:\nnot a header\n Host : localhost:8080 ",
        );
        assert_eq!(
            headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Host".to_string(), "localhost:8080".to_string()),
            ]
        );
    }

    #[test]
    fn later_duplicate_wins() {
        let headers = parse_header_block("X-A: 1\nX-A: 2");
        assert_eq!(headers, vec![("X-A".to_string(), "2".to_string())]);
    }

    #[test]
    fn bearer_added_only_without_authorization() {
        let env = Environment::new(
            "Default",
            Vars::from([("token".to_owned(), "abc".to_owned())]),
        );

        let mut headers = Vec::new();
        apply_bearer_token(&mut headers, &env);
        assert_eq!(
            headers,
            vec![("Authorization".to_string(), "Bearer abc".to_string())]
        );

        let mut headers = vec![("authorization".to_string(), "Basic x".to_string())];
        apply_bearer_token(&mut headers, &env);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn empty_token_adds_nothing() {
        let mut headers = Vec::new();
        apply_bearer_token(&mut headers, &Environment::seed());
        assert!(headers.is_empty());
    }

    #[test]
    fn header_map_skips_invalid_names() {
        let map = build_header_map(vec![("X-Ok", "1"), ("bad name", "2")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["x-ok"], "1");
    }
}
