use crate::models::environment::Vars;

/// 把 `{{ name }}` 替换成环境变量的值，未知变量和不闭合的 `{{` 原样保留
pub fn substitute_env_vars(input: &str, vars: &Vars) -> String {
    let mut rest = input;
    let mut output = String::with_capacity(input.len());

    loop {
        let start = match rest.find("{{") {
            Some(start) => start,
            None => {
                output.push_str(rest);
                break;
            }
        };
        let (before, after_start) = rest.split_at(start);
        output.push_str(before);
        let after = &after_start[2..];
        let end = match after.find("}}") {
            Some(end) => end,
            None => {
                output.push_str(after_start);
                break;
            }
        };
        let key_part = &after[..end];
        // `{{ {{a}}` 这种情况从内层的 `{{` 重新开始匹配
        if let Some(inner) = key_part.rfind("{{") {
            output.push_str("{{");
            output.push_str(&key_part[..inner]);
            rest = &after[inner..];
            continue;
        }
        match vars.get(key_part.trim()) {
            Some(value) => output.push_str(value),
            None => output.push_str(&after_start[..end + 4]),
        }
        rest = &after[end + 2..];
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Vars {
        Vars::from([
            ("base_url".to_owned(), "http://localhost:8080".to_owned()),
            ("userId".to_owned(), "42".to_owned()),
        ])
    }

    #[test]
    fn substitutes_known_vars() {
        let rendered = substitute_env_vars("{{base_url}}/users/{{ userId }}", &vars());
        assert_eq!(rendered, "http://localhost:8080/users/42");
    }

    #[test]
    fn keeps_unknown_and_unterminated() {
        assert_eq!(
            substitute_env_vars("{{ missing }} and {{userId", &vars()),
            "{{ missing }} and {{userId"
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(substitute_env_vars("{{userId}}-{{userId}}", &vars()), "42-42");
    }

    #[test]
    fn nested_open_braces_resume_at_inner() {
        assert_eq!(substitute_env_vars("{{ {{userId}} }}", &vars()), "{{ 42 }}");
    }

    #[test]
    fn empty_input() {
        assert_eq!(substitute_env_vars("", &vars()), "");
    }
}
