use crate::error::ScriptError;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Str(String),
    Num(f64),
    /// `. ( ) { } [ ] , ;`
    Punct(char),
    Arrow,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("'{}'", name),
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Num(n) => format!("number {}", n),
            Token::Punct(c) => format!("'{}'", c),
            Token::Arrow => "'=>'".to_string(),
        }
    }
}

/// 把测试脚本切成 token，注释和空白直接跳过
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ScriptError> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);

        if c.is_whitespace() {
            i += 1;
            continue;
        }
        // 行注释
        if c == '/' && next == Some('/') {
            while i < chars.len() && chars[i].1 != '\n' {
                i += 1;
            }
            continue;
        }
        // 块注释
        if c == '/' && next == Some('*') {
            i += 2;
            while i < chars.len() && !(chars[i].1 == '*' && chars.get(i + 1).map(|&(_, c)| c) == Some('/')) {
                i += 1;
            }
            i += 2;
            continue;
        }
        if c == '=' && next == Some('>') {
            tokens.push(Spanned { token: Token::Arrow, offset });
            i += 2;
            continue;
        }
        if matches!(c, '.' | '(' | ')' | '{' | '}' | '[' | ']' | ',' | ';') {
            tokens.push(Spanned { token: Token::Punct(c), offset });
            i += 1;
            continue;
        }
        if c == '"' || c == '\'' || c == '`' {
            let (text, consumed) = read_string(&chars[i..], offset)?;
            tokens.push(Spanned { token: Token::Str(text), offset });
            i += consumed;
            continue;
        }
        if c.is_ascii_digit() || (c == '-' && next.map_or(false, |n| n.is_ascii_digit())) {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].1.is_ascii_digit() || matches!(chars[i].1, '.' | 'e' | 'E')) {
                let exponent = matches!(chars[i].1, 'e' | 'E');
                i += 1;
                // 指数后可以带符号
                if exponent && i < chars.len() && matches!(chars[i].1, '+' | '-') {
                    i += 1;
                }
            }
            let text: String = chars[start..i].iter().map(|&(_, c)| c).collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ScriptError::InvalidNumber { text: text.clone(), offset })?;
            tokens.push(Spanned { token: Token::Num(value), offset });
            continue;
        }
        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_' || chars[i].1 == '$') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().map(|&(_, c)| c).collect();
            tokens.push(Spanned { token: Token::Ident(ident), offset });
            continue;
        }
        return Err(ScriptError::UnexpectedChar { found: c, offset });
    }

    Ok(tokens)
}

/// 读取一个带引号的字符串，返回内容和消耗的字符数
fn read_string(chars: &[(usize, char)], offset: usize) -> Result<(String, usize), ScriptError> {
    let quote = chars[0].1;
    let mut text = String::new();
    let mut i = 1;
    while i < chars.len() {
        let c = chars[i].1;
        if c == quote {
            return Ok((text, i + 1));
        }
        if c == '\\' {
            let escaped = match chars.get(i + 1) {
                Some(&(_, e)) => e,
                None => break,
            };
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            i += 2;
            continue;
        }
        text.push(c);
        i += 1;
    }
    Err(ScriptError::UnterminatedString { offset })
}
