use serde_json::{Number, Value};

use crate::core::script_lexer::{tokenize, Spanned, Token};
use crate::error::ScriptError;
use crate::models::test_script::{Accessor, Assertion, Expr, Script, Statement};

/// 解析 `pm.test(...)` 风格的测试脚本
pub fn parse_script(source: &str) -> Result<Script, ScriptError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };
    let mut statements = Vec::new();
    loop {
        parser.skip_semicolons();
        if parser.peek().is_none() {
            break;
        }
        statements.push(parser.statement()?);
    }
    Ok(Script { statements })
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |s| s.offset)
    }

    /// 当前 token 满足条件时前进一步，否则报错
    fn take<T>(&mut self, expected: &str, f: impl FnOnce(&Token) -> Option<T>) -> Result<T, ScriptError> {
        match self.peek().and_then(f) {
            Some(value) => {
                self.pos += 1;
                Ok(value)
            }
            None => Err(self.error(expected)),
        }
    }

    fn error(&self, expected: &str) -> ScriptError {
        ScriptError::Expected {
            expected: expected.to_string(),
            found: self
                .peek()
                .map_or_else(|| "end of script".to_string(), Token::describe),
            offset: self.offset(),
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), ScriptError> {
        if self.peek() == Some(&Token::Punct(c)) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("'{}'", c)))
        }
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek() == Some(&Token::Punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_semicolons(&mut self) {
        while self.eat_punct(';') {}
    }

    /// 读取 `a.b.c`，遇到 `(` 或其他符号时停下
    fn dotted(&mut self) -> Result<(String, usize), ScriptError> {
        let offset = self.offset();
        let mut path = self.take("identifier", |t| match t {
            Token::Ident(name) => Some(name.clone()),
            _ => None,
        })?;
        while self.peek() == Some(&Token::Punct('.')) {
            match self.tokens.get(self.pos + 1).map(|s| &s.token) {
                Some(Token::Ident(name)) => {
                    path.push('.');
                    path.push_str(name);
                    self.pos += 2;
                }
                _ => break,
            }
        }
        Ok((path, offset))
    }

    fn statement(&mut self) -> Result<Statement, ScriptError> {
        let (path, offset) = self.dotted()?;
        if path == "pm.test" {
            self.expect_punct('(')?;
            let name = self.take("test name string", |t| match t {
                Token::Str(name) => Some(name.clone()),
                _ => None,
            })?;
            self.expect_punct(',')?;
            let assertions = self.test_body()?;
            self.expect_punct(')')?;
            return Ok(Statement::Test { name, assertions });
        }
        Ok(Statement::Assert(self.assertion_from(path, offset)?))
    }

    /// `function () { ... }` 或 `() => { ... }`
    fn test_body(&mut self) -> Result<Vec<Assertion>, ScriptError> {
        match self.peek() {
            Some(Token::Ident(kw)) if kw == "function" => {
                self.pos += 1;
                self.expect_punct('(')?;
                self.expect_punct(')')?;
            }
            Some(Token::Punct('(')) => {
                self.pos += 1;
                self.expect_punct(')')?;
                if self.peek() != Some(&Token::Arrow) {
                    return Err(self.error("'=>'"));
                }
                self.pos += 1;
            }
            _ => return Err(self.error("test function")),
        }
        self.expect_punct('{')?;
        let mut assertions = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat_punct('}') {
                break;
            }
            if self.peek().is_none() {
                return Err(self.error("'}'"));
            }
            let (path, offset) = self.dotted()?;
            assertions.push(self.assertion_from(path, offset)?);
        }
        Ok(assertions)
    }

    fn assertion_from(&mut self, path: String, offset: usize) -> Result<Assertion, ScriptError> {
        match path.as_str() {
            "pm.response.to.have.status" => {
                self.expect_punct('(')?;
                let code = self.take("status code", |t| match t {
                    Token::Num(n) if n.fract() == 0.0 && (0.0..=999.0).contains(n) => Some(*n as u16),
                    _ => None,
                })?;
                self.expect_punct(')')?;
                Ok(Assertion::Status(code))
            }
            "pm.expect" => {
                self.expect_punct('(')?;
                let actual = self.expr()?;
                self.expect_punct(')')?;
                if !self.eat_punct('.') {
                    return Err(self.error("'.to'"));
                }
                let (chain, chain_offset) = self.dotted()?;
                self.expect_punct('(')?;
                let assertion = match chain.as_str() {
                    "to.equal" => Assertion::Equal {
                        actual,
                        expected: self.literal()?,
                    },
                    "to.eql" => Assertion::Eql {
                        actual,
                        expected: self.literal()?,
                    },
                    "to.have.property" => Assertion::HasProperty {
                        actual,
                        property: self.take("property name string", |t| match t {
                            Token::Str(property) => Some(property.clone()),
                            _ => None,
                        })?,
                    },
                    _ => {
                        return Err(ScriptError::Unsupported {
                            call: format!("pm.expect(...).{}", chain),
                            offset: chain_offset,
                        })
                    }
                };
                self.expect_punct(')')?;
                Ok(assertion)
            }
            _ => Err(ScriptError::Unsupported { call: path, offset }),
        }
    }

    fn expr(&mut self) -> Result<Expr, ScriptError> {
        match self.peek() {
            Some(Token::Ident(name)) if name.starts_with("pm") => {}
            _ => return Ok(Expr::Literal(self.literal()?)),
        }
        let (path, offset) = self.dotted()?;
        match path.as_str() {
            "pm.response.text" => {
                self.expect_punct('(')?;
                self.expect_punct(')')?;
                Ok(Expr::Text)
            }
            "pm.response.code" => Ok(Expr::Code),
            "pm.response.json" => {
                self.expect_punct('(')?;
                self.expect_punct(')')?;
                let mut accessors = Vec::new();
                loop {
                    if self.eat_punct('.') {
                        accessors.push(self.take("property name", |t| match t {
                            Token::Ident(key) => Some(Accessor::Key(key.clone())),
                            _ => None,
                        })?);
                    } else if self.eat_punct('[') {
                        accessors.push(self.take("index", |t| match t {
                            Token::Str(key) => Some(Accessor::Key(key.clone())),
                            Token::Num(n) if *n >= 0.0 && n.fract() == 0.0 => {
                                Some(Accessor::Index(*n as usize))
                            }
                            _ => None,
                        })?);
                        self.expect_punct(']')?;
                    } else {
                        break;
                    }
                }
                Ok(Expr::Json(accessors))
            }
            _ => Err(ScriptError::Unsupported { call: path, offset }),
        }
    }

    fn literal(&mut self) -> Result<Value, ScriptError> {
        self.take("literal", |t| match t {
            Token::Str(s) => Some(Value::String(s.clone())),
            Token::Num(n) => Some(number_value(*n)),
            Token::Ident(kw) if kw == "true" => Some(Value::Bool(true)),
            Token::Ident(kw) if kw == "false" => Some(Value::Bool(false)),
            Token::Ident(kw) if kw == "null" => Some(Value::Null),
            _ => None,
        })
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_function_and_arrow_tests() {
        let script = parse_script(
            r#"
            pm.test("Status is 200", function () {
                pm.response.to.have.status(200);
            });
            pm.test("has token", () => {
                pm.expect(pm.response.json()).to.have.property("token");
                pm.expect(pm.response.json().user["name"]).to.equal("alice");
                pm.expect(pm.response.json().items[0]).to.eql(3);
            });
            "#,
        )
        .unwrap();

        assert_eq!(
            script.statements,
            vec![
                Statement::Test {
                    name: "Status is 200".to_string(),
                    assertions: vec![Assertion::Status(200)],
                },
                Statement::Test {
                    name: "has token".to_string(),
                    assertions: vec![
                        Assertion::HasProperty {
                            actual: Expr::Json(vec![]),
                            property: "token".to_string(),
                        },
                        Assertion::Equal {
                            actual: Expr::Json(vec![
                                Accessor::Key("user".to_string()),
                                Accessor::Key("name".to_string()),
                            ]),
                            expected: json!("alice"),
                        },
                        Assertion::Eql {
                            actual: Expr::Json(vec![
                                Accessor::Key("items".to_string()),
                                Accessor::Index(0),
                            ]),
                            expected: json!(3),
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn top_level_assertion() {
        let script = parse_script("pm.expect(pm.response.code).to.equal(201)").unwrap();
        assert_eq!(
            script.statements,
            vec![Statement::Assert(Assertion::Equal {
                actual: Expr::Code,
                expected: json!(201),
            })]
        );
    }

    #[test]
    fn empty_script_has_no_statements() {
        assert!(parse_script("  // nothing\n;;").unwrap().statements.is_empty());
    }

    #[test]
    fn unsupported_call_is_an_error() {
        let err = parse_script("console.log(1)").unwrap_err();
        assert_eq!(
            err,
            ScriptError::Unsupported {
                call: "console.log".to_string(),
                offset: 0
            }
        );
    }

    #[test]
    fn missing_closing_paren_reports_end() {
        let err = parse_script("pm.response.to.have.status(200").unwrap_err();
        assert!(err.to_string().contains("end of script"));
    }

    #[test]
    fn unknown_matcher_is_unsupported() {
        let err = parse_script("pm.expect(1).to.be.above(0)").unwrap_err();
        assert!(matches!(err, ScriptError::Unsupported { .. }));
    }
}
