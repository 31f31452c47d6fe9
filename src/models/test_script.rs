use serde_json::Value;

/// 解析后的测试脚本
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Script {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// `pm.test("name", function () { ... })`
    Test {
        name: String,
        assertions: Vec<Assertion>,
    },
    /// 写在 pm.test 外面的断言
    Assert(Assertion),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Assertion {
    Status(u16),
    Equal { actual: Expr, expected: Value },
    Eql { actual: Expr, expected: Value },
    HasProperty { actual: Expr, property: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    Text,
    Code,
    Json(Vec<Accessor>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Accessor {
    Key(String),
    Index(usize),
}
