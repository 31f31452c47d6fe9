/// 上游返回的结果，body 原样转发
#[derive(Debug, Clone)]
pub struct ForwardResult {
    pub status: u16,
    pub body: Vec<u8>,
}

/// 测试运行时看到的响应
#[derive(Debug, Clone)]
pub struct ResponseView<'a> {
    pub status: u16,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestReport {
    pub outcomes: Vec<TestOutcome>,
    pub script_error: Option<String>,
}

impl TestReport {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.script_error.is_none() && self.failed_count() == 0
    }
}

/// 一次发送的完整结果
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub status: u16,
    pub body: String,
    pub rendered: String,
    pub captured: Vec<String>,
    pub report: Option<TestReport>,
}
