use thiserror::Error;

/// 测试脚本无法解析时的错误，带出错位置（字节偏移）。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("Test script error: unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("Test script error: unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("Test script error: invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[error("Test script error: expected {expected}, found {found} at offset {offset}")]
    Expected {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("Test script error: unsupported call '{call}' at offset {offset}")]
    Unsupported { call: String, offset: usize },
}
