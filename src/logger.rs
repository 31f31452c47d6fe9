use tracing_subscriber::{fmt, EnvFilter};

/// 初始化全局 tracing subscriber，日志级别由 `POSTBENCH_LOG` 控制（默认 `info`），
/// 例如 `POSTBENCH_LOG=postbench::core=debug,info`。日志写到 stderr，stdout 只留给结果输出。
pub fn init() {
    let filter =
        EnvFilter::try_from_env("POSTBENCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// 测试用，重复调用不会 panic
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
