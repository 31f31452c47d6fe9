use prettytable::{format, row, Cell, Row, Table};

use crate::models::environment::Environment;
use crate::models::result::{SendOutcome, TestReport};
use crate::models::workspace::Workspace;

/// 打印一次发送的结果：状态码、格式化后的响应、抓取到的变量和测试结果
pub fn show_outcome(outcome: &SendOutcome) {
    println!("Status: {}", outcome.status);
    println!("{}", outcome.rendered);
    if !outcome.captured.is_empty() {
        println!("Captured: {}", outcome.captured.join(", "));
    }
    if let Some(report) = &outcome.report {
        show_report(report);
    }
}

pub fn show_report(report: &TestReport) {
    if !report.outcomes.is_empty() {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(row!["", "Test", "Message"]);
        for outcome in &report.outcomes {
            let mark = if outcome.passed { "✅" } else { "❌" };
            table.add_row(Row::new(vec![
                Cell::new(mark),
                Cell::new(&outcome.name),
                Cell::new(outcome.message.as_deref().unwrap_or("")).style_spec("R"),
            ]));
        }
        println!("Tests:");
        table.printstd();
        println!(
            "{} passed, {} failed",
            report.passed_count(),
            report.failed_count()
        );
    }
    if let Some(error) = &report.script_error {
        println!("{}", error);
    }
}

/// 工作区 / 模块 / 请求树
pub fn show_workspaces(workspaces: &[Workspace]) {
    if workspaces.is_empty() {
        println!("No workspaces yet.");
        return;
    }
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(row!["Workspace", "Module", "Request", "Method", "Saved"]);
    for workspace in workspaces {
        table.add_row(row![format!("📁 {}", workspace.name), "", "", "", ""]);
        for module in &workspace.modules {
            table.add_row(row!["", format!("📂 {}", module.name), "", "", ""]);
            for request in &module.requests {
                table.add_row(row![
                    "",
                    "",
                    format!("📄 {}", request.name),
                    request.method.to_uppercase(),
                    request.timestamp
                ]);
            }
        }
    }
    table.printstd();
}

pub fn show_environment(env: &Environment) {
    println!("Environment: {}", env.name);
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(row!["Key", "Value"]);
    for (key, value) in &env.vars {
        table.add_row(row![key, value]);
    }
    table.printstd();
}
