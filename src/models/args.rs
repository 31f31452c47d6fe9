use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "postbench", version, about = "A small API testing client with a relay proxy", long_about = None)]
pub struct Args {
    /// 配置文件
    #[arg(short, long, global = true, env = "POSTBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// 数据目录，覆盖配置文件
    #[arg(long, global = true, env = "POSTBENCH_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 启动转发代理
    Serve {
        /// 监听地址
        #[arg(short, long)]
        listen: Option<String>,

        /// 转发超时（秒）
        #[arg(short, long)]
        timeout: Option<u64>,
    },
    /// 临时组装一个请求并发送
    Send {
        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        send: SendArgs,
    },
    /// 发送已保存的请求
    Run {
        workspace: String,
        module: String,
        request: String,

        #[command(flatten)]
        send: SendArgs,
    },
    /// 列出全部工作区、模块和请求
    List,
    /// 工作区
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
    /// 模块
    #[command(subcommand)]
    Module(ModuleCommand),
    /// 保存请求
    #[command(subcommand)]
    Request(RequestCommand),
    /// 环境变量
    #[command(subcommand)]
    Env(EnvCommand),
    /// 导出工作区和环境到一个 JSON 文件
    Export { file: PathBuf },
    /// 从 JSON 文件导入，替换现有数据
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    Create { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommand {
    Create { workspace: String, name: String },
}

#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    Save {
        workspace: String,
        module: String,
        name: String,

        #[command(flatten)]
        request: RequestArgs,

        /// 同名时覆盖
        #[arg(long, conflicts_with = "rename")]
        overwrite: bool,

        /// 同名时以新名字另存
        #[arg(long)]
        rename: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EnvCommand {
    /// 显示环境，不指定时显示启动默认环境
    Show { name: Option<String> },
    Set { name: String, key: String, value: String },
    Unset { name: String, key: String },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RequestArgs {
    /// 请求方法
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// 目标地址，可以包含 {{var}}
    #[arg(short, long)]
    pub url: String,

    /// 请求头 `Key: Value`，可重复
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// 请求体
    #[arg(short, long, default_value = "")]
    pub body: String,

    /// 测试脚本文件
    #[arg(long)]
    pub tests: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SendArgs {
    /// 使用的环境
    #[arg(short, long)]
    pub env: Option<String>,

    /// 不经过代理，进程内直接转发
    #[arg(long)]
    pub direct: bool,

    /// 代理地址，覆盖配置文件
    #[arg(long)]
    pub proxy: Option<String>,
}
