use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use postbench::config::AppConfig;
use postbench::core::capture_variables::default_capture_rules;
use postbench::core::proxy_server;
use postbench::core::send_request::{send_request, Transport};
use postbench::core::show_result_with_table::{show_environment, show_outcome, show_workspaces};
use postbench::core::store::{OnConflict, Store};
use postbench::logger;
use postbench::models::args::{
    Args, Command, EnvCommand, ModuleCommand, RequestArgs, RequestCommand, SendArgs, WorkspaceCommand,
};
use postbench::models::saved_request::RequestDraft;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    let store_dir = args.store.clone().unwrap_or_else(|| config.store_dir());

    match args.command {
        Command::Serve { listen, timeout } => {
            let config = AppConfig {
                listen: listen.unwrap_or(config.listen),
                timeout_secs: timeout.unwrap_or(config.timeout_secs),
                ..config
            };
            proxy_server::serve(config.listen_addr()?, config.timeout_secs).await?;
        }
        Command::Send { request, send } => {
            let store = Store::open(&store_dir)?;
            let draft = draft_from_args("", &request)?;
            send_and_show(&store, &config, &draft, &send).await?;
        }
        Command::Run {
            workspace,
            module,
            request,
            send,
        } => {
            let store = Store::open(&store_dir)?;
            let saved = store.find_request(&workspace, &module, &request)?;
            info!(request = %saved.name, "loaded request");
            send_and_show(&store, &config, &saved.draft(), &send).await?;
        }
        Command::List => {
            let store = Store::open(&store_dir)?;
            show_workspaces(&store.list_workspaces()?);
        }
        Command::Workspace(WorkspaceCommand::Create { name }) => {
            let store = Store::open(&store_dir)?;
            let workspace = store.create_workspace(&name)?;
            println!("Workspace \"{}\" created", workspace.name);
        }
        Command::Module(ModuleCommand::Create { workspace, name }) => {
            let store = Store::open(&store_dir)?;
            let module = store.create_module(&workspace, &name)?;
            println!("Module \"{}\" created in \"{}\"", module.name, workspace);
        }
        Command::Request(RequestCommand::Save {
            workspace,
            module,
            name,
            request,
            overwrite,
            rename,
        }) => {
            let store = Store::open(&store_dir)?;
            let draft = draft_from_args(&name, &request)?;
            let on_conflict = match (overwrite, rename) {
                (true, _) => OnConflict::Overwrite,
                (false, Some(new_name)) => OnConflict::Rename(new_name),
                (false, None) => OnConflict::Abort,
            };
            let saved = store.save_request(&workspace, &module, draft, on_conflict)?;
            println!("✅ Request \"{}\" saved!", saved.name);
        }
        Command::Env(EnvCommand::Show { name }) => {
            let store = Store::open(&store_dir)?;
            show_environment(&store.resolve_environment(name.as_deref())?);
        }
        Command::Env(EnvCommand::Set { name, key, value }) => {
            let store = Store::open(&store_dir)?;
            show_environment(&store.set_var(&name, &key, &value)?);
        }
        Command::Env(EnvCommand::Unset { name, key }) => {
            let store = Store::open(&store_dir)?;
            show_environment(&store.delete_var(&name, &key)?);
        }
        Command::Export { file } => {
            let store = Store::open(&store_dir)?;
            store.export_to(&file)?;
            println!("Exported to {}", file.display());
        }
        Command::Import { file } => {
            let store = Store::open(&store_dir)?;
            let env = store.import_from(&file)?;
            println!("Imported!");
            show_environment(&env);
        }
    }
    Ok(())
}

fn draft_from_args(name: &str, args: &RequestArgs) -> anyhow::Result<RequestDraft> {
    let tests = match &args.tests {
        Some(path) => read_tests(path)?,
        None => String::new(),
    };
    Ok(RequestDraft {
        name: name.to_string(),
        method: args.method.to_uppercase(),
        url: args.url.clone(),
        headers: args.headers.join("\n"),
        body: args.body.clone(),
        tests,
    })
}

fn read_tests(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("读取测试脚本失败: {}", path.display()))
}

/// 发送并打印结果；抓到新变量时写回所用的环境
async fn send_and_show(
    store: &Store,
    config: &AppConfig,
    draft: &RequestDraft,
    send: &SendArgs,
) -> anyhow::Result<()> {
    let mut env = store.resolve_environment(send.env.as_deref())?;
    let transport = if send.direct {
        Transport::direct(config.timeout_secs)?
    } else {
        Transport::proxy(send.proxy.clone().unwrap_or_else(|| config.proxy_url.clone()))?
    };

    let outcome = send_request(draft, &mut env, &transport, &default_capture_rules()).await?;
    if !outcome.captured.is_empty() {
        store.save_environment(&env.name, &env.vars)?;
    }
    show_outcome(&outcome);
    Ok(())
}
