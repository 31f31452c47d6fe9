use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::forward::DEFAULT_TIMEOUT_SECS;
use crate::error::ConfigError;

/// 配置文件 `config.toml`，所有字段都有默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 代理监听地址
    #[serde(default = "default_listen")]
    pub listen: String,
    /// 客户端发送时使用的代理地址
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// 代理转发超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 存放工作区和环境的目录
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            proxy_url: default_proxy_url(),
            timeout_secs: default_timeout_secs(),
            store_dir: None,
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_proxy_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AppConfig {
    /// 指定的路径必须存在；没指定时读默认位置，不存在就用默认值
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen
            .parse()
            .map_err(|source| ConfigError::InvalidListen {
                addr: self.listen.clone(),
                source,
            })
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(default_store_dir)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("postbench").join("config.toml"))
}

pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("postbench"))
        .unwrap_or_else(|| PathBuf::from(".postbench"))
}
