use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::check_names::check_names;
use crate::error::StoreError;
use crate::models::environment::{
    vars_from_json, Environment, Vars, DEFAULT_ENVIRONMENT, LOCAL_ENVIRONMENT,
};
use crate::models::saved_request::{RequestDraft, SavedRequest};
use crate::models::store_data::StoreData;
use crate::models::workspace::{Module, Workspace};

const WORKSPACES_FILE: &str = "workspaces.json";
const ENVIRONMENTS_FILE: &str = "environments.json";

/// 同名请求已存在时怎么处理
#[derive(Clone, Debug, PartialEq)]
pub enum OnConflict {
    Overwrite,
    Rename(String),
    Abort,
}

impl OnConflict {
    /// 默认的新名字 `<name>_copy`
    pub fn copy_of(name: &str) -> Self {
        OnConflict::Rename(format!("{}_copy", name))
    }
}

/// 本地存储：一个目录下两个 JSON 文件，分别存工作区和环境。
///
/// 每次修改都是完整的读-改-写，没有并发写入者。
#[derive(Clone, Debug)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ---------------------------------------------------------------------
    // 工作区 / 模块 / 请求
    // ---------------------------------------------------------------------

    pub fn list_workspaces(&self) -> Result<Vec<Workspace>, StoreError> {
        self.read_or_default(WORKSPACES_FILE)
    }

    fn write_workspaces(&self, workspaces: &[Workspace]) -> Result<(), StoreError> {
        self.write(WORKSPACES_FILE, &workspaces)
    }

    pub fn create_workspace(&self, name: &str) -> Result<Workspace, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::NameRequired);
        }
        let mut workspaces = self.list_workspaces()?;
        if workspaces.iter().any(|ws| ws.name == name) {
            return Err(StoreError::WorkspaceExists(name.to_string()));
        }
        let workspace = Workspace::new(name);
        workspaces.push(workspace.clone());
        self.write_workspaces(&workspaces)?;
        info!(workspace = name, "workspace created");
        Ok(workspace)
    }

    pub fn create_module(&self, workspace_name: &str, module_name: &str) -> Result<Module, StoreError> {
        let module_name = module_name.trim();
        if module_name.is_empty() {
            return Err(StoreError::NameRequired);
        }
        let mut workspaces = self.list_workspaces()?;
        let workspace = workspaces
            .iter_mut()
            .find(|ws| ws.name == workspace_name)
            .ok_or_else(|| StoreError::WorkspaceNotFound(workspace_name.to_string()))?;
        if workspace.module(module_name).is_some() {
            return Err(StoreError::ModuleExists(module_name.to_string()));
        }
        let module = Module::new(module_name);
        workspace.modules.push(module.clone());
        self.write_workspaces(&workspaces)?;
        info!(workspace = workspace_name, module = module_name, "module created");
        Ok(module)
    }

    /// 保存请求。同名时按 `on_conflict` 覆盖、改名追加或放弃。
    pub fn save_request(
        &self,
        workspace_name: &str,
        module_name: &str,
        draft: RequestDraft,
        on_conflict: OnConflict,
    ) -> Result<SavedRequest, StoreError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() || module_name.is_empty() {
            return Err(StoreError::RequestNameRequired);
        }
        let mut workspaces = self.list_workspaces()?;
        let module = workspaces
            .iter_mut()
            .find(|ws| ws.name == workspace_name)
            .ok_or_else(|| StoreError::WorkspaceNotFound(workspace_name.to_string()))?
            .module_mut(module_name)
            .ok_or_else(|| StoreError::ModuleNotFound(module_name.to_string()))?;

        let mut request = RequestDraft { name: name.clone(), ..draft }.into_saved();
        match module.requests.iter().position(|r| r.name == name) {
            None => module.requests.push(request.clone()),
            Some(index) => match on_conflict {
                OnConflict::Overwrite => module.requests[index] = request.clone(),
                OnConflict::Rename(new_name) => {
                    let new_name = new_name.trim().to_string();
                    if new_name.is_empty() {
                        return Err(StoreError::RequestNameRequired);
                    }
                    if module.request(&new_name).is_some() {
                        return Err(StoreError::RequestExists(new_name));
                    }
                    request.name = new_name;
                    module.requests.push(request.clone());
                }
                OnConflict::Abort => return Err(StoreError::RequestExists(name)),
            },
        }
        self.write_workspaces(&workspaces)?;
        info!(
            workspace = workspace_name,
            module = module_name,
            request = %request.name,
            "request saved"
        );
        Ok(request)
    }

    pub fn find_request(
        &self,
        workspace_name: &str,
        module_name: &str,
        request_name: &str,
    ) -> Result<SavedRequest, StoreError> {
        let workspaces = self.list_workspaces()?;
        let workspace = workspaces
            .iter()
            .find(|ws| ws.name == workspace_name)
            .ok_or_else(|| StoreError::WorkspaceNotFound(workspace_name.to_string()))?;
        let module = workspace
            .module(module_name)
            .ok_or_else(|| StoreError::ModuleNotFound(module_name.to_string()))?;
        module
            .request(request_name)
            .cloned()
            .ok_or_else(|| StoreError::RequestNotFound(request_name.to_string()))
    }

    // ---------------------------------------------------------------------
    // 环境
    // ---------------------------------------------------------------------

    pub fn environments(&self) -> Result<BTreeMap<String, Vars>, StoreError> {
        let raw: BTreeMap<String, BTreeMap<String, Value>> = self.read_or_default(ENVIRONMENTS_FILE)?;
        Ok(raw
            .into_iter()
            .map(|(name, vars)| (name, vars_from_json(vars)))
            .collect())
    }

    /// 空名字存为 Default
    pub fn save_environment(&self, name: &str, vars: &Vars) -> Result<String, StoreError> {
        let name = match name.trim() {
            "" => DEFAULT_ENVIRONMENT,
            name => name,
        };
        let mut saved = self.environments()?;
        saved.insert(name.to_string(), vars.clone());
        self.write(ENVIRONMENTS_FILE, &saved)?;
        info!(environment = name, "environment saved");
        Ok(name.to_string())
    }

    pub fn load_environment(&self, name: &str) -> Result<Option<Environment>, StoreError> {
        Ok(self
            .environments()?
            .remove(name)
            .map(|vars| Environment::new(name, vars)))
    }

    /// 启动时使用的环境：Local 优先，其次 Default，都没有就用内置的初始变量
    pub fn initial_environment(&self) -> Result<Environment, StoreError> {
        let mut saved = self.environments()?;
        for name in [LOCAL_ENVIRONMENT, DEFAULT_ENVIRONMENT] {
            if let Some(vars) = saved.remove(name) {
                return Ok(Environment::new(name, vars));
            }
        }
        Ok(Environment::seed())
    }

    /// 指定了名字就读那个环境（不存在则新建空的），否则用初始环境
    pub fn resolve_environment(&self, name: Option<&str>) -> Result<Environment, StoreError> {
        match name {
            Some(name) => Ok(self
                .load_environment(name)?
                .unwrap_or_else(|| Environment::new(name, Vars::new()))),
            None => self.initial_environment(),
        }
    }

    pub fn set_var(&self, env_name: &str, key: &str, value: &str) -> Result<Environment, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::KeyRequired);
        }
        let mut env = self.resolve_environment(Some(env_name))?;
        env.vars.insert(key.to_string(), value.trim().to_string());
        self.save_environment(&env.name, &env.vars)?;
        Ok(env)
    }

    pub fn delete_var(&self, env_name: &str, key: &str) -> Result<Environment, StoreError> {
        let mut env = self.resolve_environment(Some(env_name))?;
        env.vars.remove(key.trim());
        self.save_environment(&env.name, &env.vars)?;
        Ok(env)
    }

    // ---------------------------------------------------------------------
    // 导入导出
    // ---------------------------------------------------------------------

    pub fn export_data(&self) -> Result<StoreData, StoreError> {
        Ok(StoreData {
            workspaces: self.list_workspaces()?,
            environments: self.environments()?,
        })
    }

    pub fn export_to(&self, path: &Path) -> Result<(), StoreError> {
        let data = self.export_data()?;
        write_json(path, &data)?;
        info!(path = %path.display(), workspaces = data.workspaces.len(), "exported");
        Ok(())
    }

    /// 用导入文件替换全部数据，返回新的当前环境（文件里的 Default）
    pub fn import_from(&self, path: &Path) -> Result<Environment, StoreError> {
        let data: StoreData = read_json(path)?.unwrap_or_default();
        self.import_data(data)
    }

    pub fn import_data(&self, data: StoreData) -> Result<Environment, StoreError> {
        check_names(&data.workspaces)?;
        self.write_workspaces(&data.workspaces)?;
        self.write(ENVIRONMENTS_FILE, &data.environments)?;
        info!(workspaces = data.workspaces.len(), environments = data.environments.len(), "imported");
        let vars = data
            .environments
            .get(DEFAULT_ENVIRONMENT)
            .cloned()
            .unwrap_or_default();
        Ok(Environment::new(DEFAULT_ENVIRONMENT, vars))
    }

    // ---------------------------------------------------------------------

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StoreError> {
        Ok(read_json(&self.dir.join(file))?.unwrap_or_default())
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        write_json(&self.dir.join(file), value)
    }
}

/// 文件不存在返回 `None`
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "file missing, using empty data");
            return Ok(None);
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
