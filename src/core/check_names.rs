use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::workspace::Workspace;

/// 导入的数据里名称不能为空，工作区和模块在同一层级内不能重复
pub(crate) fn check_names(workspaces: &[Workspace]) -> Result<(), StoreError> {
    let mut workspace_names = HashSet::new();
    for workspace in workspaces {
        if workspace.name.is_empty() {
            return Err(StoreError::NameRequired);
        }
        if !workspace_names.insert(workspace.name.as_str()) {
            return Err(StoreError::DuplicateName(workspace.name.clone()));
        }
        let mut module_names = HashSet::new();
        for module in &workspace.modules {
            if module.name.is_empty() {
                return Err(StoreError::NameRequired);
            }
            if !module_names.insert(module.name.as_str()) {
                return Err(StoreError::DuplicateName(format!("{}/{}", workspace.name, module.name)));
            }
            // 请求允许重名，反复另存为 `_copy` 的导出文件里就有
            if module.requests.iter().any(|request| request.name.is_empty()) {
                return Err(StoreError::NameRequired);
            }
        }
    }
    Ok(())
}
