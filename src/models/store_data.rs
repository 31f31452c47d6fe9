use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::environment::{vars_from_json, Vars};
use crate::models::workspace::Workspace;

/// 导入导出用的完整文档
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
    #[serde(default, deserialize_with = "deserialize_environments")]
    pub environments: BTreeMap<String, Vars>,
}

pub(crate) fn deserialize_environments<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vars>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, BTreeMap<String, Value>> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, vars)| (name, vars_from_json(vars)))
        .collect())
}
