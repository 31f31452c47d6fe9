use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid data in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Workspace \"{0}\" already exists!")]
    WorkspaceExists(String),
    #[error("Workspace \"{0}\" not found")]
    WorkspaceNotFound(String),
    #[error("Module \"{0}\" already exists!")]
    ModuleExists(String),
    #[error("Module \"{0}\" not found")]
    ModuleNotFound(String),
    #[error("A request named \"{0}\" already exists")]
    RequestExists(String),
    #[error("Request \"{0}\" not found")]
    RequestNotFound(String),
    #[error("Select a module and enter request name")]
    RequestNameRequired,
    #[error("Name is required")]
    NameRequired,
    #[error("Key is required")]
    KeyRequired,
    #[error("Duplicate name: {0}")]
    DuplicateName(String),
}
