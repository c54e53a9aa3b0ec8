use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unsupported component type code {code} for '{name}'")]
    UnsupportedType { name: String, code: i32 },

    #[error("Document module not found: {0}")]
    ModuleNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Host error: {0}")]
    Host(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported container: {}", .0.display())]
    UnsupportedContainer(PathBuf),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl SyncError {
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::FileIo {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
