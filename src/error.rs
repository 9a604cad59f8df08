use std::path::PathBuf;
use thiserror::Error;

/// Result type for scene file operations.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Hard failures. Parsing itself never fails; only the filesystem can.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write scene file `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
