// Crate-wide error type. View operations never surface these to callers;
// they are logged and the operation degrades to a no-op.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The host toolkit refused a surface or window request.
    #[error("host error: {0}")]
    Host(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "desktop")]
    #[error("tauri error: {0}")]
    Tauri(#[from] tauri::Error),
}

impl Error {
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
