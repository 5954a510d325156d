use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot save an empty arrangement.")]
    EmptyArrangement,

    #[error("File {} has {levels} difficulty levels, only one is supported", file.display())]
    UnsupportedDifficulty { file: PathBuf, levels: usize },

    #[error("Failed to read {}: {message}", path.display())]
    XmlRead { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", path.display())]
    XmlWrite { path: PathBuf, message: String },

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("{kind} combination panicked")]
    RunPanicked { kind: String },

    #[error("Audio tool exited with code {code}")]
    AudioToolFailed { code: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn xml_read(path: &std::path::Path, e: impl std::fmt::Display) -> Self {
        Error::XmlRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }

    pub(crate) fn xml_write(path: &std::path::Path, e: impl std::fmt::Display) -> Self {
        Error::XmlWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
