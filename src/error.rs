//! Generation-time errors. Every variant names the descriptor file it came from.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {field}: {reason}", file.display())]
    SpecValidation {
        file: PathBuf,
        field: String,
        reason: String,
    },
    #[error("{}: protocol id {id} is already declared by {}", file.display(), previous.display())]
    DuplicateProtocolId {
        id: u32,
        file: PathBuf,
        previous: PathBuf,
    },
    #[error("{}: protocol: unknown protocol id {id}", file.display())]
    UnknownProtocolId { id: u32, file: PathBuf },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: invalid YAML: {source}", file.display())]
    Yaml {
        file: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn validation(file: impl Into<PathBuf>, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SpecValidation {
            file: file.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
