use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Reasons a set specification is rejected before any command runs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid Set Type {0}")]
    InvalidSetType(String),

    #[error("invalid Hash Family {0}")]
    InvalidHashFamily(String),

    #[error("invalid Hash Size value {0}, should be >0")]
    InvalidHashSize(i64),

    #[error("invalid Max Element value {0}, should be >0")]
    InvalidMaxElement(i64),
}

/// Failure reported by an [`Executor`](super::Executor)
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error(
        "{command} exited with {}: {}",
        .code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")),
        .output.trim()
    )]
    Exit {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid specification for set {name:?}: {source}")]
    Validation {
        name: String,
        #[source]
        source: ValidationError,
    },

    #[error("{context}: {source}")]
    Exec {
        context: String,
        #[source]
        source: ExecError,
    },

    #[error("{context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("failed to open ipset lock {}: {source}", .path.display())]
    LockOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to acquire ipset lock {} within {timeout:?}", .path.display())]
    LockTimeout { path: PathBuf, timeout: Duration },

    #[error("failed to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
