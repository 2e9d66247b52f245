use std::{fmt, io};

use crate::{
    compression::CorruptionError,
    container::FormatError,
    pool::PoolError,
};

pub type MtcResult<T> = Result<T, MtcError>;

/// Coarse classification of an [`MtcError`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    Corruption,
    Argument,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io         => "I/O error",
            ErrorKind::Format     => "format error",
            ErrorKind::Corruption => "corruption error",
            ErrorKind::Argument   => "argument error",
            ErrorKind::Internal   => "internal error",
        };
        f.write_str(name)
    }
}

/// Unified error covering I/O, container format, codec corruption, arguments
/// and worker pool failures.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Display messages are prefixed by their kind so users can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum MtcError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("corruption error: {0}")]
    Corruption(#[from] CorruptionError),

    #[error("argument error: {0}")]
    Argument(String),

    #[error("internal error: worker pool: {0}")]
    Pool(#[from] PoolError),

    #[error("internal error: {0}")]
    Pipeline(String),
}

impl MtcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MtcError::Io(_)         => ErrorKind::Io,
            MtcError::Format(_)     => ErrorKind::Format,
            MtcError::Corruption(_) => ErrorKind::Corruption,
            MtcError::Argument(_)   => ErrorKind::Argument,
            MtcError::Pool(_) | MtcError::Pipeline(_) => ErrorKind::Internal,
        }
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        MtcError::Argument(msg.into())
    }
}
