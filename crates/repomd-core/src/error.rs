//! Error types for repomd-core.

use miette::Diagnostic;
use repomd_config::{error::ConfigError, source::MdKind};
use repomd_db::DbError;
use repomd_events::ProgressError;
use repomd_utils::error::{FileSystemError, HashError};
use thiserror::Error;

/// Error type for metadata source operations.
#[derive(Error, Diagnostic, Debug)]
pub enum MdError {
    #[error("{0}")]
    #[diagnostic(code(repomd::failed))]
    Failed(String),

    #[error("Operation `{operation}` cannot be performed on {kind} metadata")]
    #[diagnostic(
        code(repomd::no_support),
        help("Configure a source of a kind that supports this query")
    )]
    NoSupport {
        operation: &'static str,
        kind: MdKind,
    },

    #[error("Failed to load {kind} metadata for {id}: {source}")]
    #[diagnostic(code(repomd::failed_to_load))]
    FailedToLoad {
        id: String,
        kind: MdKind,
        #[source]
        source: Box<MdError>,
    },

    #[error("SQL statement failed: {0}")]
    #[diagnostic(
        code(repomd::bad_sql),
        help("The metadata store may be corrupted. Try fetching it again.")
    )]
    BadSql(String),

    #[error("Failed to parse `{path}`: {message}")]
    #[diagnostic(code(repomd::xml), help("The document may be truncated or malformed"))]
    Xml { path: String, message: String },

    #[error("Checksum mismatch for `{path}`: expected {expected}, got {actual}")]
    #[diagnostic(
        code(repomd::checksum),
        help("The metadata file may be stale or corrupted. Try fetching it again.")
    )]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Error while {action}")]
    #[diagnostic(code(repomd::io), help("Check file permissions"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(code(repomd::hash))]
    Hash(#[from] HashError),

    #[error(transparent)]
    #[diagnostic(code(repomd::filesystem))]
    FileSystem(#[from] FileSystemError),
}

impl MdError {
    pub fn no_support(operation: &'static str, kind: MdKind) -> Self {
        Self::NoSupport {
            operation,
            kind,
        }
    }

    /// Attaches the document path to a parse error raised without one.
    pub fn at_path(self, path: &std::path::Path) -> Self {
        match self {
            Self::Xml {
                path: ref current,
                message,
            } if current.is_empty() => {
                Self::Xml {
                    path: path.display().to_string(),
                    message,
                }
            }
            err => err,
        }
    }

    /// True if the user cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Progress(ProgressError::Cancelled) => true,
            Self::FailedToLoad {
                source, ..
            } => source.is_cancelled(),
            _ => false,
        }
    }
}

impl From<DbError> for MdError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionError(msg) if msg.starts_with("can't open database") => {
                Self::BadSql(msg)
            }
            DbError::ConnectionError(msg) => Self::BadSql(format!("can't open database: {msg}")),
            DbError::QueryError(msg) | DbError::NotFound(msg) => Self::BadSql(msg),
        }
    }
}

impl From<diesel::result::Error> for MdError {
    fn from(err: diesel::result::Error) -> Self {
        DbError::from(err).into()
    }
}

impl From<diesel::result::ConnectionError> for MdError {
    fn from(err: diesel::result::ConnectionError) -> Self {
        DbError::from(err).into()
    }
}

impl From<quick_xml::events::attributes::AttrError> for MdError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        quick_xml::Error::from(err).into()
    }
}

impl From<quick_xml::Error> for MdError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml {
            path: String::new(),
            message: err.to_string(),
        }
    }
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, MdError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, MdError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            MdError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

pub type Result<T> = std::result::Result<T, MdError>;
