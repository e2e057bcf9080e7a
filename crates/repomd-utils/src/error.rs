use std::{error::Error, fmt, path::PathBuf};

#[derive(Debug)]
pub enum HashError {
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    UnknownAlgorithm(String),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashError::ReadFailed { path, source } => {
                write!(f, "Failed to read file `{}`: {source}", path.display())
            }
            HashError::UnknownAlgorithm(name) => {
                write!(f, "Unknown checksum algorithm `{name}`")
            }
        }
    }
}

impl Error for HashError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HashError::ReadFailed { source, .. } => Some(source),
            HashError::UnknownAlgorithm(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum PathError {
    CurrentDir { source: std::io::Error },

    Empty,

    MissingEnvVar { var: String, input: String },

    UnclosedVariable { input: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "Path is empty"),
            PathError::CurrentDir { source } => {
                write!(f, "Failed to get current directory: {source}")
            }
            PathError::UnclosedVariable { input } => {
                write!(f, "Unclosed variable expression starting at `{input}`")
            }
            PathError::MissingEnvVar { var, input } => {
                write!(f, "Environment variable `{var}` not set in `{input}`")
            }
        }
    }
}

impl Error for PathError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PathError::CurrentDir { source } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum FileSystemError {
    File {
        path: PathBuf,
        action: &'static str,
        source: std::io::Error,
    },
}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::File {
                path,
                action,
                source,
            } => {
                write!(f, "Failed to {action} file `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for FileSystemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FileSystemError::File { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub enum UtilsError {
    Hash(HashError),
    Path(PathError),
    FileSystem(FileSystemError),
}

impl fmt::Display for UtilsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilsError::Hash(err) => write!(f, "{err}"),
            UtilsError::Path(err) => write!(f, "{err}"),
            UtilsError::FileSystem(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UtilsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UtilsError::Hash(err) => Some(err),
            UtilsError::Path(err) => Some(err),
            UtilsError::FileSystem(err) => Some(err),
        }
    }
}

impl From<HashError> for UtilsError {
    fn from(err: HashError) -> Self {
        UtilsError::Hash(err)
    }
}

impl From<PathError> for UtilsError {
    fn from(err: PathError) -> Self {
        UtilsError::Path(err)
    }
}

impl From<FileSystemError> for UtilsError {
    fn from(err: FileSystemError) -> Self {
        UtilsError::FileSystem(err)
    }
}

pub type FileSystemResult<T> = std::result::Result<T, FileSystemError>;
pub type HashResult<T> = std::result::Result<T, HashError>;
pub type PathResult<T> = std::result::Result<T, PathError>;

pub type UtilsResult<T> = std::result::Result<T, UtilsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_hash_error_display_and_source() {
        let error = HashError::ReadFailed {
            path: PathBuf::from("/repodata/primary.xml"),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read file `/repodata/primary.xml`: file not found"
        );
        assert!(error.source().is_some());

        let error = HashError::UnknownAlgorithm("md4".to_string());
        assert_eq!(error.to_string(), "Unknown checksum algorithm `md4`");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_path_error_display() {
        assert_eq!(PathError::Empty.to_string(), "Path is empty");

        let missing = PathError::MissingEnvVar {
            var: "CACHE".to_string(),
            input: "$CACHE/fedora".to_string(),
        };
        assert_eq!(
            missing.to_string(),
            "Environment variable `CACHE` not set in `$CACHE/fedora`"
        );

        let unclosed = PathError::UnclosedVariable {
            input: "${CACHE".to_string(),
        };
        assert_eq!(
            unclosed.to_string(),
            "Unclosed variable expression starting at `${CACHE`"
        );
    }

    #[test]
    fn test_utils_error_from() {
        let err = UtilsError::from(FileSystemError::File {
            path: PathBuf::from("/tmp/filelists.xml"),
            action: "remove",
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        });
        assert_eq!(
            err.to_string(),
            "Failed to remove file `/tmp/filelists.xml`: permission denied"
        );
        assert!(err.source().is_some());

        let err = UtilsError::from(PathError::Empty);
        assert!(matches!(err, UtilsError::Path(PathError::Empty)));
    }
}
