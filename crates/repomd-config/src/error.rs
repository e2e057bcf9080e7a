use miette::Diagnostic;
use repomd_utils::error::{HashError, PathError, UtilsError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(repomd_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Failed to read config file `{path}`: {source}")]
    #[diagnostic(
        code(repomd_config::io),
        help("Pass an existing file with --config or set REPOMD_CONFIG")
    )]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(repomd_config::utils))]
    Utils(#[from] UtilsError),

    #[error("Invalid repository id: {0:?}")]
    #[diagnostic(
        code(repomd_config::invalid_repository),
        help("Repository ids must be non-empty and contain no whitespace")
    )]
    InvalidRepository(String),

    #[error("Duplicate source `{kind}` for repository `{repo}`")]
    #[diagnostic(
        code(repomd_config::duplicate_source),
        help("Each repository may declare a metadata kind only once")
    )]
    DuplicateSource { repo: String, kind: String },

    #[error("No value configured for `${0}`")]
    #[diagnostic(
        code(repomd_config::missing_substitution),
        help("Set it at the top level of config.toml")
    )]
    MissingSubstitution(&'static str),
}

impl From<PathError> for ConfigError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

impl From<HashError> for ConfigError {
    fn from(err: HashError) -> Self {
        Self::Utils(UtilsError::Hash(err))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
