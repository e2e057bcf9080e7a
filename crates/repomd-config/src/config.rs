use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use repomd_utils::path::{resolve_path, xdg_config_home};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{ConfigError, Result},
    source::{MdKind, SourceConfig},
};

pub const DEFAULT_ICON_DIR: &str = "/usr/share/pixmaps/comps";
pub const DEFAULT_METALINK_THRESHOLD: u32 = 50;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Value for `$releasever` in mirror URIs.
    pub releasever: Option<String>,

    /// Value for `$basearch` in mirror URIs.
    /// Default: derived from the machine architecture
    pub basearch: Option<String>,

    /// Directory holding comps category and group icons.
    /// Default: /usr/share/pixmaps/comps
    pub icon_dir: Option<String>,

    /// Lowest metalink preference still accepted when selecting mirrors.
    /// Default: 50
    pub metalink_threshold: Option<u32>,

    /// Configured metadata files.
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
}

/// Returns the config path from `REPOMD_CONFIG`, falling back to
/// `$XDG_CONFIG_HOME/repomd/config.toml`.
pub fn default_config_path() -> PathBuf {
    match std::env::var("REPOMD_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => xdg_config_home().join("repomd").join("config.toml"),
    }
}

fn machine_basearch() -> &'static str {
    match std::env::consts::ARCH {
        "x86" => "i386",
        other => other,
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the config file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading config from {}", path.display());

        let content = fs::read_to_string(path).map_err(|err| {
            ConfigError::IoError {
                path: path.display().to_string(),
                source: err,
            }
        })?;
        Self::parse(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for source in &self.sources {
            if source.repo.is_empty() || source.repo.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidRepository(source.repo.clone()));
            }
            if !seen.insert((source.repo.as_str(), source.kind)) {
                return Err(ConfigError::DuplicateSource {
                    repo: source.repo.clone(),
                    kind: source.kind.to_string(),
                });
            }
            if source.kind == MdKind::Unknown {
                warn!("source {} of repository {} has an unknown kind", source.path, source.repo);
            }
        }

        Ok(())
    }

    pub fn icon_dir(&self) -> Result<PathBuf> {
        match self.icon_dir.as_deref() {
            Some(dir) => Ok(resolve_path(dir)?),
            None => Ok(PathBuf::from(DEFAULT_ICON_DIR)),
        }
    }

    pub fn metalink_threshold(&self) -> u32 {
        self.metalink_threshold.unwrap_or(DEFAULT_METALINK_THRESHOLD)
    }

    pub fn basearch(&self) -> &str {
        match self.basearch.as_deref() {
            Some(basearch) => basearch,
            None => machine_basearch(),
        }
    }

    /// Replaces `$releasever` and `$basearch` in `text`.
    ///
    /// A value is only required when `text` references it.
    pub fn expand_substitutions(&self, text: &str) -> Result<String> {
        let mut expanded = text.to_string();

        if expanded.contains("$releasever") {
            let releasever = self
                .releasever
                .as_deref()
                .ok_or(ConfigError::MissingSubstitution("releasever"))?;
            expanded = expanded.replace("$releasever", releasever);
        }
        if expanded.contains("$basearch") {
            expanded = expanded.replace("$basearch", self.basearch());
        }

        Ok(expanded)
    }

    /// Sources declared for one repository, in file order.
    pub fn sources_for<'a>(&'a self, repo: &'a str) -> impl Iterator<Item = &'a SourceConfig> {
        self.sources.iter().filter(move |source| source.repo == repo)
    }

    pub fn find_source(&self, repo: &str, kind: MdKind) -> Option<&SourceConfig> {
        self.sources
            .iter()
            .find(|source| source.repo == repo && source.kind == kind)
    }

    /// Repository ids in order of first appearance.
    pub fn repositories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sources
            .iter()
            .map(|source| source.repo.as_str())
            .filter(|repo| seen.insert(*repo))
            .collect()
    }
}
