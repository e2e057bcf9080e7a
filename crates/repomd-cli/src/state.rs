use std::path::PathBuf;

use repomd_config::{
    config::{default_config_path, Config},
    error::ConfigError,
    source::SourceConfig,
};
use repomd_core::{open_source, MdError, MdInfo, MetadataSource, Result};
use repomd_events::{EventSinkHandle, Progress};
use repomd_utils::path::resolve_path;
use tracing::{debug, trace};

use crate::cli::Args;

/// Loaded configuration plus the event sink every query reports to.
pub struct AppState {
    config: Config,
    repo: Option<String>,
    events: EventSinkHandle,
}

impl AppState {
    pub fn new(config: Config, repo: Option<String>, events: EventSinkHandle) -> Self {
        Self {
            config,
            repo,
            events,
        }
    }

    pub fn from_args(args: &Args, events: EventSinkHandle) -> Result<Self> {
        let path = match args.config.as_deref() {
            Some(path) => resolve_path(path).map_err(ConfigError::from)?,
            None => default_config_path(),
        };
        let config = Config::load(&path)?;

        if let Some(repo) = args.repo.as_deref() {
            if !config.repositories().contains(&repo) {
                return Err(MdError::Failed(format!(
                    "repository `{repo}` is not configured in {}",
                    path.display()
                )));
            }
        }

        Ok(Self::new(config, args.repo.clone(), events))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn progress(&self) -> Progress<'static> {
        Progress::new(self.events.clone())
    }

    /// Repositories selected by `--repo`, or all of them.
    pub fn repositories(&self) -> Vec<&str> {
        match self.repo.as_deref() {
            Some(repo) => vec![repo],
            None => self.config.repositories(),
        }
    }

    /// Selected sources, in file order.
    pub fn sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.config
            .sources
            .iter()
            .filter(|source| self.repo.as_deref().map_or(true, |repo| source.repo == repo))
    }

    pub fn icon_dir(&self) -> Result<PathBuf> {
        Ok(self.config.icon_dir()?)
    }

    /// Runs `query` on every selected repository.
    ///
    /// Each repository is answered by its first source that supports the
    /// query; sources returning `NoSupport` are passed over.
    pub fn query_all<T, F>(&self, operation: &str, query: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut dyn MetadataSource, &mut Progress<'_>) -> Result<Vec<T>>,
    {
        let repos = self.repositories();
        self.query_repos(&repos, operation, query)
    }

    pub fn query_repos<T, F>(&self, repos: &[&str], operation: &str, mut query: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut dyn MetadataSource, &mut Progress<'_>) -> Result<Vec<T>>,
    {
        let mut results = Vec::new();
        let mut answered = false;

        for repo in repos {
            for source in self.config.sources_for(repo) {
                let mut md = match open_source(MdInfo::from_config(source)?, &self.config) {
                    Ok(md) => md,
                    Err(MdError::NoSupport {
                        ..
                    }) => continue,
                    Err(err) => return Err(err),
                };

                let mut progress = self.progress();
                match query(md.as_mut(), &mut progress) {
                    Ok(items) => {
                        debug!(
                            "{operation} answered by {} metadata of {repo} with {} results",
                            source.kind,
                            items.len()
                        );
                        results.extend(items);
                        answered = true;
                        break;
                    }
                    Err(MdError::NoSupport {
                        kind, ..
                    }) => {
                        trace!("{kind} metadata of {repo} cannot answer {operation}");
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        if !answered {
            return Err(MdError::Failed(format!(
                "no configured source can answer `{operation}`"
            )));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use repomd_config::source::MdKind;
    use repomd_events::NullSink;

    use super::*;

    const PRIMARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" packages="1">
<package type="rpm">
  <name>zsh</name>
  <arch>i686</arch>
  <version epoch="0" ver="4.3.10" rel="7.fc13"/>
  <checksum type="sha256" pkgid="YES">a26e37654285af42c469d2b5274becb65b81b27a44455cf4d9faf6c43a0c456e</checksum>
  <summary>A powerful interactive shell</summary>
</package>
</metadata>
"#;

    fn state(dir: &tempfile::TempDir) -> AppState {
        let primary = dir.path().join("primary.xml");
        std::fs::write(&primary, PRIMARY).unwrap();

        let content = format!(
            r#"
[[source]]
repo = "fedora"
kind = "other_db"
path = "{other}"

[[source]]
repo = "fedora"
kind = "primary"
path = "{primary}"

[[source]]
repo = "updates"
kind = "prestodelta"
path = "{other}"
"#,
            other = dir.path().join("other.sqlite").display(),
            primary = primary.display(),
        );
        let config = Config::parse(&content).unwrap();
        AppState::new(config, None, Arc::new(NullSink))
    }

    #[test]
    fn test_query_skips_unsupported_sources() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);

        let packages = state
            .query_all("resolve", |md, progress| {
                md.resolve(&["zsh".to_string()], progress)
            })
            .unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].repo_id, "fedora");
    }

    #[test]
    fn test_query_without_capable_source() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);

        let err = state
            .query_all("search_file", |md, progress| {
                md.search_file(&["/bin/zsh".to_string()], progress)
            })
            .unwrap_err();
        assert!(err.to_string().contains("search_file"));
    }

    #[test]
    fn test_repo_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(&dir);
        assert_eq!(state.repositories(), vec!["fedora", "updates"]);

        state.repo = Some("updates".to_string());
        assert_eq!(state.sources().count(), 1);
        assert!(state.sources().all(|source| source.kind == MdKind::Prestodelta));
    }
}
