//! Backend for plain-text mirror lists.

use repomd_config::config::Config;
use repomd_events::Progress;
use repomd_utils::fs::read_to_string;
use tracing::trace;

use crate::{
    error::Result,
    source::{prepare, MdInfo, MetadataSource},
};

/// Keeps the `http://` lines of a mirror list.
fn parse(content: &str) -> Vec<String> {
    content
        .split('\n')
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            let keep = line.starts_with("http://");
            if !keep {
                trace!("skipping mirror {line}");
            }
            keep
        })
        .map(String::from)
        .collect()
}

/// Mirror URIs read from a mirror list.
pub struct Mirrorlist {
    info: MdInfo,
    uris: Vec<String>,
    loaded: bool,
}

impl Mirrorlist {
    pub fn new(info: MdInfo) -> Self {
        Self {
            info,
            uris: Vec::new(),
            loaded: false,
        }
    }

    /// Mirror URIs in file order, with substitutions expanded.
    pub fn get_uris(&mut self, config: &Config, progress: &mut Progress<'_>) -> Result<Vec<String>> {
        prepare(self, progress)?;
        let uris = self
            .uris
            .iter()
            .map(|uri| config.expand_substitutions(uri))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        progress.done()?;
        Ok(uris)
    }
}

impl MetadataSource for Mirrorlist {
    fn info(&self) -> &MdInfo {
        &self.info
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn load(&mut self, progress: &mut Progress<'_>) -> Result<()> {
        if self.loaded {
            return Ok(());
        }

        self.uris = self.info.load_with(
            progress,
            |path| Ok(parse(&read_to_string(path)?)),
            Vec::len,
        )?;
        self.loaded = true;
        Ok(())
    }
}
