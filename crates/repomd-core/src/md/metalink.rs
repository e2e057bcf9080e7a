//! Backend for metalink mirror documents.

use std::io::BufRead;

use quick_xml::{events::Event, Reader};
use repomd_config::config::Config;
use repomd_events::Progress;
use tracing::warn;

use crate::{
    error::Result,
    md::xml,
    source::{prepare, MdInfo, MetadataSource},
    types::{MirrorEntry, Protocol},
};

const REPOMD_SUFFIX: &str = "/repodata/repomd.xml";

/// Strips `repodata/repomd.xml` so the stored URI is the repository base.
fn trim_repomd(uri: &str) -> &str {
    if uri.ends_with(REPOMD_SUFFIX) {
        &uri[..uri.len() - (REPOMD_SUFFIX.len() - 1)]
    } else {
        uri
    }
}

fn parse<R: BufRead>(mut reader: Reader<R>) -> Result<Vec<MirrorEntry>> {
    let mut mirrors: Vec<MirrorEntry> = Vec::new();
    // index of the `url` element currently open
    let mut current: Option<usize> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"url" => {
                let protocol = xml::attribute(&e, b"protocol")?;
                let preference = xml::attribute(&e, b"preference")?;
                mirrors.push(MirrorEntry {
                    protocol: protocol.as_deref().map(Protocol::from_attr).unwrap_or_default(),
                    uri: String::new(),
                    preference: xml::number(preference.as_deref()),
                });
                current = Some(mirrors.len() - 1);
            }
            Event::Start(_) | Event::Empty(_) | Event::End(_) => current = None,
            Event::Text(e) => {
                if let Some(mirror) = current.and_then(|index| mirrors.get_mut(index)) {
                    if let Some(text) = xml::text(&e)? {
                        if mirror.uri.is_empty() {
                            mirror.uri = trim_repomd(&text).to_string();
                        } else {
                            warn!(
                                "previously set uri to '{}', cannot overwrite with '{text}'",
                                mirror.uri
                            );
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(mirrors)
}

/// Mirrors parsed from a metalink document.
pub struct Metalink {
    info: MdInfo,
    mirrors: Vec<MirrorEntry>,
    loaded: bool,
}

impl Metalink {
    pub fn new(info: MdInfo) -> Self {
        Self {
            info,
            mirrors: Vec::new(),
            loaded: false,
        }
    }

    pub fn get_mirrors(&mut self, progress: &mut Progress<'_>) -> Result<Vec<MirrorEntry>> {
        prepare(self, progress)?;
        let mirrors = self.mirrors.clone();
        progress.done()?;
        Ok(mirrors)
    }

    /// HTTP mirror URIs with a preference of at least `threshold`, in
    /// document order and with substitutions expanded.
    pub fn get_uris(
        &mut self,
        threshold: u32,
        config: &Config,
        progress: &mut Progress<'_>,
    ) -> Result<Vec<String>> {
        prepare(self, progress)?;
        let uris = self
            .mirrors
            .iter()
            .filter(|mirror| mirror.protocol == Protocol::Http && mirror.preference >= threshold)
            .map(|mirror| config.expand_substitutions(&mirror.uri))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        progress.done()?;
        Ok(uris)
    }
}

impl MetadataSource for Metalink {
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

        self.mirrors = self.info.load_with(
            progress,
            |path| parse(xml::open(path)?).map_err(|err| err.at_path(path)),
            Vec::len,
        )?;
        self.loaded = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use repomd_config::{config::DEFAULT_METALINK_THRESHOLD, error::ConfigError, source::MdKind};

    use super::*;
    use crate::{
        error::MdError,
        md::test_utils::{info, write_fixture, METALINK_XML},
    };

    fn source() -> (tempfile::TempDir, Metalink) {
        let (dir, path) = write_fixture("metalink.xml", METALINK_XML);
        (dir, Metalink::new(info(MdKind::Metalink, &path)))
    }

    fn config() -> Config {
        Config {
            releasever: Some("11".to_string()),
            basearch: Some("i386".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_trim_repomd() {
        assert_eq!(
            trim_repomd("http://example.com/os/repodata/repomd.xml"),
            "http://example.com/os/"
        );
        assert_eq!(trim_repomd("http://example.com/os/"), "http://example.com/os/");
        assert_eq!(trim_repomd("repodata/repomd.xml"), "repodata/repomd.xml");
    }

    #[test]
    fn test_parse_only_urls() {
        let mirrors = parse(xml::from_reader(METALINK_XML.as_bytes())).unwrap();
        assert_eq!(mirrors.len(), 6);
        assert_eq!(mirrors[1].protocol, Protocol::Ftp);
        assert_eq!(mirrors[2].protocol, Protocol::Rsync);
        assert_eq!(mirrors[3].preference, 60);
        assert_eq!(mirrors[3].uri, "http://ftp.example.de/pub/fedora/11/i386/os/");
        assert_eq!(mirrors[5].preference, 0);
    }

    #[test]
    fn test_get_uris_threshold() {
        let (_dir, mut md) = source();
        let uris = md
            .get_uris(DEFAULT_METALINK_THRESHOLD, &config(), &mut Progress::detached())
            .unwrap();
        assert_eq!(
            uris,
            vec![
                "http://mirror.example.com/fedora/releases/11/Everything/i386/os/",
                "http://ftp.example.de/pub/fedora/11/i386/os/",
            ]
        );

        let uris = md
            .get_uris(0, &config(), &mut Progress::detached())
            .unwrap();
        assert_eq!(uris.len(), 4);
    }

    #[test]
    fn test_get_uris_needs_releasever() {
        let (_dir, mut md) = source();
        let err = md
            .get_uris(50, &Config::default(), &mut Progress::detached())
            .unwrap_err();
        assert!(matches!(
            err,
            MdError::Config(ConfigError::MissingSubstitution("releasever"))
        ));
    }
}
