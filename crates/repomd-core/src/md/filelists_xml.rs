//! Backend for the `filelists.xml` document.

use std::io::BufRead;

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use repomd_events::Progress;
use tracing::trace;

use crate::{
    error::Result,
    md::xml,
    source::{prepare, MdInfo, MetadataSource},
    types::Package,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Unknown,
    List,
    Package,
    File,
}

struct Parser<'a> {
    repo_id: &'a str,
    section: Section,
    package: Package,
    packages: Vec<Package>,
}

impl<'a> Parser<'a> {
    fn start(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let name = element.name();
        match (self.section, name.as_ref()) {
            (Section::Unknown, b"filelists") => self.section = Section::List,
            (Section::List, b"package") => {
                self.section = Section::Package;
                self.package = Package {
                    repo_id: self.repo_id.to_string(),
                    pkgid: xml::attribute(element, b"pkgid")?,
                    name: xml::attribute(element, b"name")?.unwrap_or_default(),
                    arch: xml::attribute(element, b"arch")?.unwrap_or_default(),
                    ..Default::default()
                };
            }
            (Section::Package, b"version") => {
                self.package.epoch = xml::number(xml::attribute(element, b"epoch")?.as_deref());
                self.package.version = xml::attribute(element, b"ver")?.unwrap_or_default();
                self.package.release = xml::attribute(element, b"rel")?.unwrap_or_default();
            }
            (Section::Package, b"file") => self.section = Section::File,
            (section, name) => {
                trace!(
                    "unhandled tag {} in {section:?}",
                    String::from_utf8_lossy(name)
                );
            }
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match (self.section, name) {
            (Section::File, b"file") => self.section = Section::Package,
            (Section::Package, b"package") => {
                self.packages.push(std::mem::take(&mut self.package));
                self.section = Section::List;
            }
            (Section::List, b"filelists") => self.section = Section::Unknown,
            _ => {}
        }
    }

    fn text(&mut self, text: String) {
        if self.section == Section::File {
            self.package.files.push(text);
        }
    }
}

/// Reads the file list of every package.
pub(crate) fn parse<R: BufRead>(mut reader: Reader<R>, repo_id: &str) -> Result<Vec<Package>> {
    let mut parser = Parser {
        repo_id,
        section: Section::Unknown,
        package: Package::default(),
        packages: Vec::new(),
    };
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => parser.start(&e)?,
            Event::Empty(e) => {
                parser.start(&e)?;
                parser.end(e.name().as_ref());
            }
            Event::End(e) => parser.end(e.name().as_ref()),
            Event::Text(e) => {
                if let Some(text) = xml::text(&e)? {
                    parser.text(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.packages)
}

/// File lists parsed from `filelists.xml`.
///
/// Records are package shells carrying only identity, pkgid and files.
pub struct FilelistsXml {
    info: MdInfo,
    packages: Vec<Package>,
    loaded: bool,
}

impl FilelistsXml {
    pub fn new(info: MdInfo) -> Self {
        Self {
            info,
            packages: Vec::new(),
            loaded: false,
        }
    }
}

impl MetadataSource for FilelistsXml {
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

        let repo_id = self.info.id.as_str();
        self.packages = self.info.load_with(
            progress,
            |path| parse(xml::open(path)?, repo_id).map_err(|err| err.at_path(path)),
            Vec::len,
        )?;
        self.loaded = true;
        Ok(())
    }

    fn search_file(&mut self, paths: &[String], progress: &mut Progress<'_>) -> Result<Vec<String>> {
        prepare(self, progress)?;

        let mut pkgids = Vec::new();
        if !self.packages.is_empty() {
            let mut packages = progress.child();
            packages.set_number_steps(self.packages.len())?;

            for package in &self.packages {
                if package.files.iter().any(|file| paths.contains(file)) {
                    if let Some(pkgid) = &package.pkgid {
                        pkgids.push(pkgid.clone());
                    }
                }
                packages.done()?;
            }
        }

        progress.done()?;
        Ok(pkgids)
    }

    fn get_files(&mut self, package: &Package, progress: &mut Progress<'_>) -> Result<Vec<String>> {
        prepare(self, progress)?;

        let files = match package.pkgid.as_deref() {
            Some(pkgid) => {
                self.packages
                    .iter()
                    .find(|candidate| candidate.pkgid.as_deref() == Some(pkgid))
                    .map(|candidate| candidate.files.clone())
                    .unwrap_or_default()
            }
            None => {
                trace!("{package} has no pkgid, so no files can be matched");
                Vec::new()
            }
        };

        progress.done()?;
        Ok(files)
    }
}
