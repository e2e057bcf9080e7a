//! Backend for the `primary.xml` package index.

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
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Unknown,
    Name,
    Arch,
    Checksum,
    Summary,
    Description,
    Url,
    License,
    Group,
    Provides,
    Requires,
    Obsoletes,
}

const IGNORED: &[&[u8]] = &[
    b"packager",
    b"format",
    b"file",
    b"time",
    b"rpm:vendor",
    b"rpm:buildhost",
    b"rpm:header-range",
    b"rpm:sourcerpm",
];

struct Parser<'a> {
    repo_id: &'a str,
    section: Section,
    field: Field,
    package: Package,
    packages: Vec<Package>,
}

impl<'a> Parser<'a> {
    fn new(repo_id: &'a str) -> Self {
        Self {
            repo_id,
            section: Section::Unknown,
            field: Field::Unknown,
            package: Package::default(),
            packages: Vec::new(),
        }
    }

    fn start(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let name = element.name();
        let name = name.as_ref();

        if self.section == Section::Unknown {
            match name {
                b"metadata" => {}
                b"package" => {
                    self.section = Section::Package;
                    self.package = Package {
                        repo_id: self.repo_id.to_string(),
                        ..Default::default()
                    };
                }
                _ => trace!("unhandled element: {}", String::from_utf8_lossy(name)),
            }
            return Ok(());
        }

        if matches!(self.field, Field::Provides | Field::Requires | Field::Obsoletes) {
            if name == b"rpm:entry" {
                if let Some(entry) = xml::attribute(element, b"name")? {
                    match self.field {
                        Field::Provides => self.package.provides.push(entry),
                        Field::Requires => self.package.requires.push(entry),
                        _ => self.package.obsoletes.push(entry),
                    }
                }
            }
            return Ok(());
        }

        self.field = match name {
            b"name" => Field::Name,
            b"arch" => Field::Arch,
            b"checksum" => Field::Checksum,
            b"summary" => Field::Summary,
            b"description" => Field::Description,
            b"url" => Field::Url,
            b"rpm:license" => Field::License,
            b"rpm:group" => Field::Group,
            b"rpm:provides" => Field::Provides,
            b"rpm:requires" => Field::Requires,
            b"rpm:obsoletes" => Field::Obsoletes,
            b"version" => {
                self.package.epoch = xml::number(xml::attribute(element, b"epoch")?.as_deref());
                self.package.version = xml::attribute(element, b"ver")?.unwrap_or_default();
                self.package.release = xml::attribute(element, b"rel")?.unwrap_or_default();
                Field::Unknown
            }
            b"size" => {
                self.package.size = xml::number(xml::attribute(element, b"package")?.as_deref());
                Field::Unknown
            }
            b"location" => {
                self.package.location = xml::attribute(element, b"href")?;
                Field::Unknown
            }
            name if IGNORED.iter().any(|ignored| *ignored == name) => Field::Unknown,
            name => {
                trace!("unhandled package tag: {}", String::from_utf8_lossy(name));
                Field::Unknown
            }
        };
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        if self.section != Section::Package {
            return;
        }

        match name {
            b"package" => {
                self.packages.push(std::mem::take(&mut self.package));
                self.section = Section::Unknown;
                self.field = Field::Unknown;
            }
            b"rpm:entry" => {}
            _ => self.field = Field::Unknown,
        }
    }

    fn text(&mut self, text: String) {
        if self.section != Section::Package {
            return;
        }

        let package = &mut self.package;
        let slot = match self.field {
            Field::Name => {
                package.name = text;
                return;
            }
            Field::Arch => {
                package.arch = text;
                return;
            }
            Field::Checksum => &mut package.pkgid,
            Field::Summary => &mut package.summary,
            Field::Description => &mut package.description,
            Field::Url => &mut package.url,
            Field::License => &mut package.license,
            Field::Group => &mut package.category,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }
}

/// Reads every `package` element of a primary document.
pub(crate) fn parse<R: BufRead>(mut reader: Reader<R>, repo_id: &str) -> Result<Vec<Package>> {
    let mut parser = Parser::new(repo_id);
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
            Event::CData(e) => {
                if let Some(text) = xml::cdata(&e) {
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

/// Package index parsed from `primary.xml`.
pub struct PrimaryXml {
    info: MdInfo,
    packages: Vec<Package>,
    loaded: bool,
}

impl PrimaryXml {
    pub fn new(info: MdInfo) -> Self {
        Self {
            info,
            packages: Vec::new(),
            loaded: false,
        }
    }

    fn filter<F>(&mut self, progress: &mut Progress<'_>, keep: F) -> Result<Vec<Package>>
    where
        F: Fn(&Package) -> bool,
    {
        prepare(self, progress)?;
        let found = self
            .packages
            .iter()
            .filter(|package| keep(package))
            .cloned()
            .collect();
        progress.done()?;
        Ok(found)
    }
}

fn contains(value: Option<&str>, term: &str) -> bool {
    value.is_some_and(|value| value.contains(term))
}

impl MetadataSource for PrimaryXml {
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

    fn resolve(&mut self, names: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.filter(progress, |package| names.iter().any(|name| package.name == *name))
    }

    fn search_name(&mut self, terms: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.filter(progress, |package| {
            terms.iter().any(|term| package.name.contains(term.as_str()))
        })
    }

    fn search_details(
        &mut self,
        terms: &[String],
        progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        self.filter(progress, |package| {
            terms.iter().any(|term| {
                package.name.contains(term.as_str())
                    || contains(package.summary.as_deref(), term)
                    || contains(package.description.as_deref(), term)
            })
        })
    }

    fn search_group(&mut self, groups: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.filter(progress, |package| {
            groups
                .iter()
                .any(|group| contains(package.category.as_deref(), group))
        })
    }

    fn search_pkgid(&mut self, pkgids: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.filter(progress, |package| {
            pkgids
                .iter()
                .any(|pkgid| package.pkgid.as_deref() == Some(pkgid.as_str()))
        })
    }

    fn what_provides(
        &mut self,
        capabilities: &[String],
        progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        self.filter(progress, |package| {
            capabilities
                .iter()
                .any(|capability| package.provides.contains(capability))
        })
    }

    fn get_packages(&mut self, progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.filter(progress, |_| true)
    }

    fn find_package(&mut self, package_id: &str, progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.filter(progress, |package| package.package_id() == package_id)
    }
}
