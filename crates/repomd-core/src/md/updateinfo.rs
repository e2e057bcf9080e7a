//! Backend for the `updateinfo.xml` advisory document.

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
    types::{
        Package, PackageId, ReferenceKind, Update, UpdateKind, UpdateReference, UpdateState,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Unknown,
    Update,
    References,
    Pkglist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Unknown,
    Id,
    Title,
    Description,
    Reboot,
    Filename,
}

struct Parser {
    repo_id: String,
    section: Section,
    field: Field,
    update: Update,
    reference: UpdateReference,
    package: Package,
    updates: Vec<Update>,
}

/// `<reboot_suggested>` counts as set unless its text says otherwise.
fn parse_flag(text: &str) -> bool {
    !matches!(text.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no")
}

fn set_once(slot: &mut Option<String>, text: String) {
    if slot.is_none() {
        *slot = Some(text);
    }
}

impl Parser {
    fn new(repo_id: &str) -> Self {
        Self {
            repo_id: repo_id.to_string(),
            section: Section::Unknown,
            field: Field::Unknown,
            update: Update::default(),
            reference: UpdateReference::default(),
            package: Package::default(),
            updates: Vec::new(),
        }
    }

    fn start(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let name = element.name();

        self.field = match (self.section, name.as_ref()) {
            (Section::Unknown, b"update") => {
                let kind = xml::attribute(element, b"type")?;
                let state = xml::attribute(element, b"status")?;
                self.update = Update {
                    kind: UpdateKind::from_attr(kind.as_deref()),
                    state: UpdateState::from_attr(state.as_deref()),
                    ..Default::default()
                };
                self.section = Section::Update;
                Field::Unknown
            }
            (Section::Update, b"id") => Field::Id,
            (Section::Update, b"title") => Field::Title,
            (Section::Update, b"description") => Field::Description,
            (Section::Update, b"issued") => {
                if self.update.issued.is_none() {
                    self.update.issued = xml::attribute(element, b"date")?;
                }
                Field::Unknown
            }
            (Section::Update | Section::Pkglist, b"reboot_suggested") => {
                self.update.reboot_suggested = true;
                Field::Reboot
            }
            (Section::Update, b"references") => {
                self.section = Section::References;
                Field::Unknown
            }
            (Section::References, b"reference") => {
                let kind = xml::attribute(element, b"type")?;
                self.reference = UpdateReference {
                    kind: ReferenceKind::from_attr(kind.as_deref()),
                    id: xml::attribute(element, b"id")?,
                    url: xml::attribute(element, b"href")?,
                    title: xml::attribute(element, b"title")?,
                };
                Field::Unknown
            }
            (Section::Update, b"pkglist") => {
                self.section = Section::Pkglist;
                Field::Unknown
            }
            (Section::Pkglist, b"package") => {
                let epoch = xml::attribute(element, b"epoch")?;
                self.package = Package {
                    name: xml::attribute(element, b"name")?.unwrap_or_default(),
                    epoch: xml::number(epoch.as_deref()),
                    version: xml::attribute(element, b"version")?.unwrap_or_default(),
                    release: xml::attribute(element, b"release")?.unwrap_or_default(),
                    arch: xml::attribute(element, b"arch")?.unwrap_or_default(),
                    repo_id: self.repo_id.clone(),
                    location: xml::attribute(element, b"src")?,
                    ..Default::default()
                };
                Field::Unknown
            }
            (Section::Pkglist, b"filename") => Field::Filename,
            _ => Field::Unknown,
        };
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match (self.section, name) {
            (Section::Update, b"update") => {
                let update = std::mem::take(&mut self.update);
                trace!("added update {} with {} packages", update.id, update.packages.len());
                self.updates.push(update);
                self.section = Section::Unknown;
            }
            (Section::References, b"reference") => {
                let reference = std::mem::take(&mut self.reference);
                self.update.references.push(reference);
            }
            (Section::References, b"references") | (Section::Pkglist, b"pkglist") => {
                self.section = Section::Update;
            }
            (Section::Pkglist, b"package") => {
                let package = std::mem::take(&mut self.package);
                self.update.packages.push(package);
            }
            _ => {}
        }
        self.field = Field::Unknown;
    }

    fn text(&mut self, text: String) {
        match (self.section, self.field) {
            (Section::Update, Field::Id) if self.update.id.is_empty() => self.update.id = text,
            (Section::Update, Field::Title) => set_once(&mut self.update.title, text),
            (Section::Update, Field::Description) => set_once(&mut self.update.description, text),
            (_, Field::Reboot) => self.update.reboot_suggested = parse_flag(&text),
            (Section::Pkglist, Field::Filename) => set_once(&mut self.package.location, text),
            _ => {}
        }
    }
}

fn parse<R: BufRead>(mut reader: Reader<R>, repo_id: &str) -> Result<Vec<Update>> {
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
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.updates)
}

/// Advisories parsed from `updateinfo.xml`.
pub struct Updateinfo {
    info: MdInfo,
    updates: Vec<Update>,
    loaded: bool,
}

impl Updateinfo {
    pub fn new(info: MdInfo) -> Self {
        Self {
            info,
            updates: Vec::new(),
            loaded: false,
        }
    }

    /// Every advisory in document order.
    pub fn get_detail(&mut self, progress: &mut Progress<'_>) -> Result<Vec<Update>> {
        prepare(self, progress)?;
        let updates = self.updates.clone();
        progress.done()?;
        Ok(updates)
    }

    /// Advisories that ship the package `name;evr;arch;repo`.
    pub fn get_detail_for_package(
        &mut self,
        package_id: &str,
        progress: &mut Progress<'_>,
    ) -> Result<Vec<Update>> {
        PackageId::parse(package_id)?;
        prepare(self, progress)?;
        let updates = self
            .updates
            .iter()
            .filter(|update| {
                update
                    .packages
                    .iter()
                    .any(|package| package.package_id() == package_id)
            })
            .cloned()
            .collect();
        progress.done()?;
        Ok(updates)
    }
}

impl MetadataSource for Updateinfo {
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

        let repo_id = self.info.id.clone();
        self.updates = self.info.load_with(
            progress,
            |path| parse(xml::open(path)?, &repo_id).map_err(|err| err.at_path(path)),
            Vec::len,
        )?;
        self.loaded = true;
        Ok(())
    }
}
