//! Backend for the comps group and category document.

use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use repomd_events::Progress;
use tracing::{debug, trace};

use crate::{
    error::{MdError, Result},
    md::xml,
    source::{prepare, MdInfo, MetadataSource},
    types::{Category, Group, GroupPackage, Package, PackageReqType},
};

const MISSING_ICON: &str = "image-missing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Unknown,
    Group,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Unknown,
    Id,
    Name,
    Description,
    Visible,
    Package(PackageReqType),
    GroupId,
}

#[derive(Debug, Default)]
struct Document {
    groups: Vec<Group>,
    categories: Vec<Category>,
}

impl Document {
    fn records(&self) -> usize {
        self.groups.len() + self.categories.len()
    }
}

struct Parser {
    section: Section,
    field: Field,
    group: Group,
    category: Category,
    document: Document,
}

fn parse_visible(text: &str) -> bool {
    match text {
        "true" => true,
        "false" => false,
        other => other.parse::<u32>().is_ok_and(|value| value != 0),
    }
}

fn set_once(slot: &mut Option<String>, text: String) {
    if slot.is_none() {
        *slot = Some(text);
    }
}

impl Parser {
    fn start(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let name = element.name();
        let name = name.as_ref();

        self.field = match (self.section, name) {
            (Section::Unknown, b"group") => {
                self.section = Section::Group;
                self.group = Group::default();
                Field::Unknown
            }
            (Section::Unknown, b"category") => {
                self.section = Section::Category;
                self.category = Category::default();
                Field::Unknown
            }
            (Section::Group | Section::Category, b"id") => Field::Id,
            (Section::Group | Section::Category, b"name") => Field::Name,
            (Section::Group | Section::Category, b"description") => Field::Description,
            (Section::Group, b"uservisible") => Field::Visible,
            (Section::Group, b"packagereq") => {
                let kind = xml::attribute(element, b"type")?;
                Field::Package(PackageReqType::from_attr(kind.as_deref()))
            }
            (Section::Category, b"groupid") => Field::GroupId,
            _ => Field::Unknown,
        };
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match (self.section, name) {
            (Section::Group, b"group") => {
                let group = std::mem::take(&mut self.group);
                trace!("added group {} with {} packages", group.id, group.packages.len());
                self.document.groups.push(group);
                self.section = Section::Unknown;
            }
            (Section::Category, b"category") => {
                let category = std::mem::take(&mut self.category);
                trace!("added category {} with {} groups", category.id, category.groups.len());
                self.document.categories.push(category);
                self.section = Section::Unknown;
            }
            _ => {}
        }
        self.field = Field::Unknown;
    }

    fn text(&mut self, text: String) {
        match (self.section, self.field) {
            (Section::Group, Field::Id) => self.group.id = text,
            (Section::Group, Field::Name) => set_once(&mut self.group.name, text),
            (Section::Group, Field::Description) => set_once(&mut self.group.description, text),
            (Section::Group, Field::Visible) => self.group.visible = parse_visible(&text),
            (Section::Group, Field::Package(kind)) => {
                self.group.packages.push(GroupPackage {
                    name: text,
                    kind,
                })
            }
            (Section::Category, Field::Id) => self.category.id = text,
            (Section::Category, Field::Name) => set_once(&mut self.category.name, text),
            (Section::Category, Field::Description) => {
                set_once(&mut self.category.description, text)
            }
            (Section::Category, Field::GroupId) => self.category.groups.push(text),
            _ => {}
        }
    }
}

fn parse<R: BufRead>(mut reader: Reader<R>) -> Result<Document> {
    let mut parser = Parser {
        section: Section::Unknown,
        field: Field::Unknown,
        group: Group::default(),
        category: Category::default(),
        document: Document::default(),
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

    Ok(parser.document)
}

/// Groups and categories parsed from `comps.xml`.
pub struct Comps {
    info: MdInfo,
    icon_dir: PathBuf,
    document: Document,
    loaded: bool,
}

impl Comps {
    pub fn new(info: MdInfo, icon_dir: impl Into<PathBuf>) -> Self {
        Self {
            info,
            icon_dir: icon_dir.into(),
            document: Document::default(),
            loaded: false,
        }
    }

    pub fn icon_dir(&self) -> &Path {
        &self.icon_dir
    }

    /// Picks the first existing icon of the record itself or its parent.
    fn icon_for(&self, id: &str, parent_id: Option<&str>) -> String {
        std::iter::once(id)
            .chain(parent_id)
            .find(|name| self.icon_dir.join(format!("{name}.png")).exists())
            .unwrap_or(MISSING_ICON)
            .to_string()
    }

    /// All categories, with icons resolved.
    pub fn get_categories(&mut self, progress: &mut Progress<'_>) -> Result<Vec<Category>> {
        prepare(self, progress)?;
        let categories = self
            .document
            .categories
            .iter()
            .map(|category| {
                Category {
                    icon: Some(self.icon_for(&category.id, None)),
                    ..category.clone()
                }
            })
            .collect();
        progress.done()?;
        Ok(categories)
    }

    /// Projects a group into a category record under `parent_id`.
    fn category_for_group(&self, group_id: &str, parent_id: &str) -> Option<Category> {
        let group = self.document.groups.iter().find(|group| group.id == group_id)?;
        Some(Category {
            id: group.id.clone(),
            parent_id: Some(parent_id.to_string()),
            name: group.name.clone(),
            description: group.description.clone(),
            icon: Some(self.icon_for(&group.id, Some(parent_id))),
            groups: Vec::new(),
        })
    }

    /// The groups listed by `category_id`, as category records.
    ///
    /// Listed ids without a matching group are skipped.
    pub fn get_groups_for_category(
        &mut self,
        category_id: &str,
        progress: &mut Progress<'_>,
    ) -> Result<Vec<Category>> {
        prepare(self, progress)?;

        let category = self
            .document
            .categories
            .iter()
            .find(|category| category.id == category_id)
            .ok_or_else(|| MdError::Failed(format!("could not find category: {category_id}")))?;

        let groups = category
            .groups
            .iter()
            .filter_map(|group_id| {
                let found = self.category_for_group(group_id, category_id);
                if found.is_none() {
                    debug!("category {category_id} lists unknown group {group_id}");
                }
                found
            })
            .collect();

        progress.done()?;
        Ok(groups)
    }

    /// Member package names of `group_id`.
    pub fn get_packages_for_group(
        &mut self,
        group_id: &str,
        progress: &mut Progress<'_>,
    ) -> Result<Vec<String>> {
        prepare(self, progress)?;
        let group = self
            .find_group(group_id)
            .ok_or_else(|| MdError::Failed(format!("could not find group: {group_id}")))?;
        let names = group.package_names();
        progress.done()?;
        Ok(names)
    }

    pub fn get_groups(&mut self, progress: &mut Progress<'_>) -> Result<Vec<Group>> {
        prepare(self, progress)?;
        let groups = self.document.groups.clone();
        progress.done()?;
        Ok(groups)
    }

    fn find_group(&self, group_id: &str) -> Option<&Group> {
        self.document.groups.iter().find(|group| group.id == group_id)
    }
}

impl MetadataSource for Comps {
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

        self.document = self.info.load_with(
            progress,
            |path| parse(xml::open(path)?).map_err(|err| err.at_path(path)),
            Document::records,
        )?;
        self.loaded = true;
        Ok(())
    }

    /// Member packages of the groups whose id matches exactly.
    fn search_group(&mut self, groups: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        prepare(self, progress)?;
        let packages = self
            .document
            .groups
            .iter()
            .filter(|group| groups.contains(&group.id))
            .flat_map(|group| {
                group.packages.iter().map(|member| {
                    Package {
                        name: member.name.clone(),
                        repo_id: self.info.id.clone(),
                        category: Some(group.id.clone()),
                        ..Default::default()
                    }
                })
            })
            .collect();
        progress.done()?;
        Ok(packages)
    }
}
