//! Records produced by metadata sources.

use std::fmt;

use serde::Serialize;

use crate::error::{MdError, Result};

/// A package as described by a repository's primary index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub epoch: u32,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub repo_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub license: Option<String>,
    pub category: Option<String>,
    pub size: u64,
    pub pkgid: Option<String>,
    pub location: Option<String>,
    pub files: Vec<String>,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    pub obsoletes: Vec<String>,
}

impl Package {
    /// Epoch, version and release in `[epoch:]version-release` form.
    pub fn evr(&self) -> String {
        if self.epoch == 0 {
            format!("{}-{}", self.version, self.release)
        } else {
            format!("{}:{}-{}", self.epoch, self.version, self.release)
        }
    }

    /// Unique identifier `name;evr;arch;repo`.
    pub fn package_id(&self) -> String {
        format!("{};{};{};{}", self.name, self.evr(), self.arch, self.repo_id)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{}", self.name, self.evr(), self.arch)
    }
}

/// The four parts of a package identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageId<'a> {
    pub name: &'a str,
    pub evr: &'a str,
    pub arch: &'a str,
    pub data: &'a str,
}

impl<'a> PackageId<'a> {
    /// Splits `name;evr;arch;data`.
    pub fn parse(package_id: &'a str) -> Result<Self> {
        let mut parts = package_id.split(';');
        match (parts.next(), parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(evr), Some(arch), Some(data), None) if !name.is_empty() => {
                Ok(Self {
                    name,
                    evr,
                    arch,
                    data,
                })
            }
            _ => Err(MdError::Failed(format!("invalid package id: {package_id}"))),
        }
    }
}

/// One changelog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Changeset {
    /// Seconds since the epoch, 0 if unknown.
    pub date: u64,
    pub author: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

impl Changeset {
    /// Fills author and version from a changelog header line.
    ///
    /// `"Milan Crha <mcrha@redhat.com> - 2.29.91-1.fc13"` yields the author
    /// `"Milan Crha <mcrha@redhat.com>"` and version `"2.29.91-1.fc13"`. A
    /// header ending in `>` has no version.
    pub fn parse_header(&mut self, header: &str) -> Result<()> {
        if header.ends_with('>') {
            self.author = Some(header.to_string());
            self.version = None;
            return Ok(());
        }

        let space = header
            .rfind(' ')
            .ok_or_else(|| MdError::Failed(format!("format invalid: {header}")))?;

        let author = header[..space].trim_end_matches([' ', '-']);
        self.version = Some(header[space + 1..].to_string());
        self.author = Some(author.to_string());
        Ok(())
    }
}

/// Type of a package inside a comps group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageReqType {
    Mandatory,
    #[default]
    Default,
    Optional,
    Conditional,
}

impl PackageReqType {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("mandatory") => Self::Mandatory,
            Some("optional") => Self::Optional,
            Some("conditional") => Self::Conditional,
            _ => Self::Default,
        }
    }
}

/// A package listed in a comps group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPackage {
    pub name: String,
    pub kind: PackageReqType,
}

/// A comps group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub visible: bool,
    pub packages: Vec<GroupPackage>,
}

impl Group {
    pub fn package_names(&self) -> Vec<String> {
        self.packages.iter().map(|pkg| pkg.name.clone()).collect()
    }
}

/// A comps category, or a group projected into one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub groups: Vec<String>,
}

/// Kind of an advisory, from the `type` attribute of `<update>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Security,
    Bugfix,
    Enhancement,
    Newpackage,
    #[default]
    Unknown,
}

impl UpdateKind {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("security") => Self::Security,
            Some("bugfix") => Self::Bugfix,
            Some("enhancement") => Self::Enhancement,
            Some("newpackage") => Self::Newpackage,
            _ => Self::Unknown,
        }
    }
}

/// Release state of an advisory, from the `status` attribute of `<update>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    Stable,
    Testing,
    Unstable,
    #[default]
    Unknown,
}

impl UpdateState {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("stable" | "final") => Self::Stable,
            Some("testing") => Self::Testing,
            Some("unstable") => Self::Unstable,
            _ => Self::Unknown,
        }
    }
}

/// Tracker an advisory reference points into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Cve,
    Bugzilla,
    Vendor,
    #[default]
    Unknown,
}

impl ReferenceKind {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("cve") => Self::Cve,
            Some("bugzilla") => Self::Bugzilla,
            Some("vendor" | "self") => Self::Vendor,
            _ => Self::Unknown,
        }
    }
}

/// A bug, CVE or vendor notice cited by an advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReference {
    pub kind: ReferenceKind,
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// An advisory from `updateinfo.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Update {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: UpdateKind,
    pub state: UpdateState,
    /// Issue date as written in the document.
    pub issued: Option<String>,
    pub reboot_suggested: bool,
    pub references: Vec<UpdateReference>,
    pub packages: Vec<Package>,
}

/// Transfer protocol of a mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ftp,
    Http,
    Rsync,
    #[default]
    Unknown,
}

impl Protocol {
    pub fn from_attr(value: &str) -> Self {
        match value {
            "ftp" => Self::Ftp,
            "http" => Self::Http,
            "rsync" => Self::Rsync,
            _ => Self::Unknown,
        }
    }
}

/// A mirror advertised by a metalink or mirrorlist document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MirrorEntry {
    pub protocol: Protocol,
    pub uri: String,
    pub preference: u32,
}
