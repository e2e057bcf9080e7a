use std::{fmt, path::PathBuf};

use repomd_utils::{hash::HashAlgorithm, path::resolve_path};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kinds of metadata a repository publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MdKind {
    #[serde(rename = "primary")]
    PrimaryXml,
    #[serde(rename = "primary_db")]
    PrimaryDb,
    #[serde(rename = "filelists")]
    FilelistsXml,
    #[serde(rename = "filelists_db")]
    FilelistsDb,
    #[serde(rename = "other")]
    OtherXml,
    #[serde(rename = "other_db")]
    OtherDb,
    #[serde(rename = "group")]
    Comps,
    #[serde(rename = "group_gz")]
    CompsGz,
    #[serde(rename = "metalink")]
    Metalink,
    #[serde(rename = "mirrorlist")]
    Mirrorlist,
    #[serde(rename = "prestodelta")]
    Prestodelta,
    #[serde(rename = "updateinfo")]
    Updateinfo,
    #[serde(rename = "unknown")]
    Unknown,
}

impl MdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MdKind::PrimaryXml => "primary",
            MdKind::PrimaryDb => "primary_db",
            MdKind::FilelistsXml => "filelists",
            MdKind::FilelistsDb => "filelists_db",
            MdKind::OtherXml => "other",
            MdKind::OtherDb => "other_db",
            MdKind::Comps => "group",
            MdKind::CompsGz => "group_gz",
            MdKind::Metalink => "metalink",
            MdKind::Mirrorlist => "mirrorlist",
            MdKind::Prestodelta => "prestodelta",
            MdKind::Updateinfo => "updateinfo",
            MdKind::Unknown => "unknown",
        }
    }

    pub fn from_text(text: &str) -> Self {
        match text {
            "primary" => MdKind::PrimaryXml,
            "primary_db" => MdKind::PrimaryDb,
            "filelists" => MdKind::FilelistsXml,
            "filelists_db" => MdKind::FilelistsDb,
            "other" => MdKind::OtherXml,
            "other_db" => MdKind::OtherDb,
            "group" => MdKind::Comps,
            "group_gz" => MdKind::CompsGz,
            "metalink" => MdKind::Metalink,
            "mirrorlist" => MdKind::Mirrorlist,
            "prestodelta" => MdKind::Prestodelta,
            "updateinfo" => MdKind::Updateinfo,
            _ => MdKind::Unknown,
        }
    }

    /// Mirror documents are not listed in `repomd.xml`, so they have fixed names.
    pub fn default_location(&self) -> Option<&'static str> {
        match self {
            MdKind::Metalink => Some("metalink.xml"),
            MdKind::Mirrorlist => Some("mirrorlist.txt"),
            _ => None,
        }
    }

    /// Mirror documents carry no checksum in the repository index.
    pub fn is_checksummed(&self) -> bool {
        !matches!(self, MdKind::Metalink | MdKind::Mirrorlist)
    }
}

impl fmt::Display for MdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metadata file of a repository, already fetched and decompressed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Repository id, e.g. "fedora".
    pub repo: String,

    /// Metadata kind of the file.
    pub kind: MdKind,

    /// Local path of the decompressed file. `~` and environment variables are expanded.
    pub path: String,

    /// Expected checksum of the file.
    pub checksum: Option<String>,

    /// Algorithm of `checksum`.
    /// Default: sha256
    pub checksum_type: Option<String>,

    /// Timestamp recorded in the repository index.
    pub timestamp: Option<i64>,

    /// Location of the file relative to the repository base.
    pub location: Option<String>,
}

impl SourceConfig {
    pub fn resolved_path(&self) -> Result<PathBuf> {
        Ok(resolve_path(&self.path)?)
    }

    pub fn hash_algorithm(&self) -> Result<HashAlgorithm> {
        match self.checksum_type.as_deref() {
            Some(name) => Ok(name.parse()?),
            None => Ok(HashAlgorithm::default()),
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .or_else(|| self.kind.default_location())
    }
}
