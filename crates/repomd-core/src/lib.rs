//! Metadata sources for a single package repository.
//!
//! Each source wraps one local metadata file (an XML document or an SQLite
//! store) and answers package, file, changelog and group queries against it,
//! reporting progress through [`repomd_events::Progress`].

pub mod error;
pub mod md;
pub mod source;
pub mod types;

pub use error::{ErrorContext, MdError, Result};
pub use md::{
    comps::Comps, filelists_xml::FilelistsXml, metalink::Metalink, mirrorlist::Mirrorlist,
    other_sql::OtherSql, primary_sql::PrimarySql, primary_xml::PrimaryXml,
    updateinfo::Updateinfo,
};
pub use source::{open_source, MdInfo, MetadataSource};
pub use types::{
    Category, Changeset, Group, GroupPackage, MirrorEntry, Package, PackageId, PackageReqType,
    Protocol, ReferenceKind, Update, UpdateKind, UpdateReference, UpdateState,
};
