//! The contract shared by every metadata backend.

use std::path::{Path, PathBuf};

use repomd_config::{config::Config, source::MdKind, source::SourceConfig};
use repomd_events::{ChecksumStage, Progress, RepoEvent};
use repomd_utils::{
    fs::safe_remove_file,
    hash::{calculate_checksum, HashAlgorithm},
};
use tracing::{debug, trace, warn};

use crate::{
    error::{MdError, Result},
    md::{
        comps::Comps, filelists_xml::FilelistsXml, metalink::Metalink, mirrorlist::Mirrorlist,
        other_sql::OtherSql, primary_sql::PrimarySql, primary_xml::PrimaryXml,
        updateinfo::Updateinfo,
    },
    types::{Changeset, Package},
};

/// Describes one metadata file handed over by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdInfo {
    /// Repository id the file belongs to.
    pub id: String,
    pub kind: MdKind,
    /// Decompressed file on disk.
    pub filename: Option<PathBuf>,
    /// Expected checksum of `filename`.
    pub checksum: Option<String>,
    pub checksum_type: HashAlgorithm,
    pub timestamp: Option<i64>,
    /// Location relative to the repository base.
    pub location: Option<String>,
}

impl MdInfo {
    pub fn new(id: impl Into<String>, kind: MdKind) -> Self {
        Self {
            id: id.into(),
            kind,
            filename: None,
            checksum: None,
            checksum_type: HashAlgorithm::default(),
            timestamp: None,
            location: kind.default_location().map(String::from),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>, algo: HashAlgorithm) -> Self {
        self.checksum = Some(checksum.into());
        self.checksum_type = algo;
        self
    }

    /// Builds the description of a configured source.
    pub fn from_config(source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            id: source.repo.clone(),
            kind: source.kind,
            filename: Some(source.resolved_path()?),
            checksum: source.checksum.clone(),
            checksum_type: source.hash_algorithm()?,
            timestamp: source.timestamp,
            location: source.location().map(String::from),
        })
    }

    pub fn filename(&self) -> Result<&Path> {
        self.filename.as_deref().ok_or_else(|| {
            MdError::Failed(format!("failed to get filename for {}", self.kind))
        })
    }

    /// Compares the file on disk with the expected checksum.
    ///
    /// Mirror documents and files without an expected checksum are accepted
    /// as they are.
    pub fn verify(&self, progress: &Progress<'_>) -> Result<()> {
        let filename = self.filename()?;
        let expected = match self.checksum.as_deref() {
            Some(expected) if self.kind.is_checksummed() => expected,
            _ => {
                trace!("not verifying {} for {}", self.kind, self.id);
                self.emit_checksum(progress, ChecksumStage::Skipped);
                return Ok(());
            }
        };

        self.emit_checksum(progress, ChecksumStage::Verifying);
        let actual = calculate_checksum(filename, self.checksum_type)?;
        if !actual.eq_ignore_ascii_case(expected) {
            self.emit_checksum(
                progress,
                ChecksumStage::Failed {
                    expected: expected.to_string(),
                    actual: actual.clone(),
                },
            );
            return Err(MdError::ChecksumMismatch {
                path: filename.display().to_string(),
                expected: expected.to_string(),
                actual,
            });
        }

        self.emit_checksum(progress, ChecksumStage::Passed);
        Ok(())
    }

    /// Removes the backing file.
    pub fn clean(&self) -> Result<()> {
        let filename = self.filename()?;
        if !safe_remove_file(filename)? {
            debug!("{} already removed", filename.display());
        }
        Ok(())
    }

    /// Verifies the backing file, then hands it to `parse`.
    ///
    /// Any failure is reported as [`MdError::FailedToLoad`].
    pub(crate) fn load_with<T, F>(
        &self,
        progress: &mut Progress<'_>,
        parse: F,
        records: fn(&T) -> usize,
    ) -> Result<T>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        self.load_steps(progress, parse, records)
            .map_err(|err| self.load_failed(err))
    }

    fn load_steps<T, F>(
        &self,
        progress: &mut Progress<'_>,
        parse: F,
        records: fn(&T) -> usize,
    ) -> Result<T>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        let filename = self.filename()?;
        debug!("loading {} for {} from {}", self.kind, self.id, filename.display());

        progress.set_number_steps(2)?;
        progress.emit(RepoEvent::Loading {
            op_id: progress.op_id(),
            md_id: self.id.clone(),
            kind: self.kind.to_string(),
        });

        self.verify(progress)?;
        progress.done()?;

        let value = parse(filename)?;
        progress.done()?;

        let records = records(&value);
        progress.emit(RepoEvent::Loaded {
            op_id: progress.op_id(),
            md_id: self.id.clone(),
            kind: self.kind.to_string(),
            records,
        });
        debug!("loaded {records} records of {} for {}", self.kind, self.id);
        Ok(value)
    }

    fn load_failed(&self, err: MdError) -> MdError {
        match err {
            MdError::FailedToLoad {
                ..
            } => err,
            err => {
                MdError::FailedToLoad {
                    id: self.id.clone(),
                    kind: self.kind,
                    source: Box::new(err),
                }
            }
        }
    }

    fn emit_checksum(&self, progress: &Progress<'_>, stage: ChecksumStage) {
        progress.emit(RepoEvent::Checksum {
            op_id: progress.op_id(),
            md_id: self.id.clone(),
            stage,
        });
    }
}

/// A queryable view over one metadata file.
///
/// Every query loads the source first if needed. Operations a backend cannot
/// answer return [`MdError::NoSupport`].
pub trait MetadataSource {
    fn info(&self) -> &MdInfo;

    fn is_loaded(&self) -> bool;

    /// Parses or opens the backing file. Calling it again is a no-op.
    fn load(&mut self, progress: &mut Progress<'_>) -> Result<()>;

    fn unload(&mut self, _progress: &mut Progress<'_>) -> Result<()> {
        Err(MdError::no_support("unload", self.info().kind))
    }

    /// Deletes the backing file.
    fn clean(&self) -> Result<()> {
        self.info().clean()
    }

    fn resolve(&mut self, _names: &[String], _progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        Err(MdError::no_support("resolve", self.info().kind))
    }

    fn search_name(
        &mut self,
        _terms: &[String],
        _progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        Err(MdError::no_support("search_name", self.info().kind))
    }

    fn search_details(
        &mut self,
        _terms: &[String],
        _progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        Err(MdError::no_support("search_details", self.info().kind))
    }

    fn search_group(
        &mut self,
        _groups: &[String],
        _progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        Err(MdError::no_support("search_group", self.info().kind))
    }

    fn search_pkgid(
        &mut self,
        _pkgids: &[String],
        _progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        Err(MdError::no_support("search_pkgid", self.info().kind))
    }

    /// Returns the pkgids of the packages owning `paths`.
    fn search_file(&mut self, _paths: &[String], _progress: &mut Progress<'_>) -> Result<Vec<String>> {
        Err(MdError::no_support("search_file", self.info().kind))
    }

    fn what_provides(
        &mut self,
        _capabilities: &[String],
        _progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        Err(MdError::no_support("what_provides", self.info().kind))
    }

    fn get_packages(&mut self, _progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        Err(MdError::no_support("get_packages", self.info().kind))
    }

    fn find_package(
        &mut self,
        _package_id: &str,
        _progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        Err(MdError::no_support("find_package", self.info().kind))
    }

    fn get_changelog(&mut self, _pkgid: &str, _progress: &mut Progress<'_>) -> Result<Vec<Changeset>> {
        Err(MdError::no_support("get_changelog", self.info().kind))
    }

    fn get_files(&mut self, _package: &Package, _progress: &mut Progress<'_>) -> Result<Vec<String>> {
        Err(MdError::no_support("get_files", self.info().kind))
    }
}

/// Loads `source` if needed and leaves `progress` with one step for the query.
pub(crate) fn prepare<S>(source: &mut S, progress: &mut Progress<'_>) -> Result<()>
where
    S: MetadataSource + ?Sized,
{
    if source.is_loaded() {
        progress.set_number_steps(1)?;
        return Ok(());
    }

    progress.set_number_steps(2)?;
    source.load(&mut progress.child())?;
    progress.done()?;
    Ok(())
}

/// Opens the backend matching `info.kind`.
pub fn open_source(info: MdInfo, config: &Config) -> Result<Box<dyn MetadataSource>> {
    let source: Box<dyn MetadataSource> = match info.kind {
        MdKind::PrimaryXml => Box::new(PrimaryXml::new(info)),
        MdKind::PrimaryDb => Box::new(PrimarySql::new(info)),
        MdKind::FilelistsXml => Box::new(FilelistsXml::new(info)),
        MdKind::OtherDb => Box::new(OtherSql::new(info)),
        MdKind::Comps => Box::new(Comps::new(info, config.icon_dir()?)),
        MdKind::Metalink => Box::new(Metalink::new(info)),
        MdKind::Mirrorlist => Box::new(Mirrorlist::new(info)),
        MdKind::Updateinfo => Box::new(Updateinfo::new(info)),
        kind => {
            warn!("no backend for {kind} metadata of {}", info.id);
            return Err(MdError::no_support("open", kind));
        }
    };
    Ok(source)
}
