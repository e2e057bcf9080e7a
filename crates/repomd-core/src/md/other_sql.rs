//! Backend for the `other.sqlite` changelog store.

use diesel::SqliteConnection;
use repomd_db::{models::ChangelogRow, repository::ChangelogRepository, DbConnection};
use repomd_events::Progress;
use tracing::{debug, warn};

use crate::{
    error::{MdError, Result},
    source::{prepare, MdInfo, MetadataSource},
    types::Changeset,
};

/// Builds a changeset from one row, or `None` if its header is unusable.
fn changeset_from_row(row: ChangelogRow) -> Option<Changeset> {
    let date = match row.date.as_deref().map(str::parse::<u64>) {
        Some(Ok(date)) => date,
        Some(Err(err)) => {
            warn!("failed to parse date {:?}: {err}", row.date);
            0
        }
        None => 0,
    };

    let mut changeset = Changeset {
        date,
        description: row.changelog,
        ..Default::default()
    };

    let header = row.author.unwrap_or_default();
    if let Err(err) = changeset.parse_header(&header) {
        warn!("failed to parse changelog header: {err}");
        return None;
    }
    Some(changeset)
}

/// Changelog store opened from `other.sqlite`.
pub struct OtherSql {
    info: MdInfo,
    db: Option<DbConnection>,
}

impl OtherSql {
    pub fn new(info: MdInfo) -> Self {
        Self {
            info,
            db: None,
        }
    }

    fn conn(&mut self) -> Result<&mut SqliteConnection> {
        match self.db.as_mut() {
            Some(db) => Ok(db.conn()),
            None => Err(MdError::Failed(format!("{} store is not open", self.info.kind))),
        }
    }
}

impl MetadataSource for OtherSql {
    fn info(&self) -> &MdInfo {
        &self.info
    }

    fn is_loaded(&self) -> bool {
        self.db.is_some()
    }

    fn load(&mut self, progress: &mut Progress<'_>) -> Result<()> {
        if self.db.is_some() {
            return Ok(());
        }

        let db = self.info.load_with(
            progress,
            |path| Ok(DbConnection::open_metadata(path)?),
            |_| 0,
        )?;
        self.db = Some(db);
        Ok(())
    }

    /// Resolves `pkgid` to `pkgKey`s, then collects each key's entries, newest first.
    fn get_changelog(&mut self, pkgid: &str, progress: &mut Progress<'_>) -> Result<Vec<Changeset>> {
        prepare(self, progress)?;

        let conn = self.conn()?;
        let keys = ChangelogRepository::keys_for_pkgid(conn, pkgid)?;
        if keys.is_empty() {
            debug!("no changelog for {pkgid}");
        }

        let mut changesets = Vec::new();
        if !keys.is_empty() {
            let mut per_key = progress.child();
            per_key.set_number_steps(keys.len())?;

            for key in keys {
                per_key.check_cancelled()?;
                let rows = ChangelogRepository::entries_for_key(conn, key)?;
                if rows.is_empty() {
                    warn!("no changelog entries for pkgKey {key}");
                }
                changesets.extend(rows.into_iter().filter_map(changeset_from_row));
                per_key.done()?;
            }
        }

        progress.done()?;
        Ok(changesets)
    }
}
