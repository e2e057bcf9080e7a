//! Backend for the `primary.sqlite` package store.

use diesel::SqliteConnection;
use repomd_db::{
    models::PackageRow,
    query::{ChunkedQuery, Predicate},
    repository::PrimaryRepository,
    DbConnection,
};
use repomd_events::Progress;
use tracing::{trace, warn};

use crate::{
    error::{MdError, Result},
    source::{prepare, MdInfo, MetadataSource},
    types::{Package, PackageId},
};

/// Converts a `packages` row into a record of `repo_id`.
pub(crate) fn package_from_row(row: PackageRow, repo_id: &str) -> Package {
    Package {
        name: row.name.unwrap_or_default(),
        epoch: row
            .epoch
            .as_deref()
            .and_then(|epoch| epoch.parse().ok())
            .unwrap_or_default(),
        version: row.version.unwrap_or_default(),
        release: row.release.unwrap_or_default(),
        arch: row.arch.unwrap_or_default(),
        repo_id: repo_id.to_string(),
        summary: row.summary,
        description: row.description,
        url: row.url,
        license: row.license,
        category: row.category,
        size: row.size.and_then(|size| u64::try_from(size).ok()).unwrap_or_default(),
        pkgid: row.pkg_id,
        location: row.location,
        ..Default::default()
    }
}

/// Package store opened from `primary.sqlite`.
pub struct PrimarySql {
    info: MdInfo,
    db: Option<DbConnection>,
}

impl PrimarySql {
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

    fn search(
        &mut self,
        predicate: Predicate,
        terms: &[String],
        progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        prepare(self, progress)?;

        let query = ChunkedQuery::new(predicate, terms);
        trace!("{}", query.to_script());
        let rows = PrimaryRepository::search(self.conn()?, &query)?;

        let repo_id = &self.info.id;
        let packages = rows
            .into_iter()
            .map(|row| package_from_row(row, repo_id))
            .collect();
        progress.done()?;
        Ok(packages)
    }
}

impl MetadataSource for PrimarySql {
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

    fn resolve(&mut self, names: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.search(Predicate::Name, names, progress)
    }

    fn search_name(&mut self, terms: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.search(Predicate::NameLike, terms, progress)
    }

    fn search_details(
        &mut self,
        terms: &[String],
        progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        self.search(Predicate::Details, terms, progress)
    }

    fn search_group(&mut self, groups: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.search(Predicate::Group, groups, progress)
    }

    fn search_pkgid(&mut self, pkgids: &[String], progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        self.search(Predicate::PkgId, pkgids, progress)
    }

    /// Resolves capabilities to `pkgKey`s, then each key to its package.
    fn what_provides(
        &mut self,
        capabilities: &[String],
        progress: &mut Progress<'_>,
    ) -> Result<Vec<Package>> {
        prepare(self, progress)?;

        let repo_id = self.info.id.clone();
        let conn = self.conn()?;
        let mut packages = Vec::new();

        if !capabilities.is_empty() {
            let mut overall = progress.child();
            overall.set_number_steps(capabilities.len())?;

            for capability in capabilities {
                let keys = PrimaryRepository::keys_providing(conn, capability)?;
                {
                    let mut per_key = overall.child();
                    if !keys.is_empty() {
                        per_key.set_number_steps(keys.len())?;
                    }

                    for key in keys {
                        per_key.check_cancelled()?;
                        let mut rows = PrimaryRepository::find_by_key(conn, key)?;
                        if rows.len() > 1 {
                            warn!("{} packages share pkgKey {key}, using the first", rows.len());
                        }
                        if rows.is_empty() {
                            warn!("no package for pkgKey {key} providing {capability}");
                        } else {
                            packages.push(package_from_row(rows.swap_remove(0), &repo_id));
                        }
                        per_key.done()?;
                    }
                }
                overall.done()?;
            }
        }

        progress.done()?;
        Ok(packages)
    }

    fn get_packages(&mut self, progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        prepare(self, progress)?;
        let rows = PrimaryRepository::list_all(self.conn()?)?;
        let repo_id = &self.info.id;
        let packages = rows
            .into_iter()
            .map(|row| package_from_row(row, repo_id))
            .collect();
        progress.done()?;
        Ok(packages)
    }

    fn find_package(&mut self, package_id: &str, progress: &mut Progress<'_>) -> Result<Vec<Package>> {
        let id = PackageId::parse(package_id)?;
        prepare(self, progress)?;

        let rows = PrimaryRepository::find_by_name_arch(self.conn()?, id.name, id.arch)?;
        let repo_id = &self.info.id;
        let packages = rows
            .into_iter()
            .map(|row| package_from_row(row, repo_id))
            .filter(|package| package.evr() == id.evr)
            .collect();
        progress.done()?;
        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use repomd_config::source::MdKind;

    use super::*;
    use crate::md::test_utils::{info, sql_fixture, terms, write_fixture, PRIMARY_SQL, ZSH_PKGID};

    fn source() -> (tempfile::TempDir, PrimarySql) {
        let (dir, path) = sql_fixture("primary.sqlite", PRIMARY_SQL);
        (dir, PrimarySql::new(info(MdKind::PrimaryDb, &path)))
    }

    fn names(packages: &[Package]) -> Vec<&str> {
        packages.iter().map(|package| package.name.as_str()).collect()
    }

    #[test]
    fn test_resolve() {
        let (_dir, mut md) = source();
        let packages = md
            .resolve(&terms(&["gnome-power-manager"]), &mut Progress::detached())
            .unwrap();
        assert_eq!(packages.len(), 1);
        let package = &packages[0];
        assert_eq!(package.summary.as_deref(), Some("GNOME power management service"));
        assert_eq!(package.size, 2_471_824);
        assert_eq!(package.repo_id, "fedora");
        assert_eq!(
            package.package_id(),
            "gnome-power-manager;2.29.91-1.fc13;i686;fedora"
        );
    }

    #[test]
    fn test_resolve_many_terms() {
        let (_dir, mut md) = source();
        let mut search: Vec<String> = (0..25).map(|i| format!("missing-{i}")).collect();
        search.push("zsh".to_string());

        let packages = md.resolve(&search, &mut Progress::detached()).unwrap();
        assert_eq!(names(&packages), vec!["zsh", "zsh"]);
    }

    #[test]
    fn test_searches() {
        let (_dir, mut md) = source();
        assert_eq!(
            names(&md.search_name(&terms(&["gnome"]), &mut Progress::detached()).unwrap()),
            vec!["gnome-power-manager", "gnome-packagekit"]
        );
        assert_eq!(
            names(&md.search_details(&terms(&["manage"]), &mut Progress::detached()).unwrap()),
            vec!["gnome-power-manager", "gnome-packagekit"]
        );
        assert_eq!(
            md.search_group(&terms(&["System Environment/Shells"]), &mut Progress::detached())
                .unwrap()
                .len(),
            2
        );

        let packages = md
            .search_pkgid(&terms(&[ZSH_PKGID]), &mut Progress::detached())
            .unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].epoch, 1);
        assert_eq!(packages[0].size, 0);
    }

    #[test]
    fn test_quote_in_term() {
        let (_dir, mut md) = source();
        let packages = md
            .search_name(&terms(&["o'reilly"]), &mut Progress::detached())
            .unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_what_provides_skips_missing_keys() {
        let (_dir, mut md) = source();
        let packages = md
            .what_provides(
                &terms(&["/bin/zsh", "gnome-power-manager", "nothing"]),
                &mut Progress::detached(),
            )
            .unwrap();
        assert_eq!(names(&packages), vec!["zsh", "gnome-power-manager"]);
        assert_eq!(packages[0].pkgid.as_deref(), Some(ZSH_PKGID));
    }

    #[test]
    fn test_what_provides_without_provides_table() {
        let (_dir, path) = sql_fixture(
            "primary.sqlite",
            "CREATE TABLE packages (pkgKey INTEGER PRIMARY KEY, pkgId TEXT, name TEXT);",
        );
        let mut md = PrimarySql::new(info(MdKind::PrimaryDb, &path));
        let err = md
            .what_provides(&terms(&["/bin/zsh"]), &mut Progress::detached())
            .unwrap_err();
        assert!(matches!(err, MdError::BadSql(ref msg) if msg.contains("provides")));
    }

    #[test]
    fn test_what_provides_shared_key_uses_first_row() {
        let (_dir, path) = sql_fixture(
            "primary.sqlite",
            "
CREATE TABLE packages (pkgKey INTEGER, pkgId TEXT, name TEXT, arch TEXT,
    version TEXT, epoch TEXT, release TEXT, summary TEXT, description TEXT, url TEXT,
    rpm_license TEXT, rpm_group TEXT, size_package INTEGER, location_href TEXT);
CREATE TABLE provides (name TEXT, flags TEXT, epoch TEXT, version TEXT, release TEXT,
    pkgKey INTEGER);
INSERT INTO packages VALUES (5, 'first', 'zsh', 'i686', '4.3.10', '1', '7.fc13',
    NULL, NULL, NULL, NULL, NULL, NULL, NULL);
INSERT INTO packages VALUES (5, 'second', 'zsh-html', 'noarch', '4.3.10', '1', '7.fc13',
    NULL, NULL, NULL, NULL, NULL, NULL, NULL);
INSERT INTO provides VALUES ('/bin/zsh', NULL, NULL, NULL, NULL, 5);
",
        );
        let mut md = PrimarySql::new(info(MdKind::PrimaryDb, &path));
        let mut progress = Progress::detached();
        let packages = md.what_provides(&terms(&["/bin/zsh"]), &mut progress).unwrap();

        assert_eq!(names(&packages), vec!["zsh"]);
        assert_eq!(packages[0].pkgid.as_deref(), Some("first"));
        assert!(progress.is_complete());
    }

    #[test]
    fn test_what_provides_cancelled() {
        let (_dir, mut md) = source();
        md.load(&mut Progress::detached()).unwrap();

        let mut progress = Progress::detached();
        progress.cancellable().cancel();
        let err = md
            .what_provides(&terms(&["/bin/zsh"]), &mut progress)
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_find_package_matches_evr() {
        let (_dir, mut md) = source();
        let packages = md
            .find_package("zsh;1:4.3.9-1.fc13;i686;fedora", &mut Progress::detached())
            .unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].pkgid.as_deref(), Some("cafe"));

        assert!(md
            .find_package("zsh;4.3.9-1.fc13;x86_64;fedora", &mut Progress::detached())
            .unwrap()
            .is_empty());
        assert!(md.find_package("zsh", &mut Progress::detached()).is_err());
    }

    #[test]
    fn test_get_packages() {
        let (_dir, mut md) = source();
        assert_eq!(md.get_packages(&mut Progress::detached()).unwrap().len(), 4);
    }

    #[test]
    fn test_load_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut md = PrimarySql::new(info(MdKind::PrimaryDb, &dir.path().join("primary.sqlite")));
        let err = md.get_packages(&mut Progress::detached()).unwrap_err();
        match err {
            MdError::FailedToLoad {
                source, ..
            } => assert!(matches!(*source, MdError::BadSql(ref msg) if msg.starts_with("can't open database"))),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!md.is_loaded());
    }

    #[test]
    fn test_bad_schema() {
        let (_dir, path) = write_fixture("primary.sqlite", "");
        let mut md = PrimarySql::new(info(MdKind::PrimaryDb, &path));
        let err = md
            .resolve(&terms(&["zsh"]), &mut Progress::detached())
            .unwrap_err();
        assert!(matches!(err, MdError::BadSql(_)));
    }
}
