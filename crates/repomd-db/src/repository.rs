//! Statements against the primary and changelog stores.

use diesel::{
    prelude::*,
    sql_types::{BigInt, Text},
};

use crate::{
    models::{ChangelogRow, PackageRow, PkgKeyRow},
    query::{ChunkedQuery, PACKAGE_COLUMNS},
};

/// Repository for the `packages` and `provides` tables of a primary store.
pub struct PrimaryRepository;

impl PrimaryRepository {
    /// Runs every batch of `query` inside one transaction, concatenating rows.
    pub fn search(
        conn: &mut SqliteConnection,
        query: &ChunkedQuery,
    ) -> QueryResult<Vec<PackageRow>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let mut rows = Vec::new();
            for statement in query.statements() {
                rows.extend(diesel::sql_query(statement).load::<PackageRow>(conn)?);
            }
            Ok(rows)
        })
    }

    /// Lists every package in the store.
    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<PackageRow>> {
        diesel::sql_query(PACKAGE_COLUMNS).load::<PackageRow>(conn)
    }

    /// Finds the package rows stored under an internal key.
    pub fn find_by_key(conn: &mut SqliteConnection, pkg_key: i64) -> QueryResult<Vec<PackageRow>> {
        diesel::sql_query(format!("{PACKAGE_COLUMNS} WHERE pkgKey = ?"))
            .bind::<BigInt, _>(pkg_key)
            .load::<PackageRow>(conn)
    }

    /// Finds packages by exact name and architecture.
    pub fn find_by_name_arch(
        conn: &mut SqliteConnection,
        name: &str,
        arch: &str,
    ) -> QueryResult<Vec<PackageRow>> {
        diesel::sql_query(format!("{PACKAGE_COLUMNS} WHERE name = ? AND arch = ?"))
            .bind::<Text, _>(name)
            .bind::<Text, _>(arch)
            .load::<PackageRow>(conn)
    }

    /// Keys of the packages that provide `capability`.
    pub fn keys_providing(conn: &mut SqliteConnection, capability: &str) -> QueryResult<Vec<i64>> {
        diesel::sql_query("SELECT pkgKey AS pkg_key FROM provides WHERE name = ?")
            .bind::<Text, _>(capability)
            .load::<PkgKeyRow>(conn)
            .map(|rows| rows.into_iter().map(|row| row.pkg_key).collect())
    }
}

/// Repository for the changelog store.
pub struct ChangelogRepository;

impl ChangelogRepository {
    /// Keys of the packages whose content hash is `pkgid`.
    pub fn keys_for_pkgid(conn: &mut SqliteConnection, pkgid: &str) -> QueryResult<Vec<i64>> {
        diesel::sql_query("SELECT pkgKey AS pkg_key FROM packages WHERE pkgId = ?")
            .bind::<Text, _>(pkgid)
            .load::<PkgKeyRow>(conn)
            .map(|rows| rows.into_iter().map(|row| row.pkg_key).collect())
    }

    /// Changelog entries of one package, newest first.
    pub fn entries_for_key(
        conn: &mut SqliteConnection,
        pkg_key: i64,
    ) -> QueryResult<Vec<ChangelogRow>> {
        diesel::sql_query(
            "SELECT author, date, changelog FROM changelog WHERE pkgKey = ? ORDER BY date DESC",
        )
        .bind::<BigInt, _>(pkg_key)
        .load::<ChangelogRow>(conn)
    }
}
