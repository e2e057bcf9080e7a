use diesel::{
    sql_types::{BigInt, Nullable, Text},
    QueryableByName,
};

/// One row of the `packages` table, selected through [`crate::query::PACKAGE_COLUMNS`].
#[derive(Debug, Clone, QueryableByName)]
pub struct PackageRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub pkg_id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub arch: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub version: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub epoch: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub release: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub summary: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub description: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub url: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub license: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub category: Option<String>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub size: Option<i64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub location: Option<String>,
}

/// Helper struct for the first phase of indirect lookups.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct PkgKeyRow {
    #[diesel(sql_type = BigInt)]
    pub pkg_key: i64,
}

/// One row of the `changelog` table.
///
/// `date` is read as text so that a malformed value can be reported per row
/// instead of failing the whole statement.
#[derive(Debug, Clone, QueryableByName)]
pub struct ChangelogRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub author: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub date: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub changelog: Option<String>,
}
