//! Chunked predicate statements over the `packages` table.
//!
//! Searching for many terms at once would produce a single statement with an
//! unbounded number of predicates. Terms are instead split into batches of
//! [`BATCH_SIZE`], and each batch becomes one `SELECT … WHERE p(t1) OR p(t2) …`
//! statement. The batches are run together inside one transaction.

use std::borrow::Cow;

/// Maximum number of terms folded into one statement.
pub const BATCH_SIZE: usize = 20;

/// Marker replaced by each search term inside a predicate template.
pub const PLACEHOLDER: &str = "###";

/// Column list shared by every package query, aliased to [`crate::models::PackageRow`] fields.
pub const PACKAGE_COLUMNS: &str = "SELECT pkgId AS pkg_id, name, arch, version, epoch, release, \
     summary, description, url, rpm_license AS license, rpm_group AS category, \
     size_package AS size, location_href AS location FROM packages";

/// Predicate templates used by the package searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Name,
    NameLike,
    Details,
    Group,
    PkgId,
}

impl Predicate {
    pub fn template(&self) -> &'static str {
        match self {
            Predicate::Name => "name = '###'",
            Predicate::NameLike => "name LIKE '%###%'",
            Predicate::Details => {
                "name LIKE '%###%' OR summary LIKE '%###%' OR description LIKE '%###%'"
            }
            Predicate::Group => "rpm_group = '###'",
            Predicate::PkgId => "pkgId = '###'",
        }
    }
}

/// Doubles single quotes so a term can sit inside a SQL string literal.
pub fn escape_literal(term: &str) -> Cow<'_, str> {
    if term.contains('\'') {
        Cow::Owned(term.replace('\'', "''"))
    } else {
        Cow::Borrowed(term)
    }
}

/// A list of batched statements built from one predicate and many terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedQuery {
    statements: Vec<String>,
}

impl ChunkedQuery {
    /// Builds package statements for `terms` with [`BATCH_SIZE`] terms each.
    pub fn new<S: AsRef<str>>(predicate: Predicate, terms: &[S]) -> Self {
        Self::with_header(PACKAGE_COLUMNS, predicate.template(), terms, BATCH_SIZE)
    }

    /// Builds statements from an arbitrary `header` and predicate template.
    pub fn with_header<S: AsRef<str>>(
        header: &str,
        template: &str,
        terms: &[S],
        batch_size: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        let statements = terms
            .chunks(batch_size)
            .map(|batch| {
                let mut statement = format!("{header} WHERE ");
                for term in batch {
                    statement.push_str(&template.replace(PLACEHOLDER, &escape_literal(term.as_ref())));
                    statement.push_str(" OR ");
                }
                // the last predicate of a batch carries no joiner
                statement.truncate(statement.len() - " OR ".len());
                statement
            })
            .collect();

        Self {
            statements,
        }
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Renders every batch as one `BEGIN; … END;` script.
    pub fn to_script(&self) -> String {
        let mut script = String::from("BEGIN;\n");
        for statement in &self.statements {
            script.push_str(statement);
            script.push_str(";\n");
        }
        script.push_str("END;");
        script
    }
}
