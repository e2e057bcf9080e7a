//! Connection handling for repository metadata stores.
//!
//! Stores are generated by the repository publisher, so no migrations are
//! run; the connection is only tuned for fast reads.

use std::path::Path;

use diesel::{sql_query, Connection, ConnectionError, RunQueryDsl, SqliteConnection};
use tracing::debug;

/// Database connection wrapper for one metadata store.
pub struct DbConnection {
    conn: SqliteConnection,
}

impl DbConnection {
    /// Opens an existing metadata store and disables synchronous writes.
    ///
    /// A missing file is reported instead of letting SQLite create an empty
    /// database that would fail every later query.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, the connection fails or
    /// the pragma cannot be applied.
    pub fn open_metadata<P: AsRef<Path>>(path: P) -> Result<Self, ConnectionError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConnectionError::BadConnection(format!(
                "can't open database: {} does not exist",
                path.display()
            )));
        }

        let path_str = path.to_string_lossy();
        let mut conn = SqliteConnection::establish(&path_str)?;

        sql_query("PRAGMA synchronous = OFF;")
            .execute(&mut conn)
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;

        debug!("opened metadata store {}", path.display());
        Ok(Self { conn })
    }

    /// Gets a mutable reference to the underlying connection.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl std::ops::Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl std::ops::DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
