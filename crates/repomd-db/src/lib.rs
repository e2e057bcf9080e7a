pub mod connection;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_utils;

pub use connection::DbConnection;
pub use error::{DbError, Result};
