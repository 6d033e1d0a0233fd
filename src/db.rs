//! Opening and initializing the application's SQLite database.

use std::path::PathBuf;

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, transaction::create_transaction_table};

/// Where a database URL says the data should live.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

/// Parse a database connection string.
///
/// Accepts `:memory:`, `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>`
/// or a plain file path.
fn parse_database_url(database_url: &str) -> Result<DatabaseLocation, Error> {
    let database_url = database_url.trim();

    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);

    match path {
        "" => Err(Error::InvalidDatabaseUrl(database_url.to_owned())),
        ":memory:" => Ok(DatabaseLocation::Memory),
        path => Ok(DatabaseLocation::File(PathBuf::from(path))),
    }
}

/// Open a connection to the database named by `database_url`.
///
/// The database is not initialized, see [initialize].
///
/// # Errors
/// Returns an [Error::InvalidDatabaseUrl] if the URL names no database, or an
/// [Error::SqlError] if the database file could not be opened.
pub fn open_connection(database_url: &str) -> Result<Connection, Error> {
    let connection = match parse_database_url(database_url)? {
        DatabaseLocation::Memory => Connection::open_in_memory()?,
        DatabaseLocation::File(path) => Connection::open(path)?,
    };

    Ok(connection)
}

/// Create the tables for the domain models if they do not exist yet.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
