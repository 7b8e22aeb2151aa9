//! SQLite database holding credential records and the login-attempt
//! counter.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::errors::{Result, VaultError};

use super::layout;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS credentials (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        username         TEXT NOT NULL,
        site             TEXT NOT NULL,
        encrypted_secret BLOB NOT NULL,
        UNIQUE(username, site)
    );

    CREATE TABLE IF NOT EXISTS login_attempts (
        id           INTEGER PRIMARY KEY,
        attempts     INTEGER NOT NULL DEFAULT 0,
        last_attempt TEXT,
        locked_until TEXT
    );

    INSERT OR IGNORE INTO login_attempts (id, attempts, last_attempt, locked_until)
    VALUES (1, 0, NULL, NULL);
";

/// Create the database and its schema.  Safe to call on an existing
/// database: tables and the counter row are only created when missing.
pub fn create(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    conn.execute_batch(SCHEMA)?;
    layout::restrict_file(path)?;
    Ok(conn)
}

/// Open an existing database.  Never creates one.
pub fn open(path: &Path) -> Result<Connection> {
    if !path.exists() {
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
