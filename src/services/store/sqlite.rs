//! SQLite-backed node store.
//!
//! Every node lands in a single `nodes` relation whose `parent` column
//! references the same table, so foreign key enforcement guarantees that a
//! row is never attached to a parent that was not inserted first.

use super::NodeStore;
use crate::models::{NodeId, NodeRecord};
use crate::{Error, Result};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, params};
use std::io;
use std::path::Path;

/// Schema created when the database does not carry a `nodes` relation yet.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS nodes (
    id      INTEGER PRIMARY KEY,
    parent  INTEGER REFERENCES nodes(id) ON DELETE CASCADE,
    type    INTEGER NOT NULL,
    name    TEXT    NOT NULL,
    size    INTEGER NOT NULL DEFAULT 0,
    atime   INTEGER,
    mtime   INTEGER,
    ctime   INTEGER,
    error   INTEGER NOT NULL DEFAULT 0,
    md5     BLOB CHECK (md5 IS NULL OR length(md5) = 16),
    sha1    BLOB CHECK (sha1 IS NULL OR length(sha1) = 20),
    sha256  BLOB CHECK (sha256 IS NULL OR length(sha256) = 32),
    sha512  BLOB CHECK (sha512 IS NULL OR length(sha512) = 64),
    CHECK ((md5 IS NULL) = (sha1 IS NULL)
       AND (sha1 IS NULL) = (sha256 IS NULL)
       AND (sha256 IS NULL) = (sha512 IS NULL))
);
CREATE INDEX IF NOT EXISTS nodes_parent ON nodes(parent);
";

const INSERT_NODE: &str = "INSERT INTO nodes(parent, type, name, size, atime, mtime, ctime, error, md5, sha1, sha256, sha512) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

/// Apply the connection settings every tool in this crate relies on.
///
/// Foreign key enforcement is verified after being set, since SQLite
/// silently ignores the pragma inside a transaction or when compiled without
/// support for it.
pub fn configure_connection(conn: &Connection, foreign_keys: bool) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", foreign_keys)?;
    let enforced: bool = conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
    if enforced != foreign_keys {
        return Err(Error::Store {
            context: "Could not configure database".to_string(),
            source: io::Error::other(format!(
                "foreign key enforcement stayed {enforced} (requested {foreign_keys})"
            )),
        });
    }

    conn.pragma_update(None, "recursive_triggers", true)?;
    Ok(())
}

/// Node store writing into a SQLite database.
pub struct SqliteStore {
    conn: Connection,
    in_scope: bool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening node store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        configure_connection(&conn, true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            in_scope: false,
        })
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether a scope has been begun and not yet committed.
    #[must_use]
    pub fn in_scope(&self) -> bool {
        self.in_scope
    }
}

impl NodeStore for SqliteStore {
    fn insert_node(&mut self, record: &NodeRecord<'_>) -> io::Result<NodeId> {
        // Names go in as TEXT carrying the raw OS bytes, valid UTF-8 or not.
        let name = ToSqlOutput::Borrowed(ValueRef::Text(record.name.as_encoded_bytes()));
        let size = i64::try_from(record.size).unwrap_or(i64::MAX);
        let digests = record.digests.as_ref();

        let mut stmt = self.conn.prepare_cached(INSERT_NODE).map_err(io::Error::other)?;
        let row_id = stmt
            .insert(params![
                record.parent.map(|id| id.0),
                record.object_type.code(),
                name,
                size,
                record.timestamps.accessed,
                record.timestamps.modified,
                record.timestamps.changed,
                record.capture_error,
                digests.map(|d| d.md5.as_slice()),
                digests.map(|d| d.sha1.as_slice()),
                digests.map(|d| d.sha256.as_slice()),
                digests.map(|d| d.sha512.as_slice()),
            ])
            .map_err(io::Error::other)?;

        Ok(NodeId(row_id))
    }

    fn begin_scope(&mut self) -> io::Result<()> {
        self.conn.execute_batch("BEGIN").map_err(io::Error::other)?;
        self.in_scope = true;
        Ok(())
    }

    fn commit_scope(&mut self) -> io::Result<()> {
        self.conn.execute_batch("COMMIT").map_err(io::Error::other)?;
        self.in_scope = false;
        Ok(())
    }
}
