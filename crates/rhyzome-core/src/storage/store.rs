//! Store: SQLite-backed node and relation persistence.
//!
//! Every operation is a single statement; there are no cross-call
//! transactions. Relation deletes match on `name` alone and therefore remove
//! edges from every origin.

use super::rows::Relation;
use super::schema::GRAPH_SCHEMA;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Location marker that opens a private in-memory database.
pub const MEMORY_LOCATION: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable at {location}: {source}")]
    Unavailable {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Write failed ({op}): {source}")]
    WriteFailed {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Read failed ({op}): {source}")]
    ReadFailed {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    fn write(op: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::WriteFailed { op, source }
    }

    fn read(op: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::ReadFailed { op, source }
    }
}

/// SQLite-backed node/relation store.
///
/// Cloning is cheap and shares the underlying connection. The connection is
/// released when the last clone is dropped or [`Store::close`] is called on it.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open a store at `location`, a file path or [`MEMORY_LOCATION`].
    pub fn open(location: impl AsRef<Path>) -> Result<Self, StoreError> {
        let location = location.as_ref();
        let unavailable = |source| StoreError::Unavailable {
            location: location.display().to_string(),
            source,
        };

        let conn = if location == Path::new(MEMORY_LOCATION) {
            Connection::open_in_memory()
        } else {
            Connection::open(location)
        }
        .map_err(unavailable)?;
        Self::init_connection(&conn).map_err(unavailable)?;

        debug!(location = %location.display(), "graph store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (for testing).
    pub fn memory() -> Result<Self, StoreError> {
        Self::open(MEMORY_LOCATION)
    }

    fn init_connection(conn: &Connection) -> rusqlite::Result<()> {
        // In-memory databases answer "memory" and keep it.
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "journal mode set");
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(GRAPH_SCHEMA)
    }

    /// Lock the connection, recovering it if a previous holder panicked.
    ///
    /// Statements run in autocommit mode, so a panic mid-call cannot leave a
    /// transaction open on the connection.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release the storage handle.
    ///
    /// Only the last clone actually closes the connection; earlier calls just
    /// drop their share.
    pub fn close(self) -> Result<(), StoreError> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().unwrap_or_else(PoisonError::into_inner);
                conn.close()
                    .map_err(|(_, source)| StoreError::WriteFailed {
                        op: "close",
                        source,
                    })?;
                debug!("graph store closed");
                Ok(())
            }
            Err(shared) => {
                debug!(
                    remaining = Arc::strong_count(&shared) - 1,
                    "graph store share dropped; connection still open"
                );
                Ok(())
            }
        }
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Insert or overwrite the node `id`.
    pub fn set_node(&self, id: &str, value: &str) -> Result<(), StoreError> {
        self.conn()
            .execute(
                r#"
                INSERT INTO nodes (id, value) VALUES (?1, ?2)
                ON CONFLICT(id) DO UPDATE SET value = excluded.value
                "#,
                params![id, value],
            )
            .map_err(StoreError::write("set_node"))?;
        debug!(node_id = id, "node stored");
        Ok(())
    }

    /// Fetch a node's value. `None` if the node does not exist.
    pub fn get_node(&self, id: &str) -> Result<Option<String>, StoreError> {
        self.conn()
            .query_row("SELECT value FROM nodes WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(StoreError::read("get_node"))
    }

    /// Remove a node. Removing an absent id is a no-op.
    pub fn delete_node(&self, id: &str) -> Result<(), StoreError> {
        let removed = self
            .conn()
            .execute("DELETE FROM nodes WHERE id = ?1", [id])
            .map_err(StoreError::write("delete_node"))?;
        debug!(node_id = id, removed, "node delete");
        Ok(())
    }

    /// Every stored node value, unordered.
    pub fn all_node_values(&self) -> Result<Vec<String>, StoreError> {
        self.collect_strings("SELECT value FROM nodes", "all_node_values")
    }

    /// Every stored node id, unordered.
    pub fn node_ids(&self) -> Result<Vec<String>, StoreError> {
        self.collect_strings("SELECT id FROM nodes", "node_ids")
    }

    fn collect_strings(&self, sql: &str, op: &'static str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql).map_err(StoreError::read(op))?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(StoreError::read(op))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(StoreError::read(op))?;
        Ok(rows)
    }

    // =========================================================================
    // Relations
    // =========================================================================

    /// Append a relation. Duplicates are kept.
    pub fn create_relation(&self, from_id: &str, name: &str, to_id: &str) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT INTO relations (name, from_id, to_id) VALUES (?1, ?2, ?3)",
                params![name, from_id, to_id],
            )
            .map_err(StoreError::write("create_relation"))?;
        debug!(from_id, name, to_id, "relation created");
        Ok(())
    }

    /// Remove every relation called `name`, whatever its endpoints.
    ///
    /// Returns the number of rows removed.
    pub fn delete_relations_by_name(&self, name: &str) -> Result<usize, StoreError> {
        let removed = self
            .conn()
            .execute("DELETE FROM relations WHERE name = ?1", [name])
            .map_err(StoreError::write("delete_relations_by_name"))?;
        debug!(name, removed, "relations deleted by name");
        Ok(removed)
    }

    /// All relations leaving `from_id`. Order is unspecified.
    pub fn query_relations_from(&self, from_id: &str) -> Result<Vec<Relation>, StoreError> {
        let op = "query_relations_from";
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT name, from_id, to_id FROM relations WHERE from_id = ?1")
            .map_err(StoreError::read(op))?;
        let relations = stmt
            .query_map([from_id], |row| {
                Ok(Relation {
                    name: row.get(0)?,
                    from_id: row.get(1)?,
                    to_id: row.get(2)?,
                })
            })
            .map_err(StoreError::read(op))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::read(op))?;
        Ok(relations)
    }
}
