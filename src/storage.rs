//! Record persistence.
//!
//! One SQLite table keyed by source URL. Writes replace the whole row, so
//! re-scraping a page is idempotent and the last write wins.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::{Record, Result};

/// Table name. Kept compatible with databases written by earlier scrapers.
pub const TABLE: &str = "festivals";

/// Columns in storage order. `festival_id` holds [`Record::identifier`].
pub const COLUMNS: &[&str] = &["source_url", "festival_id", "name", "website", "location", "phone"];

/// Where records go.
pub trait RecordStore {
    /// Insert or replace the record for `record.source_url`.
    fn upsert(&mut self, record: &Record) -> Result<()>;

    /// The stored record for `source_url`, if any.
    fn get(&self, source_url: &str) -> Result<Option<Record>>;

    /// Number of stored records.
    fn count(&self) -> Result<usize>;
}

/// SQLite-backed record store.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and bring its schema
    /// up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened record store");
        Self::init(conn)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, migrating its schema.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        let store = Self { conn };
        store.init_schema()?;
        store.migrate()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS festivals (
                source_url  TEXT PRIMARY KEY,
                festival_id TEXT,
                name        TEXT,
                website     TEXT,
                location    TEXT,
                phone       TEXT
            );
        "#,
        )?;
        Ok(())
    }

    /// Column names of the table as it exists on disk.
    pub fn columns(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let names = stmt
            .query_map(params![TABLE], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Bring a legacy table to the current column set.
    ///
    /// Missing columns are added in place. Unknown columns are dropped by
    /// rebuilding the table and copying over the columns both versions share.
    fn migrate(&self) -> Result<()> {
        let existing = self.columns()?;

        for column in COLUMNS {
            if !existing.iter().any(|c| c == column) {
                info!(column, "adding missing column");
                self.conn
                    .execute(&format!("ALTER TABLE {TABLE} ADD COLUMN {column} TEXT"), [])?;
            }
        }

        let extra: Vec<&String> = existing
            .iter()
            .filter(|c| !COLUMNS.contains(&c.as_str()))
            .collect();
        if extra.is_empty() {
            return Ok(());
        }
        info!(?extra, "dropping legacy columns");

        let common: Vec<&str> = COLUMNS
            .iter()
            .copied()
            .filter(|c| existing.iter().any(|e| e == c))
            .collect();
        let common = common.join(", ");

        self.conn.execute_batch(&format!(
            r#"
            BEGIN;
            CREATE TABLE festivals_new (
                source_url  TEXT PRIMARY KEY,
                festival_id TEXT,
                name        TEXT,
                website     TEXT,
                location    TEXT,
                phone       TEXT
            );
            INSERT OR REPLACE INTO festivals_new ({common}) SELECT {common} FROM {TABLE};
            DROP TABLE {TABLE};
            ALTER TABLE festivals_new RENAME TO {TABLE};
            COMMIT;
        "#
        ))?;
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn upsert(&mut self, record: &Record) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO festivals (source_url, festival_id, name, website, location, phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.source_url,
                record.identifier,
                record.name,
                record.website,
                record.location,
                record.phone,
            ],
        )?;
        debug!(url = %record.source_url, "record stored");
        Ok(())
    }

    fn get(&self, source_url: &str) -> Result<Option<Record>> {
        let record = self
            .conn
            .query_row(
                "SELECT source_url, festival_id, name, website, location, phone
                 FROM festivals WHERE source_url = ?1",
                params![source_url],
                |row| {
                    Ok(Record {
                        source_url: row.get(0)?,
                        identifier: row.get(1)?,
                        name: row.get(2)?,
                        website: row.get(3)?,
                        location: row.get(4)?,
                        phone: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM festivals", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}
