use crate::clean::CleanedRecord;
use crate::config::Config;
use crate::error::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing::info;

/// Append-only sink over a local SQLite file. Rows are never updated or
/// deleted, so re-running the pipeline against the same file duplicates
/// every record.
pub struct RevenueStore {
    conn: Connection,
}

impl RevenueStore {
    /// Open the database at the configured path, creating the file and
    /// the target table if they do not exist yet.
    pub fn open(config: &Config) -> Result<Self> {
        let conn = Connection::open(&config.db_path)?;
        Self::with_connection(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS revenue (Date DATE, Value REAL)",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Append all records inside one transaction: either every row
    /// becomes visible or none does. The transaction rolls back on drop
    /// if anything fails before the commit.
    pub fn append(&mut self, records: &[CleanedRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO revenue (Date, Value) VALUES (?1, ?2)")?;
            for record in records {
                stmt.execute(params![record.date, record.value])?;
            }
        }
        tx.commit()?;
        info!(rows = records.len(), "appended records");
        Ok(())
    }

    /// Read every persisted row back in insertion order.
    pub fn read_all(&self) -> Result<Vec<CleanedRecord>> {
        let mut stmt = self.conn.prepare("SELECT Date, Value FROM revenue")?;
        let rows = stmt.query_map([], |row| {
            Ok(CleanedRecord {
                date: row.get::<_, NaiveDate>(0)?,
                value: row.get(1)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
