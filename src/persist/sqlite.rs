//! SQLite-backed key/value sink for the cart record.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use crate::core::store::CartStore;

use super::{CartSink, PersistResult};

/// SQLite implementation of [`crate::persist::CartSink`].
pub struct SqliteCartSink {
    conn: Connection,
}

impl SqliteCartSink {
    /// Opens or creates a SQLite-backed sink at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite sink.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Hydrates a store from the record under `key`.
    pub fn load_store(&self, key: &str) -> PersistResult<CartStore> {
        super::load_store(self, key)
    }

    /// Deletes the record under `key`, returning whether one existed.
    pub fn remove(&mut self, key: &str) -> PersistResult<bool> {
        let count = self
            .conn
            .execute("DELETE FROM storage WHERE key = ?1", params![key])?;
        Ok(count > 0)
    }

    /// Last write time of `key` in milliseconds since epoch.
    pub fn updated_ms(&self, key: &str) -> PersistResult<Option<u64>> {
        let ts: Option<i64> = self
            .conn
            .query_row(
                "SELECT updated_ms FROM storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts.map(|v| v as u64))
    }
}

impl CartSink for SqliteCartSink {
    fn load(&self, key: &str) -> PersistResult<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn store(&mut self, key: &str, record: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO storage(key, value, updated_ms) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_ms = excluded.updated_ms",
            params![key, record, now_ms() as i64],
        )?;
        Ok(())
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
