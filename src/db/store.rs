use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::db::migrations::run_migrations;

/// String key-value storage. Every record the app keeps goes through this.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Insert or overwrite.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Returns whether a value was removed.
    fn delete(&self, key: &str) -> Result<bool>;
    /// Keys beginning with `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Opening database at {:?}", path))?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        log::debug!("storage get {}", key);
        self.conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(anyhow::Error::from)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        log::debug!("storage set {} ({} bytes)", key, value.len());
        self.conn.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM storage WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        // substr comparison instead of LIKE so '_' and '%' in keys match literally
        let mut stmt = self.conn.prepare(
            "SELECT key FROM storage
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use super::KvStore;
    use anyhow::Result;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    #[derive(Default)]
    pub struct MemoryStore {
        entries: RefCell<BTreeMap<String, String>>,
    }

    impl KvStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<bool> {
            Ok(self.entries.borrow_mut().remove(key).is_some())
        }

        fn list(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .entries
                .borrow()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }
    }
}
