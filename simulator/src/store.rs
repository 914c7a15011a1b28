use anyhow::Context;
use luckywheel_execution::{Status, Store};
use luckywheel_types::Key;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// [`Store`] backed by a single SQLite key-value table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("open draw store {}", path.display()))?;
        init_schema_sqlite(&conn)?;
        Ok(Self { conn })
    }
}

fn init_schema_sqlite(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         CREATE TABLE IF NOT EXISTS kv (
             key TEXT PRIMARY KEY,
             value TEXT NOT NULL
         );",
    )
    .context("init draw store schema")?;
    Ok(())
}

impl Store for SqliteStore {
    fn get(&self, key: &Key) -> anyhow::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?",
                params![key.name()],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("read {key}"))
    }

    fn insert(&mut self, key: Key, value: String) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                params![key.name(), value],
            )
            .with_context(|| format!("write {key}"))?;
        Ok(())
    }

    fn delete(&mut self, key: &Key) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?", params![key.name()])
            .with_context(|| format!("delete {key}"))?;
        Ok(())
    }

    /// All changes land in one transaction.
    fn apply(&mut self, changes: Vec<(Key, Status)>) -> anyhow::Result<()> {
        let tx = self.conn.transaction().context("begin draw store batch")?;
        for (key, status) in changes {
            let written = match status {
                Status::Update(value) => tx.execute(
                    "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
                    params![key.name(), value],
                ),
                Status::Delete => tx.execute("DELETE FROM kv WHERE key = ?", params![key.name()]),
            };
            written.with_context(|| format!("apply {key}"))?;
        }
        tx.commit().context("commit draw store batch")
    }
}
