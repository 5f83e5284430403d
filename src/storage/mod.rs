use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// User-supplied lyrics, keyed by track path.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS stored_lyrics (
  track_path TEXT PRIMARY KEY,
  content TEXT NOT NULL,
  updated_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    pub fn get_lyrics(&self, track_path: &str) -> anyhow::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT content FROM stored_lyrics WHERE track_path=?1",
                params![track_path],
                |row| row.get(0),
            )
            .optional()
            .context("query stored lyrics")
    }

    /// Store `content` as given. Blank content removes the entry instead.
    pub fn save_lyrics(&self, track_path: &str, content: &str) -> anyhow::Result<()> {
        if content.trim().is_empty() {
            return self.delete_lyrics(track_path);
        }
        self.conn
            .execute(
                r#"
INSERT INTO stored_lyrics(track_path, content, updated_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(track_path) DO UPDATE SET
  content=excluded.content,
  updated_at=excluded.updated_at
"#,
                params![track_path, content, now_unix()],
            )
            .context("save lyrics")?;
        Ok(())
    }

    pub fn delete_lyrics(&self, track_path: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                "DELETE FROM stored_lyrics WHERE track_path=?1",
                params![track_path],
            )
            .context("delete lyrics")?;
        Ok(())
    }

    pub fn count(&self) -> anyhow::Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM stored_lyrics", [], |row| row.get::<_, i64>(0))
            .map(|n| n.max(0) as u64)
            .context("count stored lyrics")
    }
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

// Simple way to use rusqlite from async tasks: open per-operation.
#[derive(Debug, Clone)]
pub struct StorageHandle {
    path: PathBuf,
}

impl StorageHandle {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path)
    }

    pub fn get_lyrics(&self, track_path: &str) -> anyhow::Result<Option<String>> {
        self.open()?.get_lyrics(track_path)
    }

    pub fn save_lyrics(&self, track_path: &str, content: &str) -> anyhow::Result<()> {
        self.open()?.save_lyrics(track_path, content)
    }

    pub fn delete_lyrics(&self, track_path: &str) -> anyhow::Result<()> {
        self.open()?.delete_lyrics(track_path)
    }

    pub fn count(&self) -> anyhow::Result<u64> {
        self.open()?.count()
    }
}
