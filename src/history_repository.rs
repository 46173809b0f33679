use std::path::PathBuf;

use anyhow::Result;
use rusqlite::{
    params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    Connection, ToSql,
};

use crate::types::{HistoryEntry, HistoryState};

pub struct HistoryRepository {
    connection: Connection,
}

/// A finished or failed attempt, ready to be stored.
pub struct HistoryRecord<'a> {
    pub url: &'a str,
    pub mode: &'a str,
    pub quality: &'a str,
    pub state: HistoryState,
    pub output: Option<&'a str>,
    pub output_dir: &'a str,
    pub error: Option<&'a str>,
}

impl ToSql for HistoryState {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            HistoryState::Finished => Ok("finished".to_string().into()),
            HistoryState::Failed => Ok("failed".to_string().into()),
        }
    }
}

impl FromSql for HistoryState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "finished" => Ok(HistoryState::Finished),
            "failed" => Ok(HistoryState::Failed),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl HistoryRepository {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        let connection = Connection::open(db_path)?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                createdAt TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
                url TEXT NOT NULL,
                mode TEXT NOT NULL,
                quality TEXT NOT NULL,
                state TEXT NOT NULL,
                output TEXT,
                outputDir TEXT NOT NULL,
                errorMessage TEXT
              )",
            (),
        )?;

        Ok(HistoryRepository { connection })
    }

    pub fn record(&self, record: &HistoryRecord) -> Result<()> {
        self.connection.execute(
            "INSERT INTO history (url, mode, quality, state, output, outputDir, errorMessage)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.url,
                record.mode,
                record.quality,
                record.state,
                record.output,
                record.output_dir,
                record.error,
            ],
        )?;

        Ok(())
    }

    /// Newest first.
    pub fn latest(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.connection.prepare(
            "SELECT createdAt, url, mode, quality, state, output, outputDir, errorMessage
             FROM history ORDER BY id DESC LIMIT (?1)",
        )?;

        let iter = stmt.query_map([limit as i64], |row| {
            Ok(HistoryEntry {
                created_at: row.get(0)?,
                url: row.get(1)?,
                mode: row.get(2)?,
                quality: row.get(3)?,
                state: row.get(4)?,
                output: row.get(5)?,
                output_dir: row.get(6)?,
                error: row.get(7)?,
            })
        })?;

        Ok(iter.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
