use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::parser::record::Record;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS polls (
            id            INTEGER PRIMARY KEY,
            start_date    TEXT NOT NULL,
            end_date      TEXT NOT NULL,
            pollster_link TEXT NOT NULL DEFAULT '',
            pollster_name TEXT NOT NULL,
            client        TEXT NOT NULL,
            sample_size   INTEGER NOT NULL CHECK(sample_size >= 0),
            rejoin        REAL NOT NULL,
            stay_out      REAL NOT NULL,
            neither       REAL NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(start_date, end_date, pollster_name, client)
        );
        CREATE INDEX IF NOT EXISTS idx_polls_end ON polls(end_date);
        CREATE INDEX IF NOT EXISTS idx_polls_pollster ON polls(pollster_name);
        ",
    )?;
    Ok(())
}

/// Insert or replace polls; a poll is identified by its dates, pollster and client.
pub fn save_records(conn: &Connection, records: &[Record]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO polls
             (start_date, end_date, pollster_link, pollster_name, client,
              sample_size, rejoin, stay_out, neither)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for r in records {
            count += stmt.execute(rusqlite::params![
                r.start_date, r.end_date, r.pollster_link, r.pollster_name, r.client,
                r.sample_size, r.rejoin, r.stay_out, r.neither,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Overview ──

/// Stored polls, newest first, optionally filtered by pollster name (substring).
pub fn fetch_overview(
    conn: &Connection,
    pollster: Option<&str>,
    limit: usize,
) -> Result<Vec<Record>> {
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let where_clause = match pollster {
        Some(p) => {
            params.push(Box::new(format!("%{}%", p)));
            " WHERE pollster_name LIKE ?1"
        }
        None => "",
    };

    let sql = format!(
        "SELECT start_date, end_date, pollster_link, pollster_name, client,
                sample_size, rejoin, stay_out, neither
         FROM polls{}
         ORDER BY end_date DESC, id DESC
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(Record {
                start_date: row.get(0)?,
                end_date: row.get(1)?,
                pollster_link: row.get(2)?,
                pollster_name: row.get(3)?,
                client: row.get(4)?,
                sample_size: row.get(5)?,
                rejoin: row.get(6)?,
                stay_out: row.get(7)?,
                neither: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub first_end: Option<NaiveDate>,
    pub last_end: Option<NaiveDate>,
    pub by_pollster: Vec<(String, usize)>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let (total, first_end, last_end): (usize, Option<NaiveDate>, Option<NaiveDate>) = conn.query_row(
        "SELECT COUNT(*), MIN(end_date), MAX(end_date) FROM polls",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    let mut stmt = conn.prepare(
        "SELECT pollster_name, COUNT(*) AS n
         FROM polls
         GROUP BY pollster_name
         ORDER BY n DESC, pollster_name",
    )?;
    let by_pollster = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Stats {
        total,
        first_end,
        last_end,
        by_pollster,
    })
}
