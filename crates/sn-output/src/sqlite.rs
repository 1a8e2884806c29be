//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `subgraph.db` file in the configured output directory
//! with two tables: `edges` and `summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::{EdgeRow, OutputResult, SummaryRow};
use crate::writer::OutputWriter;

/// Writes subgraph output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `subgraph.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("subgraph.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS edges (
                 request      INTEGER NOT NULL,
                 id           INTEGER NOT NULL,
                 source       INTEGER NOT NULL,
                 target       INTEGER NOT NULL,
                 length_m     REAL    NOT NULL,
                 cost         REAL    NOT NULL,
                 reverse_cost REAL    NOT NULL,
                 dead_end     INTEGER,
                 artificial   INTEGER NOT NULL,
                 geometry     TEXT    NOT NULL,
                 PRIMARY KEY (request, id)
             );
             CREATE TABLE IF NOT EXISTS summary (
                 request    INTEGER PRIMARY KEY,
                 start_node INTEGER,
                 edges      INTEGER NOT NULL,
                 artificial INTEGER NOT NULL,
                 superseded INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO edges \
                 (request, id, source, target, length_m, cost, reverse_cost, dead_end, artificial, geometry) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.request as i64,
                    row.edge_id,
                    row.source,
                    row.target,
                    row.length_m,
                    row.cost,
                    row.reverse_cost,
                    row.dead_end.map(i64::from),
                    row.artificial as i64,
                    row.wkt,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO summary (request, start_node, edges, artificial, superseded) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.request as i64,
                row.start_node,
                row.edges as i64,
                row.artificial as i64,
                row.superseded as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
