//! SQLite run log.
//!
//! RULE: Only store.rs talks to the database.
//! The engine appends; replay and summary tooling reads. Live session
//! state is memory-only — the store is an audit log, not a save file.

use crate::{
    error::GameResult,
    event::EventLogEntry,
    session::DailyReport,
    types::Tick,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct RunStore {
    conn: Connection,
}

impl RunStore {
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests and UI sessions).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        started_at: i64,
    ) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, started_at],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, tick, subsystem, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.run_id,
                entry.tick as i64,
                entry.subsystem,
                entry.event_type,
                entry.payload
            ],
        )?;
        Ok(())
    }

    pub fn events_for_tick(&self, run_id: &str, tick: Tick) -> GameResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, tick, subsystem, event_type, payload
             FROM event_log WHERE run_id = ?1 AND tick = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![run_id, tick as i64], |row| {
            Ok(EventLogEntry {
                id: Some(row.get(0)?),
                run_id: row.get(1)?,
                tick: row.get::<_, i64>(2)? as Tick,
                subsystem: row.get(3)?,
                event_type: row.get(4)?,
                payload: row.get(5)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// All event payloads of a run, in append order.
    pub fn event_payloads(&self, run_id: &str) -> GameResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM event_log WHERE run_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![run_id], |row| row.get::<_, String>(0))?;
        let mut payloads = Vec::new();
        for row in rows {
            payloads.push(row?);
        }
        Ok(payloads)
    }

    pub fn event_count(&self, run_id: &str) -> GameResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn event_count_of_type(&self, run_id: &str, event_type: &str) -> GameResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![run_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Daily reports ──────────────────────────────────────────

    pub fn insert_daily_report(&self, run_id: &str, report: &DailyReport) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO daily_report
               (run_id, day, correct, incorrect, capital_lost, final_capital, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                report.day as i64,
                report.stats.correct as i64,
                report.stats.incorrect as i64,
                report.stats.capital_lost,
                report.final_capital,
                serde_json::to_string(report)?
            ],
        )?;
        Ok(())
    }

    pub fn daily_reports(&self, run_id: &str) -> GameResult<Vec<DailyReport>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM daily_report WHERE run_id = ?1 ORDER BY day",
        )?;
        let rows = stmt.query_map(params![run_id], |row| row.get::<_, String>(0))?;
        let mut reports = Vec::new();
        for row in rows {
            reports.push(serde_json::from_str(&row?)?);
        }
        Ok(reports)
    }

    pub fn daily_report_count(&self, run_id: &str) -> GameResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM daily_report WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Snapshots ──────────────────────────────────────────────

    pub fn save_snapshot(&self, run_id: &str, tick: Tick, payload: &str) -> GameResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshot (run_id, tick, payload) VALUES (?1, ?2, ?3)",
            params![run_id, tick as i64, payload],
        )?;
        Ok(())
    }

    pub fn latest_snapshot(&self, run_id: &str) -> GameResult<Option<(Tick, String)>> {
        let row = self
            .conn
            .query_row(
                "SELECT tick, payload FROM snapshot
                 WHERE run_id = ?1 ORDER BY tick DESC LIMIT 1",
                params![run_id],
                |row| Ok((row.get::<_, i64>(0)? as Tick, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(row)
    }
}
