//! Database module - SQLite storage for completed workout sessions

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::exercises::ExerciseVariant;

/// One persisted counting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub variant: ExerciseVariant,
    pub count: u32,
}

/// Receives the final count when a counter is torn down
pub trait SessionAccumulator {
    fn record_session(&mut self, count: u32, variant: ExerciseVariant) -> Result<WorkoutSession>;
}

/// Per-variant totals for stats
#[derive(Debug, Clone, PartialEq)]
pub struct VariantTotal {
    pub variant: ExerciseVariant,
    pub sessions: u32,
    pub reps: u32,
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Throwaway database, nothing touches disk
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                variant TEXT NOT NULL,
                count INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert a finished session
    pub fn add_session(&self, count: u32, variant: ExerciseVariant) -> Result<WorkoutSession> {
        if count == 0 {
            bail!("refusing to record an empty {} session", variant);
        }

        let timestamp = Utc::now();
        self.conn.execute(
            "INSERT INTO sessions (timestamp, variant, count) VALUES (?1, ?2, ?3)",
            params![timestamp.to_rfc3339(), variant.as_str(), count],
        )?;

        let session = WorkoutSession {
            id: self.conn.last_insert_rowid(),
            timestamp,
            variant,
            count,
        };
        info!("Saved session {}: {} x{}", session.id, variant, count);
        Ok(session)
    }

    /// Get all sessions, newest first
    pub fn get_sessions(&self) -> Result<Vec<WorkoutSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, variant, count FROM sessions ORDER BY id DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut sessions = Vec::with_capacity(rows.len());
        for (id, timestamp, variant, count) in rows {
            sessions.push(WorkoutSession {
                id,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc),
                variant: variant.parse()?,
                count,
            });
        }
        Ok(sessions)
    }

    /// Delete a session. Returns false if no such id.
    pub fn delete_session(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Session count and rep total for every variant, including untouched ones
    pub fn totals_by_variant(&self) -> Result<Vec<VariantTotal>> {
        let sessions = self.get_sessions()?;
        let totals = ExerciseVariant::all()
            .iter()
            .map(|variant| {
                let matching = sessions.iter().filter(|s| s.variant == *variant);
                VariantTotal {
                    variant: *variant,
                    sessions: matching.clone().count() as u32,
                    reps: matching.map(|s| s.count).sum(),
                }
            })
            .collect();
        Ok(totals)
    }
}

impl SessionAccumulator for Database {
    fn record_session(&mut self, count: u32, variant: ExerciseVariant) -> Result<WorkoutSession> {
        self.add_session(count, variant)
    }
}
