//! SQLite-backed game cache implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{GameStats, GameStore, InsertOutcome, PersistedGame, StoreError};
use crate::bgg::GameRecord;

const GAME_COLUMNS: &str = "local_id, upstream_id, name, year_published, min_players, max_players,
     playing_time_minutes, image_url, description, created_at";

/// SQLite-backed game cache.
pub struct SqliteGameStore {
    conn: Mutex<Connection>,
}

impl SqliteGameStore {
    /// Create a new SQLite game store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite game store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Cached catalog games (one row per BGG id)
            CREATE TABLE IF NOT EXISTS games (
                local_id TEXT PRIMARY KEY,
                upstream_id INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                year_published INTEGER,
                min_players INTEGER,
                max_players INTEGER,
                playing_time_minutes INTEGER,
                image_url TEXT,
                description TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_games_created_at ON games(created_at);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_game(row: &rusqlite::Row) -> rusqlite::Result<PersistedGame> {
        let upstream_id: i64 = row.get(1)?;
        let created_at_str: String = row.get(9)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(PersistedGame {
            local_id: row.get(0)?,
            game: GameRecord {
                upstream_id: upstream_id as u64,
                name: row.get(2)?,
                year_published: row.get(3)?,
                min_players: row.get(4)?,
                max_players: row.get(5)?,
                playing_time_minutes: row.get(6)?,
                image_url: row.get(7)?,
                description: row.get(8)?,
            },
            created_at,
        })
    }
}

impl GameStore for SqliteGameStore {
    fn find_by_upstream_id(&self, upstream_id: u64) -> Result<Option<PersistedGame>, StoreError> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {} FROM games WHERE upstream_id = ?", GAME_COLUMNS),
            params![upstream_id as i64],
            Self::row_to_game,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn insert_if_absent(&self, record: &GameRecord) -> Result<InsertOutcome, StoreError> {
        let conn = self.lock()?;
        let upstream_id = record.upstream_id as i64;

        let rows_inserted = conn
            .execute(
                "INSERT INTO games (local_id, upstream_id, name, year_published, min_players, max_players,
                                    playing_time_minutes, image_url, description, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(upstream_id) DO NOTHING",
                params![
                    Uuid::new_v4().to_string(),
                    upstream_id,
                    &record.name,
                    record.year_published,
                    record.min_players,
                    record.max_players,
                    record.playing_time_minutes,
                    &record.image_url,
                    &record.description,
                    // Fixed width so created_at sorts as text
                    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // Whoever won the insert, the row for this upstream id is authoritative
        let local_id: String = conn
            .query_row(
                "SELECT local_id FROM games WHERE upstream_id = ?",
                params![upstream_id],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(InsertOutcome {
            local_id,
            inserted: rows_inserted == 1,
        })
    }

    fn get(&self, local_id: &str) -> Result<PersistedGame, StoreError> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {} FROM games WHERE local_id = ?", GAME_COLUMNS),
            params![local_id],
            Self::row_to_game,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(local_id.to_string()),
            _ => StoreError::Database(e.to_string()),
        })
    }

    fn list(&self, limit: u32) -> Result<Vec<PersistedGame>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM games ORDER BY created_at DESC, rowid DESC LIMIT ?",
                GAME_COLUMNS
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit as i64], Self::row_to_game)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(games)
    }

    fn remove(&self, local_id: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;

        let rows_affected = conn
            .execute("DELETE FROM games WHERE local_id = ?", params![local_id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(local_id.to_string()));
        }

        Ok(())
    }

    fn stats(&self) -> Result<GameStats, StoreError> {
        let conn = self.lock()?;

        let (total_games, oldest, newest): (i64, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT COUNT(*), MIN(created_at), MAX(created_at) FROM games",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let parse = |s: Option<String>| {
            s.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc))
        };

        Ok(GameStats {
            total_games: total_games as u64,
            oldest_entry: parse(oldest),
            newest_entry: parse(newest),
        })
    }
}
