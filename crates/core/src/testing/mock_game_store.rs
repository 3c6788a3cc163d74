//! Mock game store for testing.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;

use crate::bgg::GameRecord;
use crate::games::{GameStats, GameStore, InsertOutcome, PersistedGame, StoreError};

#[derive(Debug, Default)]
struct State {
    rows: Vec<PersistedGame>,
    unavailable: bool,
    failing_ids: HashSet<u64>,
    delays: HashMap<u64, Duration>,
    hidden_ids: HashSet<u64>,
}

/// In-memory implementation of the GameStore trait.
///
/// Besides plain storage it can:
/// - Fail every operation (`set_unavailable`)
/// - Fail operations for selected BGG ids
/// - Delay lookups for selected BGG ids
/// - Simulate a concurrent writer winning the insert race
#[derive(Debug, Default)]
pub struct MockGameStore {
    state: RwLock<State>,
}

impl MockGameStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.write().unavailable = unavailable;
    }

    /// Make operations on `upstream_id` fail.
    pub fn fail_upstream_id(&self, upstream_id: u64) {
        self.write().failing_ids.insert(upstream_id);
    }

    /// Sleep for `delay` before looking up `upstream_id`.
    pub fn set_delay(&self, upstream_id: u64, delay: Duration) {
        self.write().delays.insert(upstream_id, delay);
    }

    /// Store `record` while making the next lookup for it miss, as if another
    /// writer inserted it between our lookup and our insert.
    pub fn insert_behind_lookup(&self, record: GameRecord) {
        let mut state = self.write();
        state.hidden_ids.insert(record.upstream_id);
        state.rows.push(persisted(record));
    }

    /// Number of stored rows.
    pub fn row_count(&self) -> usize {
        self.read().rows.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self, upstream_id: Option<u64>) -> Result<(), StoreError> {
        let state = self.read();
        if state.unavailable {
            return Err(StoreError::Database("mock store unavailable".to_string()));
        }
        if let Some(id) = upstream_id {
            if state.failing_ids.contains(&id) {
                return Err(StoreError::Database(format!("mock failure for {}", id)));
            }
        }
        Ok(())
    }
}

fn persisted(game: GameRecord) -> PersistedGame {
    PersistedGame {
        local_id: uuid::Uuid::new_v4().to_string(),
        game,
        created_at: Utc::now(),
    }
}

impl GameStore for MockGameStore {
    fn find_by_upstream_id(&self, upstream_id: u64) -> Result<Option<PersistedGame>, StoreError> {
        self.check_available(Some(upstream_id))?;

        let delay = self.read().delays.get(&upstream_id).copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let mut state = self.write();
        if state.hidden_ids.remove(&upstream_id) {
            return Ok(None);
        }
        Ok(state
            .rows
            .iter()
            .find(|r| r.game.upstream_id == upstream_id)
            .cloned())
    }

    fn insert_if_absent(&self, record: &GameRecord) -> Result<InsertOutcome, StoreError> {
        self.check_available(Some(record.upstream_id))?;

        let mut state = self.write();
        if let Some(existing) = state
            .rows
            .iter()
            .find(|r| r.game.upstream_id == record.upstream_id)
        {
            return Ok(InsertOutcome {
                local_id: existing.local_id.clone(),
                inserted: false,
            });
        }

        let row = persisted(record.clone());
        let local_id = row.local_id.clone();
        state.rows.push(row);
        Ok(InsertOutcome {
            local_id,
            inserted: true,
        })
    }

    fn get(&self, local_id: &str) -> Result<PersistedGame, StoreError> {
        self.check_available(None)?;
        self.read()
            .rows
            .iter()
            .find(|r| r.local_id == local_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(local_id.to_string()))
    }

    fn list(&self, limit: u32) -> Result<Vec<PersistedGame>, StoreError> {
        self.check_available(None)?;
        Ok(self
            .read()
            .rows
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn remove(&self, local_id: &str) -> Result<(), StoreError> {
        self.check_available(None)?;
        let mut state = self.write();
        let before = state.rows.len();
        state.rows.retain(|r| r.local_id != local_id);
        if state.rows.len() == before {
            return Err(StoreError::NotFound(local_id.to_string()));
        }
        Ok(())
    }

    fn stats(&self) -> Result<GameStats, StoreError> {
        self.check_available(None)?;
        let state = self.read();
        Ok(GameStats {
            total_games: state.rows.len() as u64,
            oldest_entry: state.rows.iter().map(|r| r.created_at).min(),
            newest_entry: state.rows.iter().map(|r| r.created_at).max(),
        })
    }
}
