//! Best score record
//!
//! A single integer persisted under `bestScore`. Read once at startup and
//! written only when a finished run beats it.

use crate::error::GameResult;
use crate::persistence::KeyValueStore;

/// The all-time best final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "bestScore";

    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Check if a final score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.value
    }

    /// Load the record; a missing or unreadable value counts as zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<u64>(raw.trim()) {
                Ok(value) => {
                    log::info!("Loaded best score {value}");
                    Self::new(value)
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable best score {raw:?}: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read best score: {e}");
                Self::default()
            }
        }
    }

    /// Record `score` if it beats the best. Returns true for a new record.
    ///
    /// The in-memory record is updated even when the write fails.
    pub fn submit(&mut self, score: u64, store: &mut dyn KeyValueStore) -> GameResult<bool> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        self.value = score;
        store.set(Self::STORAGE_KEY, &serde_json::to_string(&score)?)?;
        log::info!("New best score {score} saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, ReadOnlyStore};

    #[test]
    fn missing_record_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).value(), 0);
    }

    #[test]
    fn reads_plain_integer() {
        let mut store = MemoryStore::new();
        store.set(BestScore::STORAGE_KEY, "4520").unwrap();
        assert_eq!(BestScore::load(&store).value(), 4520);
    }

    #[test]
    fn garbage_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(BestScore::STORAGE_KEY, "lots").unwrap();
        assert_eq!(BestScore::load(&store).value(), 0);
    }

    #[test]
    fn writes_only_on_improvement() {
        let mut store = MemoryStore::new();
        let mut best = BestScore::new(500);
        assert!(!best.submit(500, &mut store).unwrap());
        assert!(!best.submit(100, &mut store).unwrap());
        assert_eq!(store.get(BestScore::STORAGE_KEY).unwrap(), None);
        assert!(best.submit(501, &mut store).unwrap());
        assert_eq!(store.get(BestScore::STORAGE_KEY).unwrap().as_deref(), Some("501"));
        assert_eq!(BestScore::load(&store), best);
    }

    #[test]
    fn failed_write_keeps_memory_record() {
        let mut store = ReadOnlyStore(MemoryStore::new());
        let mut best = BestScore::default();
        assert!(best.submit(10, &mut store).is_err());
        assert_eq!(best.value(), 10);
    }
}
