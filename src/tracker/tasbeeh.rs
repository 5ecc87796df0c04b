use crate::db::{KeyValueStore, TASBEEH_KEY};
use crate::error::{EngineError, EngineResult};
use crate::models::{Dhikr, TasbeehState};

/// Every tenth count is signalled to the user.
pub const MILESTONE: u32 = 10;

/// A persisted tap counter for the selected dhikr.
pub struct TasbeehCounter<S> {
    store: S,
    state: TasbeehState,
}

impl<S: KeyValueStore> TasbeehCounter<S> {
    pub fn load(store: S) -> Self {
        let state = match store.get(TASBEEH_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("discarding unreadable tasbeeh state: {}", e);
                TasbeehState::default()
            }),
            Ok(None) => TasbeehState::default(),
            Err(e) => {
                log::warn!("{}; starting tasbeeh from zero", e);
                TasbeehState::default()
            }
        };
        Self { store, state }
    }

    pub fn state(&self) -> &TasbeehState {
        &self.state
    }

    pub fn count(&self) -> u32 {
        self.state.count
    }

    pub fn selected(&self) -> Dhikr {
        self.state.selected
    }

    /// Count one and persist. Returns true when the new count hits a milestone.
    pub fn increment(&mut self) -> EngineResult<bool> {
        self.state.count = self.state.count.saturating_add(1);
        let milestone = self.state.count % MILESTONE == 0;
        self.persist()?;
        Ok(milestone)
    }

    /// Switch dhikr; the count starts over.
    pub fn select(&mut self, dhikr: Dhikr) -> EngineResult<()> {
        self.state.selected = dhikr;
        self.state.count = 0;
        self.persist()
    }

    pub fn reset(&mut self) -> EngineResult<()> {
        self.state.count = 0;
        self.persist()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> EngineResult<()> {
        let blob = serde_json::to_string(&self.state)
            .map_err(|e| EngineError::StorageWriteFailure(e.to_string()))?;
        self.store.set(TASBEEH_KEY, &blob).inspect_err(|e| {
            log::warn!("tasbeeh state not saved: {}", e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn milestone_every_ten() {
        let mut counter = TasbeehCounter::load(MemoryStore::new());
        let hits: Vec<bool> = (0..20).map(|_| counter.increment().unwrap()).collect();
        assert_eq!(hits.iter().filter(|h| **h).count(), 2);
        assert!(hits[9] && hits[19]);
        assert_eq!(counter.count(), 20);
    }

    #[test]
    fn select_resets_count() {
        let mut counter = TasbeehCounter::load(MemoryStore::new());
        counter.increment().unwrap();
        counter.select(Dhikr::AllahuAkbar).unwrap();
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.selected(), Dhikr::AllahuAkbar);
    }

    #[test]
    fn state_survives_reload() {
        let mut counter = TasbeehCounter::load(MemoryStore::new());
        counter.select(Dhikr::Alhamdulillah).unwrap();
        for _ in 0..3 {
            counter.increment().unwrap();
        }
        let reloaded = TasbeehCounter::load(counter.store().clone());
        assert_eq!(reloaded.count(), 3);
        assert_eq!(reloaded.selected(), Dhikr::Alhamdulillah);
    }

    #[test]
    fn broken_blob_starts_fresh() {
        let store = MemoryStore::new().with_entry(TASBEEH_KEY, "[1,2");
        let counter = TasbeehCounter::load(store);
        assert_eq!(counter.state(), &TasbeehState::default());
    }
}
