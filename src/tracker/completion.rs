use crate::db::{HISTORY_KEY, KeyValueStore};
use crate::error::{EngineError, EngineResult};
use crate::models::{DailyStats, DayStatus, History, Prayer, Streak, count_for};
use crate::prayer_times::Clock;
use crate::tracker::stats::{calculate_streak, daily_summary};

/// Today's prayer completion, merged into a persisted per-day history.
///
/// The day key is taken from the clock on every access, so the tracker rolls
/// over to an empty day after midnight without any migration step. Each
/// mutation writes the whole history back before returning.
pub struct CompletionTracker<S, C> {
    store: S,
    clock: C,
    history: History,
}

impl<S: KeyValueStore, C: Clock> CompletionTracker<S, C> {
    /// Read the history from `store`. Missing, unreadable or corrupt data
    /// starts an empty history.
    pub fn load(store: S, clock: C) -> Self {
        let history = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<History>(&raw).unwrap_or_else(|e| {
                log::warn!("discarding unreadable prayer history: {}", e);
                History::new()
            }),
            Ok(None) => History::new(),
            Err(e) => {
                log::warn!("{}; starting with empty history", e);
                History::new()
            }
        };
        log::debug!("loaded prayer history with {} days", history.len());
        Self {
            store,
            clock,
            history,
        }
    }

    pub fn today_key(&self) -> String {
        self.clock.today().format("%Y-%m-%d").to_string()
    }

    /// Today's flags; all false if nothing was recorded yet.
    pub fn status(&self) -> DayStatus {
        self.history
            .get(&self.today_key())
            .copied()
            .unwrap_or_default()
    }

    /// Flip one prayer for today and persist.
    ///
    /// On a write failure the flip stays in memory and the error is returned.
    pub fn toggle(&mut self, prayer: Prayer) -> EngineResult<bool> {
        let key = self.today_key();
        let done = self.history.entry(key).or_default().toggle(prayer);
        log::debug!("{} toggled to {}", prayer, done);
        self.persist()?;
        Ok(done)
    }

    /// Clear today's flags. Other days are left alone.
    pub fn reset_today(&mut self) -> EngineResult<()> {
        let key = self.today_key();
        self.history.insert(key, DayStatus::default());
        self.persist()
    }

    pub fn completed_count(&self) -> u8 {
        self.status().completed_count()
    }

    /// Always a multiple of 20.
    pub fn completion_percent(&self) -> f64 {
        self.completed_count() as f64 * 100.0 / Prayer::ALL.len() as f64
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn day_count(&self, key: &str) -> u8 {
        count_for(&self.history, key)
    }

    pub fn summary(&self) -> Vec<DailyStats> {
        daily_summary(&self.history)
    }

    pub fn streak(&self) -> Streak {
        calculate_streak(&self.history, self.clock.today())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn persist(&mut self) -> EngineResult<()> {
        let blob = serde_json::to_string(&self.history)
            .map_err(|e| EngineError::StorageWriteFailure(e.to_string()))?;
        self.store.set(HISTORY_KEY, &blob).inspect_err(|e| {
            log::warn!("prayer history not saved, kept in memory: {}", e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::prayer_times::FixedClock;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn tracker(store: MemoryStore, now: NaiveDateTime) -> CompletionTracker<MemoryStore, FixedClock> {
        CompletionTracker::load(store, FixedClock::new(now))
    }

    #[test]
    fn two_toggles_on_empty_day() {
        let mut t = tracker(MemoryStore::new(), at(2025, 3, 10, 9, 0));
        t.toggle(Prayer::Fajr).unwrap();
        t.toggle(Prayer::Dhuhr).unwrap();
        assert_eq!(t.completed_count(), 2);
        assert_eq!(t.completion_percent(), 40.0);
    }

    #[test]
    fn every_toggle_is_persisted() {
        let mut t = tracker(MemoryStore::new(), at(2025, 3, 10, 9, 0));
        t.toggle(Prayer::Asr).unwrap();
        t.toggle(Prayer::Isha).unwrap();
        assert_eq!(t.store().writes, 2);

        let saved: History = serde_json::from_str(t.store().raw(HISTORY_KEY).unwrap()).unwrap();
        let today = saved.get("2025-03-10").unwrap();
        assert!(today.asr && today.isha && !today.fajr);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut t = tracker(MemoryStore::new(), at(2025, 3, 10, 9, 0));
        let before = t.status();
        t.toggle(Prayer::Maghrib).unwrap();
        t.toggle(Prayer::Maghrib).unwrap();
        assert_eq!(t.status(), before);
    }

    #[test]
    fn percent_is_always_a_fifth() {
        let mut t = tracker(MemoryStore::new(), at(2025, 3, 10, 9, 0));
        let allowed = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];
        for prayer in Prayer::ALL.iter().chain(Prayer::ALL.iter().rev().take(2)) {
            t.toggle(*prayer).unwrap();
            assert!(allowed.contains(&t.completion_percent()));
        }
    }

    #[test]
    fn reset_only_touches_today() {
        let yesterday = r#"{"2025-03-09":{"Fajr":true,"Dhuhr":true,"Asr":true,"Maghrib":false,"Isha":true}}"#;
        let store = MemoryStore::new().with_entry(HISTORY_KEY, yesterday);
        let mut t = tracker(store, at(2025, 3, 10, 9, 0));
        t.toggle(Prayer::Fajr).unwrap();
        t.reset_today().unwrap();

        assert_eq!(t.completed_count(), 0);
        assert_eq!(t.day_count("2025-03-09"), 4);
        assert!(t.history().contains_key("2025-03-10"));
    }

    #[test]
    fn toggles_never_touch_other_days() {
        let earlier = r#"{"2025-03-01":{"Fajr":true},"2025-03-09":{"Isha":true}}"#;
        let store = MemoryStore::new().with_entry(HISTORY_KEY, earlier);
        let mut t = tracker(store, at(2025, 3, 10, 9, 0));
        let before: Vec<_> = t
            .history()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();

        for prayer in Prayer::ALL {
            t.toggle(prayer).unwrap();
        }
        t.reset_today().unwrap();

        for (key, status) in before {
            assert_eq!(t.history().get(&key), Some(&status));
        }
    }

    #[test]
    fn rolls_over_at_midnight() {
        let mut t = tracker(MemoryStore::new(), at(2025, 3, 10, 23, 59));
        t.toggle(Prayer::Isha).unwrap();
        assert_eq!(t.completed_count(), 1);

        t.clock().advance(Duration::minutes(2));
        assert_eq!(t.today_key(), "2025-03-11");
        assert_eq!(t.completed_count(), 0);

        t.toggle(Prayer::Fajr).unwrap();
        assert_eq!(t.day_count("2025-03-10"), 1);
        assert_eq!(t.day_count("2025-03-11"), 1);
    }

    #[test]
    fn write_failure_keeps_in_memory_state() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let mut t = tracker(store, at(2025, 3, 10, 9, 0));

        let result = t.toggle(Prayer::Dhuhr);
        assert!(matches!(result, Err(EngineError::StorageWriteFailure(_))));
        assert!(t.status().dhuhr);

        t.store_mut().fail_writes = false;
        t.toggle(Prayer::Asr).unwrap();
        let saved: History = serde_json::from_str(t.store().raw(HISTORY_KEY).unwrap()).unwrap();
        assert_eq!(saved.get("2025-03-10").unwrap().completed_count(), 2);
    }

    #[test]
    fn unreadable_storage_starts_empty() {
        let mut store = MemoryStore::new().with_entry(HISTORY_KEY, r#"{"2025-03-09":{"Fajr":true}}"#);
        store.fail_reads = true;
        let t = tracker(store, at(2025, 3, 10, 9, 0));
        assert!(t.history().is_empty());

        let corrupt = MemoryStore::new().with_entry(HISTORY_KEY, "not json");
        let t = tracker(corrupt, at(2025, 3, 10, 9, 0));
        assert!(t.history().is_empty());
        assert_eq!(t.completed_count(), 0);
    }
}
