use crate::calendar::converter::HijriConverter;
use crate::calendar::provider::HijriCalendarProvider;
use crate::db::{KeyValueStore, LAST_MONTH_KEY};
use crate::error::{EngineError, EngineResult};
use crate::location::Place;
use crate::models::{HijriDay, HijriMonth};

#[derive(Debug, Clone, PartialEq)]
pub enum GridState {
    Loading,
    Ready(Vec<HijriDay>),
    Failed(EngineError),
}

/// The Hijri month being viewed and its grid.
///
/// Fetch results are tagged with the month they were requested for; a result
/// for any month other than the one currently selected is dropped, whatever
/// order results arrive in.
#[derive(Debug, Clone)]
pub struct MonthNavigator {
    selected: HijriMonth,
    grid: GridState,
}

impl MonthNavigator {
    pub fn new(selected: HijriMonth) -> Self {
        Self {
            selected,
            grid: GridState::Loading,
        }
    }

    /// Start from the last month remembered in `store`, else `fallback`.
    pub fn restore<S: KeyValueStore + ?Sized>(store: &S, fallback: HijriMonth) -> Self {
        let remembered = match store.get(LAST_MONTH_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<HijriMonth>(&raw)
                .ok()
                .filter(|m| (1..=12).contains(&m.month)),
            Ok(None) => None,
            Err(e) => {
                log::warn!("{}; opening calendar on current month", e);
                None
            }
        };
        Self::new(remembered.unwrap_or(fallback))
    }

    pub fn remember<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> EngineResult<()> {
        let blob = serde_json::to_string(&self.selected)
            .map_err(|e| EngineError::StorageWriteFailure(e.to_string()))?;
        store.set(LAST_MONTH_KEY, &blob)
    }

    pub fn selected(&self) -> HijriMonth {
        self.selected
    }

    pub fn state(&self) -> &GridState {
        &self.grid
    }

    /// The loaded days, or nothing while loading or after a failure.
    pub fn grid(&self) -> &[HijriDay] {
        match &self.grid {
            GridState::Ready(days) => days,
            _ => &[],
        }
    }

    pub fn next(&mut self) -> HijriMonth {
        self.jump_to(self.selected.next())
    }

    pub fn prev(&mut self) -> HijriMonth {
        self.jump_to(self.selected.prev())
    }

    pub fn jump_to(&mut self, month: HijriMonth) -> HijriMonth {
        if month != self.selected {
            self.selected = month;
            self.grid = GridState::Loading;
        }
        self.selected
    }

    /// Apply a fetch result for `requested`. Returns false when it was stale.
    pub fn accept(&mut self, requested: HijriMonth, result: EngineResult<Vec<HijriDay>>) -> bool {
        if requested != self.selected {
            log::debug!(
                "dropping stale grid for {} (showing {})",
                requested,
                self.selected
            );
            return false;
        }
        self.grid = match result {
            Ok(days) => GridState::Ready(days),
            Err(e) => {
                log::warn!("calendar for {} unavailable: {}", requested, e);
                GridState::Failed(e)
            }
        };
        true
    }

    /// Fetch the selected month through `converter` and apply it.
    pub fn load<P: HijriCalendarProvider>(&mut self, converter: &HijriConverter<P>, place: &Place) -> &GridState {
        let requested = self.selected;
        let result = converter.month_grid(requested, place);
        self.accept(requested, result);
        &self.grid
    }
}
