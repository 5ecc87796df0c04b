use chrono::{NaiveDate, NaiveDateTime};

use crate::error::EngineError;
use crate::location::Place;
use crate::models::{NextPrayer, PrayerTimings};
use crate::prayer_times::clock::Zone;
use crate::prayer_times::countdown::Ticker;
use crate::prayer_times::resolver::resolve;
use crate::prayer_times::TimingsProvider;

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleState {
    Loading,
    Ready(PrayerTimings),
    Failed(EngineError),
}

/// Today's timings for the current place, as far as they could be loaded.
#[derive(Debug, Clone)]
pub struct Schedule {
    state: ScheduleState,
    place: Option<Place>,
    date: Option<NaiveDate>,
    zone: Zone,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::in_zone(Zone::default())
    }

    /// A schedule whose countdowns measure real time in `zone`.
    pub fn in_zone(zone: Zone) -> Self {
        Self {
            state: ScheduleState::Loading,
            place: None,
            date: None,
            zone,
        }
    }

    /// Fetch and adopt timings. A payload that fails validation is dropped
    /// whole and the schedule goes to `Failed` with no timings set.
    pub fn refresh<P: TimingsProvider + ?Sized>(
        &mut self,
        provider: &P,
        place: &Place,
        date: NaiveDate,
    ) -> &ScheduleState {
        self.place = Some(place.clone());
        self.date = Some(date);
        self.state = match provider
            .fetch_timings(place, date)
            .and_then(|timings| timings.validate().map(|_| timings))
        {
            Ok(timings) => {
                log::info!("loaded prayer timings for {} ({})", place.label(), date);
                ScheduleState::Ready(timings)
            }
            Err(e) => {
                log::warn!("prayer timings unavailable for {}: {}", place.label(), e);
                ScheduleState::Failed(e)
            }
        };
        &self.state
    }

    /// Manual retry for the last requested place and date.
    pub fn retry<P: TimingsProvider + ?Sized>(&mut self, provider: &P) -> &ScheduleState {
        match (self.place.clone(), self.date) {
            (Some(place), Some(date)) => self.refresh(provider, &place, date),
            _ => &self.state,
        }
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn timings(&self) -> Option<&PrayerTimings> {
        match &self.state {
            ScheduleState::Ready(timings) => Some(timings),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EngineError> {
        match &self.state {
            ScheduleState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn next_prayer(&self, now: NaiveDateTime) -> NextPrayer {
        resolve(self.timings(), now)
    }

    /// A countdown exists only once real timings are loaded.
    pub fn ticker(&self, now: NaiveDateTime) -> Option<Ticker> {
        let timings = self.timings()?;
        match Ticker::start_in(timings.clone(), now, self.zone) {
            Ok(ticker) => Some(ticker),
            Err(e) => {
                log::warn!("countdown not started: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineResult;
    use crate::models::Prayer;
    use std::cell::Cell;

    struct StubProvider {
        payload: EngineResult<PrayerTimings>,
        calls: Cell<u32>,
    }

    impl TimingsProvider for StubProvider {
        fn fetch_timings(&self, _place: &Place, _date: NaiveDate) -> EngineResult<PrayerTimings> {
            self.calls.set(self.calls.get() + 1);
            self.payload.clone()
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn ready_schedule_yields_ticker() {
        let provider = StubProvider {
            payload: Ok(PrayerTimings::from_pairs([("Fajr", "05:00"), ("Isha", "19:45")])),
            calls: Cell::new(0),
        };
        let mut schedule = Schedule::in_zone(Zone::utc());
        schedule.refresh(&provider, &Place::default(), day());
        let now = day().and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(schedule.next_prayer(now).prayer(), Some(Prayer::Isha));
        let mut ticker = schedule.ticker(now).unwrap();
        assert_eq!(ticker.tick(now).display, "07:45:00");
    }

    #[test]
    fn fetch_failure_leaves_placeholder_and_no_ticker() {
        let provider = StubProvider {
            payload: Err(EngineError::TimingsFetchFailed("offline".into())),
            calls: Cell::new(0),
        };
        let mut schedule = Schedule::new();
        schedule.refresh(&provider, &Place::default(), day());
        let now = day().and_hms_opt(12, 0, 0).unwrap();
        assert!(matches!(schedule.error(), Some(EngineError::TimingsFetchFailed(_))));
        assert_eq!(schedule.next_prayer(now), NextPrayer::Unavailable);
        assert!(schedule.ticker(now).is_none());
    }

    #[test]
    fn invalid_payload_is_never_partially_adopted() {
        let provider = StubProvider {
            payload: Ok(PrayerTimings::from_pairs([("Dhuhr", "12:30"), ("Asr", "15:45")])),
            calls: Cell::new(0),
        };
        let mut schedule = Schedule::new();
        schedule.refresh(&provider, &Place::default(), day());
        assert!(schedule.timings().is_none());
        assert!(matches!(
            schedule.error(),
            Some(EngineError::InvalidTimingsPayload(_))
        ));
    }

    #[test]
    fn retry_refetches_last_request() {
        let provider = StubProvider {
            payload: Err(EngineError::TimingsFetchFailed("offline".into())),
            calls: Cell::new(0),
        };
        let mut schedule = Schedule::new();
        schedule.retry(&provider);
        assert_eq!(provider.calls.get(), 0);
        assert_eq!(schedule.state(), &ScheduleState::Loading);

        schedule.refresh(&provider, &Place::default(), day());
        schedule.retry(&provider);
        assert_eq!(provider.calls.get(), 2);
    }
}
