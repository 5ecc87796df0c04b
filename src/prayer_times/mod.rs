pub mod calculator;
pub mod clock;
pub mod countdown;
pub mod resolver;
pub mod schedule;
pub mod time;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::location::Place;
use crate::models::PrayerTimings;

pub use calculator::SalahProvider;
pub use clock::{Clock, FixedClock, SystemClock, Zone};
pub use countdown::{Tick, Ticker, countdown};
pub use resolver::resolve;
pub use schedule::{Schedule, ScheduleState};

/// Supplies the five daily timing strings for a place.
pub trait TimingsProvider {
    fn fetch_timings(&self, place: &Place, date: NaiveDate) -> EngineResult<PrayerTimings>;
}
