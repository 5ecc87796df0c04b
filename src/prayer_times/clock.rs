use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use std::cell::Cell;

use crate::error::{EngineError, EngineResult};

/// Source of the local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The zone that wall-clock times and prayer timings are expressed in.
///
/// `System` follows the operating system's zone, daylight saving included.
/// `Fixed` pins a constant UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    System,
    Fixed(FixedOffset),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    /// `None` selects the system zone; `Some(minutes)` a fixed UTC offset.
    pub fn from_offset_minutes(minutes: Option<i32>) -> EngineResult<Self> {
        match minutes {
            None => Ok(Zone::System),
            Some(m) => m
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(Zone::Fixed)
                .ok_or(EngineError::InvalidUtcOffset(m)),
        }
    }

    /// Wall-clock reading of a UTC instant in this zone.
    pub fn wall_time(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::System => utc.with_timezone(&Local).naive_local(),
            Zone::Fixed(offset) => utc.with_timezone(offset).naive_local(),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.wall_time(Utc::now())
    }

    /// The UTC instant a wall-clock reading in this zone refers to.
    pub fn instant(&self, wall: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Zone::System => instant_in(&Local, wall),
            Zone::Fixed(offset) => instant_in(offset, wall),
        }
    }

    /// Real time elapsed between two wall-clock readings.
    pub fn between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Duration {
        match self {
            Zone::System => between_in(&Local, from, to),
            Zone::Fixed(offset) => between_in(offset, from, to),
        }
    }
}

/// An ambiguous reading takes its earlier instant. A reading skipped by a
/// forward shift is read with the offset in force before the shift.
fn instant_in<Tz: TimeZone>(tz: &Tz, wall: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&wall)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .or_else(|| {
            tz.from_local_datetime(&(wall + Duration::hours(1)))
                .earliest()
                .map(|t| t.with_timezone(&Utc))
        })
        .unwrap_or_else(|| Utc.from_utc_datetime(&wall))
}

fn between_in<Tz: TimeZone>(tz: &Tz, from: NaiveDateTime, to: NaiveDateTime) -> Duration {
    instant_in(tz, to) - instant_in(tz, from)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: Zone,
}

impl SystemClock {
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.zone.now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::LocalResult;

    fn wall(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    /// UTC-5 until 2025-03-09 02:00 local, UTC-4 from then on.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        fn winter() -> FixedOffset {
            FixedOffset::west_opt(5 * 3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }

        fn shift_utc() -> NaiveDateTime {
            wall(9, 7, 0)
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            if *local < wall(9, 2, 0) {
                LocalResult::Single(Self::winter())
            } else if *local < wall(9, 3, 0) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::summer())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::shift_utc() {
                Self::winter()
            } else {
                Self::summer()
            }
        }
    }

    #[test]
    fn fixed_zone_reads_utc_instant_as_local_wall_time() {
        let ist = Zone::from_offset_minutes(Some(330)).unwrap();
        let utc = Utc.from_utc_datetime(&wall(10, 14, 0));
        assert_eq!(ist.wall_time(utc), wall(10, 19, 30));
        assert_eq!(ist.instant(wall(10, 19, 30)), utc);
    }

    #[test]
    fn offset_minutes_map_to_zones() {
        assert_eq!(Zone::from_offset_minutes(None).unwrap(), Zone::System);
        assert_eq!(Zone::from_offset_minutes(Some(0)).unwrap(), Zone::utc());
        assert_eq!(
            Zone::from_offset_minutes(Some(-240)).unwrap(),
            Zone::Fixed(FixedOffset::west_opt(4 * 3600).unwrap())
        );
        assert_eq!(
            Zone::from_offset_minutes(Some(24 * 60)),
            Err(EngineError::InvalidUtcOffset(1440))
        );
    }

    #[test]
    fn fixed_zone_span_is_plain_wall_clock_difference() {
        let span = Zone::utc().between(wall(10, 14, 0), wall(10, 15, 45));
        assert_eq!(span, Duration::minutes(105));
    }

    #[test]
    fn span_across_spring_forward_loses_the_skipped_hour() {
        let span = between_in(&SpringForward, wall(9, 1, 0), wall(9, 5, 0));
        assert_eq!(span, Duration::hours(3));
    }

    #[test]
    fn skipped_wall_time_uses_offset_before_the_shift() {
        let instant = instant_in(&SpringForward, wall(9, 2, 30));
        assert_eq!(instant.naive_utc(), wall(9, 7, 30));
    }

    #[test]
    fn system_clock_reads_its_zone() {
        let clock = SystemClock::new(Zone::utc());
        let before = Utc::now().naive_utc();
        let now = clock.now();
        assert!(now >= before - Duration::seconds(1));
        assert!(now <= Utc::now().naive_utc() + Duration::seconds(1));
        assert_eq!(clock.zone(), Zone::utc());
    }
}
