use chrono::{Duration, NaiveDateTime};

use crate::error::{EngineError, EngineResult};
use crate::models::{NextPrayer, PrayerTimings};
use crate::prayer_times::clock::Zone;
use crate::prayer_times::resolver::resolve;
use crate::prayer_times::time::{at_today, format_hms, parse_hhmm};

/// Time left until `target` (`"HH:MM"`), floored to whole seconds.
///
/// A target that is not strictly after `now` is tomorrow's occurrence. Both
/// are wall-clock readings in `zone`, so a daylight-saving shift between them
/// lengthens or shortens the wait.
pub fn countdown(target: &str, now: NaiveDateTime, zone: Zone) -> Option<Duration> {
    let time = parse_hhmm(target)?;
    let span = zone.between(now, target_instant(time, now));
    Some(Duration::seconds(span.num_seconds()))
}

fn target_instant(time: chrono::NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = at_today(time, now);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// One countdown cycle: a resolved prayer pinned to an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cycle {
    id: u64,
    next: NextPrayer,
    target: NaiveDateTime,
}

impl Cycle {
    fn begin(id: u64, timings: &PrayerTimings, now: NaiveDateTime) -> EngineResult<Self> {
        let next = resolve(Some(timings), now);
        let time = parse_hhmm(next.time()).ok_or_else(|| {
            EngineError::InvalidTimingsPayload(format!("no usable time for {}", next.name()))
        })?;
        log::debug!("countdown cycle {} -> {} at {}", id, next.name(), next.time());
        Ok(Self {
            id,
            target: target_instant(time, now),
            next,
        })
    }
}

/// What a single tick observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub next: NextPrayer,
    pub remaining: Duration,
    pub display: String,
    pub cycle: u64,
    /// The previous target was reached and a new cycle replaced it.
    pub rolled_over: bool,
}

/// Drives the next-prayer countdown.
///
/// Remaining time is recomputed from the supplied wall-clock instant on every
/// tick. When the target is reached the resolver runs again and the cycle is
/// replaced rather than adjusted.
#[derive(Debug, Clone)]
pub struct Ticker {
    timings: PrayerTimings,
    cycle: Cycle,
    zone: Zone,
}

impl Ticker {
    /// Only validated timings can start a countdown. Spans are plain
    /// wall-clock differences.
    pub fn start(timings: PrayerTimings, now: NaiveDateTime) -> EngineResult<Self> {
        Self::start_in(timings, now, Zone::utc())
    }

    /// Like [`Ticker::start`], with spans measured as real time in `zone`.
    pub fn start_in(timings: PrayerTimings, now: NaiveDateTime, zone: Zone) -> EngineResult<Self> {
        timings.validate()?;
        let cycle = Cycle::begin(0, &timings, now)?;
        Ok(Self {
            timings,
            cycle,
            zone,
        })
    }

    pub fn next(&self) -> &NextPrayer {
        &self.cycle.next
    }

    pub fn target(&self) -> NaiveDateTime {
        self.cycle.target
    }

    pub fn tick(&mut self, now: NaiveDateTime) -> Tick {
        let mut rolled_over = false;
        if self.cycle.target <= now {
            match Cycle::begin(self.cycle.id + 1, &self.timings, now) {
                Ok(cycle) => {
                    self.cycle = cycle;
                    rolled_over = true;
                }
                Err(e) => log::warn!("could not restart countdown: {}", e),
            }
        }

        let span = self.zone.between(now, self.cycle.target);
        let remaining = Duration::seconds(span.num_seconds().max(0));
        Tick {
            next: self.cycle.next.clone(),
            display: format_hms(remaining),
            remaining,
            cycle: self.cycle.id,
            rolled_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Prayer;
    use crate::prayer_times::clock::{Clock, FixedClock};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn sample() -> PrayerTimings {
        PrayerTimings::from_pairs([
            ("Fajr", "05:00"),
            ("Dhuhr", "12:30"),
            ("Asr", "15:45"),
            ("Maghrib", "18:20"),
            ("Isha", "19:45"),
        ])
    }

    #[test]
    fn countdown_to_later_today() {
        assert_eq!(countdown("15:45", at(14, 0, 0), Zone::utc()), Some(Duration::seconds(6300)));
    }

    #[test]
    fn countdown_moves_past_times_to_tomorrow() {
        let left = countdown("05:00", at(20, 30, 0), Zone::utc()).unwrap();
        assert_eq!(left, Duration::hours(8) + Duration::minutes(30));
        let exact = countdown("05:00", at(5, 0, 0), Zone::utc()).unwrap();
        assert_eq!(exact, Duration::days(1));
    }

    #[test]
    fn countdown_rejects_sentinel() {
        assert_eq!(countdown("--:--", at(1, 0, 0), Zone::utc()), None);
    }

    #[test]
    fn start_refuses_invalid_timings() {
        let no_fajr = PrayerTimings::from_pairs([("Dhuhr", "12:30")]);
        assert!(Ticker::start(no_fajr, at(9, 0, 0)).is_err());
        assert!(Ticker::start(PrayerTimings::new(), at(9, 0, 0)).is_err());
    }

    #[test]
    fn afternoon_countdown_starts_near_asr_and_decreases() {
        let clock = FixedClock::new(at(14, 0, 0));
        let mut ticker = Ticker::start(sample(), clock.now()).unwrap();

        let first = ticker.tick(clock.now());
        assert_eq!(first.next.prayer(), Some(Prayer::Asr));
        assert_eq!(first.display, "01:45:00");

        let mut previous = first.remaining;
        for _ in 0..5 {
            clock.advance(Duration::seconds(1));
            let tick = ticker.tick(clock.now());
            assert!(tick.remaining < previous);
            assert!(tick.remaining >= Duration::zero());
            previous = tick.remaining;
        }
        assert_eq!(ticker.tick(clock.now()).display, "01:44:55");
    }

    #[test]
    fn zero_crossing_rolls_over_to_following_prayer() {
        let clock = FixedClock::new(at(15, 44, 58));
        let mut ticker = Ticker::start(sample(), clock.now()).unwrap();
        assert_eq!(ticker.tick(clock.now()).display, "00:00:02");

        clock.advance(Duration::seconds(2));
        let tick = ticker.tick(clock.now());
        assert!(tick.rolled_over);
        assert_eq!(tick.next.prayer(), Some(Prayer::Maghrib));
        assert_eq!(tick.cycle, 1);
        assert_eq!(tick.display, "02:35:00");
    }

    #[test]
    fn after_isha_counts_down_to_tomorrows_fajr() {
        let clock = FixedClock::new(at(20, 30, 0));
        let mut ticker = Ticker::start(sample(), clock.now()).unwrap();
        let tick = ticker.tick(clock.now());
        assert_eq!(tick.next.prayer(), Some(Prayer::Fajr));
        assert_eq!(tick.display, "08:30:00");
        assert_eq!(ticker.target().date(), at(0, 0, 0).date().succ_opt().unwrap());
    }

    #[test]
    fn sleeping_past_several_prayers_resolves_from_wall_clock() {
        let clock = FixedClock::new(at(4, 0, 0));
        let mut ticker = Ticker::start(sample(), clock.now()).unwrap();
        assert_eq!(ticker.next().prayer(), Some(Prayer::Fajr));

        clock.set(at(16, 0, 0));
        let tick = ticker.tick(clock.now());
        assert!(tick.rolled_over);
        assert_eq!(tick.next.prayer(), Some(Prayer::Maghrib));
        assert_eq!(tick.display, "02:20:00");
    }

    #[test]
    fn fajr_wrap_rolls_over_after_midnight_into_dhuhr() {
        let clock = FixedClock::new(at(23, 59, 59));
        let mut ticker = Ticker::start(sample(), clock.now()).unwrap();
        assert_eq!(ticker.next().prayer(), Some(Prayer::Fajr));

        clock.advance(Duration::hours(5) + Duration::seconds(1));
        let tick = ticker.tick(clock.now());
        assert!(tick.rolled_over);
        assert_eq!(tick.next.prayer(), Some(Prayer::Dhuhr));
        assert_eq!(tick.display, "07:30:00");
    }

    #[test]
    fn fixed_zone_ticker_matches_plain_ticker() {
        let ist = Zone::from_offset_minutes(Some(330)).unwrap();
        let mut zoned = Ticker::start_in(sample(), at(14, 0, 0), ist).unwrap();
        let mut plain = Ticker::start(sample(), at(14, 0, 0)).unwrap();
        assert_eq!(zoned.tick(at(14, 0, 0)), plain.tick(at(14, 0, 0)));
        assert_eq!(countdown("19:45", at(19, 0, 0), ist), Some(Duration::minutes(45)));
    }
}
