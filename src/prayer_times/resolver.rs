use chrono::NaiveDateTime;

use crate::models::{NextPrayer, Prayer, PrayerTimings, UNAVAILABLE_TIME};
use crate::prayer_times::time::{at_today, parse_hhmm};

/// Pick the first prayer of the day whose time is strictly after `now`.
///
/// Once every prayer has passed this returns Fajr with today's Fajr string;
/// it stands for tomorrow's Fajr, and the countdown moves the date forward.
pub fn resolve(timings: Option<&PrayerTimings>, now: NaiveDateTime) -> NextPrayer {
    let timings = match timings {
        Some(t) if !t.is_empty() => t,
        _ => return NextPrayer::Unavailable,
    };

    for prayer in Prayer::ALL {
        let Some(raw) = timings.get(prayer) else {
            continue;
        };
        let Some(time) = parse_hhmm(raw) else {
            continue;
        };
        if at_today(time, now) > now {
            log::debug!("next prayer at {}: {} {}", now, prayer, raw);
            return NextPrayer::Upcoming {
                prayer,
                time: time.format("%H:%M").to_string(),
            };
        }
    }

    let fajr = timings
        .usable(Prayer::Fajr)
        .or_else(|| timings.get(Prayer::Fajr).map(str::to_string))
        .unwrap_or_else(|| UNAVAILABLE_TIME.to_string());
    NextPrayer::Upcoming {
        prayer: Prayer::Fajr,
        time: fajr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
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
    fn afternoon_resolves_to_asr() {
        let next = resolve(Some(&sample()), at(14, 0));
        assert_eq!(
            next,
            NextPrayer::Upcoming {
                prayer: Prayer::Asr,
                time: "15:45".to_string()
            }
        );
    }

    #[test]
    fn after_isha_wraps_to_fajr() {
        let next = resolve(Some(&sample()), at(20, 30));
        assert_eq!(next.prayer(), Some(Prayer::Fajr));
        assert_eq!(next.time(), "05:00");
    }

    #[test]
    fn exact_prayer_time_is_not_upcoming() {
        let next = resolve(Some(&sample()), at(12, 30));
        assert_eq!(next.prayer(), Some(Prayer::Asr));
    }

    #[test]
    fn skips_unavailable_entries() {
        let mut timings = sample();
        timings.set(Prayer::Asr, UNAVAILABLE_TIME);
        let next = resolve(Some(&timings), at(14, 0));
        assert_eq!(next.prayer(), Some(Prayer::Maghrib));
    }

    #[test]
    fn empty_or_missing_is_placeholder() {
        assert_eq!(resolve(None, at(9, 0)), NextPrayer::Unavailable);
        assert_eq!(
            resolve(Some(&PrayerTimings::new()), at(9, 0)),
            NextPrayer::Unavailable
        );
    }

    #[test]
    fn nothing_usable_falls_back_to_fajr() {
        let timings = PrayerTimings::from_pairs([("Dhuhr", "--:--"), ("Isha", "late")]);
        let next = resolve(Some(&timings), at(9, 0));
        assert_eq!(next.prayer(), Some(Prayer::Fajr));
        assert_eq!(next.time(), UNAVAILABLE_TIME);
    }

    #[test]
    fn input_key_order_does_not_matter() {
        let shuffled = PrayerTimings::from_pairs([
            ("Isha", "19:45"),
            ("Asr", "15:45"),
            ("Fajr", "05:00"),
            ("Maghrib", "18:20"),
            ("Dhuhr", "12:30"),
        ]);
        for hour in 0..24 {
            for minute in [0, 29, 30, 31, 59] {
                assert_eq!(
                    resolve(Some(&shuffled), at(hour, minute)),
                    resolve(Some(&sample()), at(hour, minute))
                );
            }
        }
    }

    #[test]
    fn result_is_after_now_or_wrapped_fajr() {
        let timings = sample();
        for minute_of_day in (0..24 * 60).step_by(7) {
            let now = at(minute_of_day / 60, minute_of_day % 60);
            let next = resolve(Some(&timings), now);
            let time = parse_hhmm(next.time()).unwrap();
            let upcoming = at_today(time, now) > now;
            assert!(upcoming || next.prayer() == Some(Prayer::Fajr));
        }
    }
}
