use chrono::{DateTime, NaiveDate, Utc};
use salah::prelude::{Configuration, Madhab, Method, PrayerSchedule};

use crate::error::{EngineError, EngineResult};
use crate::location::Place;
use crate::models::{Prayer, PrayerTimings};
use crate::prayer_times::TimingsProvider;
use crate::prayer_times::clock::Zone;

/// Offline timings provider backed by the `salah` crate.
#[derive(Debug, Clone)]
pub struct SalahProvider {
    pub method_str: String,
    pub madhab_str: String,
    /// Zone the timing strings are rendered in; must match the clock's.
    pub zone: Zone,
}

impl SalahProvider {
    pub fn new(method: &str, madhab: &str, zone: Zone) -> EngineResult<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        Ok(Self {
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            zone,
        })
    }
}

impl TimingsProvider for SalahProvider {
    fn fetch_timings(&self, place: &Place, date: NaiveDate) -> EngineResult<PrayerTimings> {
        let coords = place.coordinates.ok_or_else(|| {
            EngineError::TimingsFetchFailed(format!("no coordinates for {}", place.label()))
        })?;
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(salah::prelude::Coordinates::new(
                coords.latitude,
                coords.longitude,
            ))
            .with_configuration(params)
            .calculate()
            .map_err(|e| EngineError::TimingsFetchFailed(format!("calculation failed: {}", e)))?;

        let to_local = |utc: DateTime<Utc>| -> String {
            self.zone.wall_time(utc).format("%H:%M").to_string()
        };

        let mut timings = PrayerTimings::new();
        timings.set(Prayer::Fajr, to_local(times.time(salah::prelude::Prayer::Fajr)));
        timings.set(Prayer::Dhuhr, to_local(times.time(salah::prelude::Prayer::Dhuhr)));
        timings.set(Prayer::Asr, to_local(times.time(salah::prelude::Prayer::Asr)));
        timings.set(
            Prayer::Maghrib,
            to_local(times.time(salah::prelude::Prayer::Maghrib)),
        );
        timings.set(Prayer::Isha, to_local(times.time(salah::prelude::Prayer::Isha)));

        log::debug!("computed timings for {} on {}", place.label(), date);
        Ok(timings)
    }
}

fn parse_method(s: &str) -> EngineResult<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(EngineError::TimingsFetchFailed(format!(
            "unknown calculation method: '{}'",
            s
        ))),
    }
}

fn parse_madhab(s: &str) -> EngineResult<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(EngineError::TimingsFetchFailed(format!(
            "unknown madhab: '{}'",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;
    use crate::prayer_times::resolver::resolve;
    use chrono::TimeZone;

    fn ist() -> Zone {
        Zone::from_offset_minutes(Some(330)).unwrap()
    }

    fn delhi() -> Place {
        Place {
            city: "Delhi".to_string(),
            country: "India".to_string(),
            coordinates: Some(Coordinates {
                latitude: 28.6139,
                longitude: 77.2090,
            }),
        }
    }

    #[test]
    fn rejects_unknown_method_or_madhab() {
        assert!(SalahProvider::new("Martian", "Hanafi", ist()).is_err());
        assert!(SalahProvider::new("Karachi", "Zahiri", ist()).is_err());
        assert!(SalahProvider::new("Karachi", "Hanafi", ist()).is_ok());
    }

    #[test]
    fn produces_five_valid_timings() {
        let provider = SalahProvider::new("Karachi", "Hanafi", ist()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let timings = provider.fetch_timings(&delhi(), date).unwrap();
        assert!(timings.validate().is_ok());
        for prayer in Prayer::ALL {
            assert!(timings.usable(prayer).is_some(), "{} missing", prayer);
        }
    }

    #[test]
    fn missing_coordinates_is_a_fetch_failure() {
        let provider = SalahProvider::new("Karachi", "Hanafi", ist()).unwrap();
        let mut place = delhi();
        place.coordinates = None;
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(matches!(
            provider.fetch_timings(&place, date),
            Err(EngineError::TimingsFetchFailed(_))
        ));
    }

    #[test]
    fn timings_follow_the_zone_the_clock_reads() {
        let provider = SalahProvider::new("Karachi", "Shafi", ist()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let timings = provider.fetch_timings(&delhi(), date).unwrap();
        assert!(timings.get(Prayer::Maghrib).unwrap_or("").starts_with("18:"));
        assert!(timings.get(Prayer::Isha).unwrap_or("").starts_with("19:"));

        // 13:30 UTC is 19:00 in Delhi: Maghrib has passed, Isha is next.
        let utc = Utc.with_ymd_and_hms(2025, 3, 10, 13, 30, 0).unwrap();
        let now = ist().wall_time(utc);
        assert_eq!(resolve(Some(&timings), now).prayer(), Some(Prayer::Isha));
    }
}
