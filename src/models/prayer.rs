use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::EngineError;
use crate::prayer_times::time::parse_hhmm;

/// Placeholder shown for a timing that is not available.
pub const UNAVAILABLE_TIME: &str = "--:--";

/// The five daily prayers. `Ord` follows the canonical daily order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Prayer {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fajr" => Ok(Prayer::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(Prayer::Dhuhr),
            "asr" => Ok(Prayer::Asr),
            "maghrib" => Ok(Prayer::Maghrib),
            "isha" => Ok(Prayer::Isha),
            _ => Err(EngineError::UnknownPrayer(s.to_string())),
        }
    }
}

/// Raw `"HH:MM"` timing strings for one day, keyed by prayer.
///
/// Values are kept exactly as received; whether an entry is usable is decided
/// when it is read, so a sentinel such as `"--:--"` simply gets skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimings {
    entries: BTreeMap<Prayer, String>,
}

impl PrayerTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs such as a provider payload.
    /// Names that are not one of the five prayers (Sunrise, Imsak, ...) are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut timings = Self::new();
        for (name, value) in pairs {
            if let Ok(prayer) = Prayer::from_str(name.as_ref()) {
                timings.set(prayer, value);
            }
        }
        timings
    }

    pub fn set(&mut self, prayer: Prayer, time: impl Into<String>) {
        self.entries.insert(prayer, time.into());
    }

    /// The raw string for `prayer`, if present.
    pub fn get(&self, prayer: Prayer) -> Option<&str> {
        self.entries.get(&prayer).map(String::as_str)
    }

    /// The `HH:MM` form of `prayer`'s timing, or `None` if it is missing,
    /// the sentinel, or malformed.
    pub fn usable(&self, prayer: Prayer) -> Option<String> {
        let raw = self.get(prayer)?;
        parse_hhmm(raw).map(|t| t.format("%H:%M").to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical prayer order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, &str)> {
        self.entries.iter().map(|(p, t)| (*p, t.as_str()))
    }

    /// A payload is only adopted when Fajr is present and well-formed.
    pub fn validate(&self) -> Result<(), EngineError> {
        match self.get(Prayer::Fajr) {
            None => Err(EngineError::InvalidTimingsPayload(
                "missing Fajr timing".to_string(),
            )),
            Some(raw) if parse_hhmm(raw).is_none() => Err(EngineError::InvalidTimingsPayload(
                format!("malformed Fajr timing '{}'", raw),
            )),
            Some(_) => Ok(()),
        }
    }
}

/// The prayer a countdown runs towards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPrayer {
    Upcoming { prayer: Prayer, time: String },
    /// No timings loaded yet; never fed into a ticker.
    Unavailable,
}

impl NextPrayer {
    pub fn name(&self) -> &str {
        match self {
            NextPrayer::Upcoming { prayer, .. } => prayer.display_name(),
            NextPrayer::Unavailable => "N/A",
        }
    }

    pub fn time(&self) -> &str {
        match self {
            NextPrayer::Upcoming { time, .. } => time,
            NextPrayer::Unavailable => UNAVAILABLE_TIME,
        }
    }

    pub fn prayer(&self) -> Option<Prayer> {
        match self {
            NextPrayer::Upcoming { prayer, .. } => Some(*prayer),
            NextPrayer::Unavailable => None,
        }
    }
}
