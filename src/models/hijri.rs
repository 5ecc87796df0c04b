use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

pub fn hijri_month_name(month: u32) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month as usize - 1]
    } else {
        "Unknown"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HijriDate {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl HijriDate {
    pub fn formatted(&self) -> String {
        format!("{} {} {}", self.day, hijri_month_name(self.month), self.year)
    }

    pub fn month_of(&self) -> HijriMonth {
        HijriMonth {
            year: self.year,
            month: self.month,
        }
    }
}

/// A Hijri year/month pair used for calendar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HijriMonth {
    pub year: u32,
    pub month: u32,
}

impl HijriMonth {
    pub fn new(year: u32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year.saturating_sub(1),
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn name(&self) -> &'static str {
        hijri_month_name(self.month)
    }
}

impl std::fmt::Display for HijriMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

/// One provider record: a Gregorian day with its Hijri equivalent and the
/// holidays the provider attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HijriDayRecord {
    pub gregorian: NaiveDate,
    pub hijri: HijriDate,
    pub holidays: Vec<String>,
}

/// A calendar cell: Gregorian date, Hijri date and every label that applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HijriDay {
    pub gregorian: NaiveDate,
    pub hijri: HijriDate,
    pub holidays: Vec<String>,
}

impl HijriDay {
    pub fn gregorian_key(&self) -> String {
        self.gregorian.format("%Y-%m-%d").to_string()
    }
}
