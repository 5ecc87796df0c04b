use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Prayer;

/// Completion flags for the five prayers of one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DayStatus {
    pub fajr: bool,
    pub dhuhr: bool,
    pub asr: bool,
    pub maghrib: bool,
    pub isha: bool,
}

impl DayStatus {
    pub fn is_done(&self, prayer: Prayer) -> bool {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    fn flag_mut(&mut self, prayer: Prayer) -> &mut bool {
        match prayer {
            Prayer::Fajr => &mut self.fajr,
            Prayer::Dhuhr => &mut self.dhuhr,
            Prayer::Asr => &mut self.asr,
            Prayer::Maghrib => &mut self.maghrib,
            Prayer::Isha => &mut self.isha,
        }
    }

    pub fn set(&mut self, prayer: Prayer, done: bool) {
        *self.flag_mut(prayer) = done;
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, prayer: Prayer) -> bool {
        let flag = self.flag_mut(prayer);
        *flag = !*flag;
        *flag
    }

    pub fn completed_count(&self) -> u8 {
        Prayer::ALL.iter().filter(|p| self.is_done(**p)).count() as u8
    }
}

/// Per-day completion keyed by Gregorian `YYYY-MM-DD`.
pub type History = BTreeMap<String, DayStatus>;

/// Completed prayers recorded for `key`, 0 when the day has no entry.
pub fn count_for(history: &History, key: &str) -> u8 {
    history.get(key).map(DayStatus::completed_count).unwrap_or(0)
}
