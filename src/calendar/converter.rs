use chrono::NaiveDate;

use crate::calendar::provider::HijriCalendarProvider;
use crate::calendar::significant::significant_date;
use crate::error::EngineResult;
use crate::location::Place;
use crate::models::{HijriDate, HijriDay, HijriDayRecord, HijriMonth};

/// Fetches Hijri months one at a time and labels each day.
#[derive(Debug, Clone)]
pub struct HijriConverter<P> {
    provider: P,
}

impl<P: HijriCalendarProvider> HijriConverter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Every day of `month`, provider holidays merged with the significant-date label.
    pub fn month_grid(&self, month: HijriMonth, place: &Place) -> EngineResult<Vec<HijriDay>> {
        let records = self.provider.fetch_hijri_month(month, place)?;
        log::debug!("fetched {} days for {}", records.len(), month);
        Ok(records.into_iter().map(annotate).collect())
    }

    pub fn gregorian_to_hijri(&self, date: NaiveDate) -> EngineResult<HijriDate> {
        self.provider.to_hijri(date)
    }

    /// The Gregorian month laid out with Hijri equivalents and labels.
    pub fn gregorian_month(&self, month: u32, year: i32) -> EngineResult<Vec<HijriDay>> {
        let days = self.provider.to_hijri_month(month, year)?;
        Ok(days
            .into_iter()
            .map(|d| {
                annotate(HijriDayRecord {
                    gregorian: d.gregorian,
                    hijri: d.hijri,
                    holidays: d.holidays,
                })
            })
            .collect())
    }

    pub fn current_month(&self, today: NaiveDate) -> EngineResult<HijriMonth> {
        Ok(self.gregorian_to_hijri(today)?.month_of())
    }
}

pub fn next_hijri_month(current: HijriMonth) -> HijriMonth {
    current.next()
}

pub fn prev_hijri_month(current: HijriMonth) -> HijriMonth {
    current.prev()
}

fn annotate(record: HijriDayRecord) -> HijriDay {
    let mut holidays: Vec<String> = Vec::with_capacity(record.holidays.len() + 1);
    let significant = significant_date(record.hijri.day, record.hijri.month).map(str::to_string);
    for label in record.holidays.into_iter().chain(significant) {
        let label = label.trim().to_string();
        if !label.is_empty() && !holidays.contains(&label) {
            holidays.push(label);
        }
    }
    HijriDay {
        gregorian: record.gregorian,
        hijri: record.hijri,
        holidays,
    }
}
