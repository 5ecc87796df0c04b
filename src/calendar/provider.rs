use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate as UmmAlQuraDate;

use crate::calendar::significant::significant_date;
use crate::error::{EngineError, EngineResult};
use crate::location::Place;
use crate::models::{HijriDate, HijriDay, HijriDayRecord, HijriMonth};

/// Source of Gregorian ↔ Hijri conversions.
pub trait HijriCalendarProvider {
    /// The Hijri date of one Gregorian day.
    fn to_hijri(&self, date: NaiveDate) -> EngineResult<HijriDate>;

    /// Every day of a Hijri month with its Gregorian date and holidays.
    fn fetch_hijri_month(&self, month: HijriMonth, place: &Place) -> EngineResult<Vec<HijriDayRecord>>;

    /// Every day of a Gregorian month with its Hijri date.
    fn to_hijri_month(&self, gregorian_month: u32, gregorian_year: i32) -> EngineResult<Vec<HijriDay>>;
}

/// Offline provider using the Umm al-Qura tables of the `hijri_date` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct UmmAlQuraProvider {
    /// Days to shift for local moon sighting (e.g. -1 one day behind).
    pub offset_days: i32,
}

impl UmmAlQuraProvider {
    pub fn new(offset_days: i32) -> Self {
        Self { offset_days }
    }

    fn record(&self, gregorian: NaiveDate) -> EngineResult<HijriDayRecord> {
        let hijri = self.to_hijri(gregorian)?;
        Ok(HijriDayRecord {
            gregorian,
            hijri,
            holidays: significant_date(hijri.day, hijri.month)
                .map(|label| vec![label.to_string()])
                .unwrap_or_default(),
        })
    }
}

impl HijriCalendarProvider for UmmAlQuraProvider {
    fn to_hijri(&self, date: NaiveDate) -> EngineResult<HijriDate> {
        let adjusted = date + Duration::days(self.offset_days as i64);
        let hd = UmmAlQuraDate::from_gr(
            adjusted.year() as usize,
            adjusted.month() as usize,
            adjusted.day() as usize,
        )
        .map_err(|e| EngineError::HijriFetchFailed(format!("{}: {}", date, e)))?;

        Ok(HijriDate {
            day: hd.day() as u32,
            month: hd.month() as u32,
            year: hd.year() as u32,
        })
    }

    fn fetch_hijri_month(&self, month: HijriMonth, _place: &Place) -> EngineResult<Vec<HijriDayRecord>> {
        let seed = tabular_month_start(month).ok_or_else(|| {
            EngineError::HijriFetchFailed(format!("{} is out of range", month))
        })?;

        // The tabular calendar drifts a day or two from Umm al-Qura, and the
        // sighting offset adds to that, so scan a window around the seed.
        let mut days = Vec::with_capacity(30);
        for shift in -6..=36 {
            let gregorian = seed + Duration::days(shift);
            let record = match self.record(gregorian) {
                Ok(record) => record,
                Err(e) if days.is_empty() => {
                    log::debug!("skipping {}: {}", gregorian, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if record.hijri.month_of() == month {
                days.push(record);
            } else if !days.is_empty() {
                break;
            }
        }

        if days.is_empty() {
            return Err(EngineError::HijriFetchFailed(format!(
                "no days found for {}",
                month
            )));
        }
        Ok(days)
    }

    fn to_hijri_month(&self, gregorian_month: u32, gregorian_year: i32) -> EngineResult<Vec<HijriDay>> {
        let mut date = NaiveDate::from_ymd_opt(gregorian_year, gregorian_month, 1).ok_or_else(|| {
            EngineError::HijriFetchFailed(format!(
                "invalid Gregorian month {}-{}",
                gregorian_year, gregorian_month
            ))
        })?;

        let mut days = Vec::with_capacity(31);
        while date.month() == gregorian_month {
            let record = self.record(date)?;
            days.push(HijriDay {
                gregorian: record.gregorian,
                hijri: record.hijri,
                holidays: record.holidays,
            });
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(days)
    }
}

/// Gregorian date of the first day of `month` in the arithmetic (tabular)
/// Islamic calendar.
pub fn tabular_month_start(month: HijriMonth) -> Option<NaiveDate> {
    let y = month.year as i64;
    let m = month.month as i64;
    if y < 1 || !(1..=12).contains(&m) {
        return None;
    }
    let month_days = (59 * (m - 1) + 1) / 2;
    let jdn = 1 + month_days + (y - 1) * 354 + (3 + 11 * y) / 30 + 1_948_439;
    NaiveDate::from_num_days_from_ce_opt((jdn - 1_721_425) as i32)
}
