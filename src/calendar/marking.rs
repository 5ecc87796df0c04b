use chrono::NaiveDate;

use crate::calendar::converter::HijriConverter;
use crate::calendar::provider::HijriCalendarProvider;
use crate::error::EngineResult;
use crate::models::{HijriDate, HijriDay, History, count_for};
use crate::prayer_times::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Full,
    Partial,
    None,
}

pub fn tier_for(count: u8) -> Tier {
    match count {
        5.. => Tier::Full,
        3 | 4 => Tier::Partial,
        _ => Tier::None,
    }
}

/// How one calendar cell should be shown. The fields are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMark {
    pub tier: Tier,
    pub count: u8,
    pub is_today: bool,
    pub is_selected: bool,
}

pub fn mark_day(day: &HijriDay, history: &History, today: HijriDate, selected: NaiveDate) -> DayMark {
    let count = count_for(history, &day.gregorian_key());
    DayMark {
        tier: tier_for(count),
        count,
        is_today: day.hijri == today,
        is_selected: day.gregorian == selected,
    }
}

pub fn mark_month(days: &[HijriDay], history: &History, today: HijriDate, selected: NaiveDate) -> Vec<DayMark> {
    days.iter()
        .map(|day| mark_day(day, history, today, selected))
        .collect()
}

/// Mark a grid against the Hijri date of the clock's current day, looked up
/// at call time.
pub fn mark_now<P: HijriCalendarProvider, C: Clock>(
    converter: &HijriConverter<P>,
    clock: &C,
    days: &[HijriDay],
    history: &History,
    selected: NaiveDate,
) -> EngineResult<Vec<DayMark>> {
    let today = converter.gregorian_to_hijri(clock.today())?;
    Ok(mark_month(days, history, today, selected))
}
