pub mod converter;
pub mod marking;
pub mod navigator;
pub mod provider;
pub mod significant;

pub use converter::{HijriConverter, next_hijri_month, prev_hijri_month};
pub use marking::{DayMark, Tier, mark_day, mark_month, mark_now, tier_for};
pub use navigator::{GridState, MonthNavigator};
pub use provider::{HijriCalendarProvider, UmmAlQuraProvider};
pub use significant::significant_date;
