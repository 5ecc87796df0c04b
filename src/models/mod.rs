pub mod hijri;
pub mod prayer;
pub mod stats;
pub mod status;
pub mod tasbeeh;

pub use hijri::{HijriDate, HijriDay, HijriDayRecord, HijriMonth, hijri_month_name};
pub use prayer::{NextPrayer, Prayer, PrayerTimings, UNAVAILABLE_TIME};
pub use stats::{DailyStats, Streak};
pub use status::{DayStatus, History, count_for};
pub use tasbeeh::{Dhikr, TasbeehState};
