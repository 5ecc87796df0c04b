/// Significant dates keyed by Hijri `(day, month)`.
pub const SIGNIFICANT_DATES: &[((u32, u32), &str)] = &[
    ((1, 1), "Islamic New Year"),
    ((10, 1), "Ashura"),
    ((12, 3), "Mawlid"),
    ((1, 9), "Ramadan Begins"),
    ((27, 9), "Laylat al-Qadr"),
    ((1, 10), "Eid al-Fitr"),
    ((9, 12), "Day of Arafah"),
    ((10, 12), "Eid al-Adha"),
];

pub fn significant_date(day: u32, month: u32) -> Option<&'static str> {
    SIGNIFICANT_DATES
        .iter()
        .find(|((d, m), _)| *d == day && *m == month)
        .map(|(_, label)| *label)
}
