use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Parse a 24-hour `"HH:MM"` timing. A trailing zone annotation such as
/// `"05:12 (IST)"` is ignored; the `"--:--"` sentinel and garbage yield `None`.
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let token = raw.split_whitespace().next()?;
    NaiveTime::parse_from_str(token, "%H:%M").ok()
}

/// The instant `time` falls on during `now`'s calendar day.
pub fn at_today(time: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(time)
}

/// Render a span as zero-padded `HH:MM:SS`; negative spans clamp to zero.
pub fn format_hms(span: Duration) -> String {
    let secs = span.num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_plain_and_annotated_times() {
        assert_eq!(parse_hhmm("05:07"), NaiveTime::from_hms_opt(5, 7, 0));
        assert_eq!(parse_hhmm("19:45 (+03)"), NaiveTime::from_hms_opt(19, 45, 0));
        assert_eq!(parse_hhmm("--:--"), None);
        assert_eq!(parse_hhmm("25:00"), None);
        assert_eq!(parse_hhmm(""), None);
    }

    #[test]
    fn formats_and_clamps() {
        assert_eq!(format_hms(Duration::seconds(6300)), "01:45:00");
        assert_eq!(format_hms(Duration::seconds(59)), "00:00:59");
        assert_eq!(format_hms(Duration::seconds(-3)), "00:00:00");
        assert_eq!(format_hms(Duration::milliseconds(1999)), "00:00:01");
    }

    #[test]
    fn at_today_keeps_the_calendar_day() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let early = at_today(NaiveTime::from_hms_opt(5, 0, 0).unwrap(), now);
        assert_eq!(early.date(), now.date());
        assert!(early < now);
    }
}
