use chrono::NaiveDate;

use crate::models::{DailyStats, History, Prayer, Streak};

/// Days in the history, newest first, with how many prayers were completed.
pub fn daily_summary(history: &History) -> Vec<DailyStats> {
    history
        .iter()
        .rev()
        .map(|(date, status)| DailyStats {
            date: date.clone(),
            prayers_done: status.completed_count(),
        })
        .collect()
}

/// Current and best runs of fully completed days.
///
/// The current run ends today when today is complete, otherwise yesterday:
/// an unfinished today does not break the streak yet.
pub fn calculate_streak(history: &History, today: NaiveDate) -> Streak {
    let full_days: Vec<NaiveDate> = history
        .iter()
        .filter(|(_, status)| status.completed_count() as usize == Prayer::ALL.len())
        .filter_map(|(date, _)| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .collect();

    let mut check_date = if full_days.contains(&today) {
        today
    } else {
        today.pred_opt().unwrap_or(today)
    };
    let mut current = 0u32;
    while full_days.contains(&check_date) {
        current += 1;
        match check_date.pred_opt() {
            Some(prev) => check_date = prev,
            None => break,
        }
    }

    Streak {
        current,
        best: calculate_best_streak(full_days),
    }
}

fn calculate_best_streak(mut dates: Vec<NaiveDate>) -> u32 {
    if dates.is_empty() {
        return 0;
    }
    dates.sort();

    let mut best = 0u32;
    let mut current = 1u32;

    for i in 1..dates.len() {
        let prev = dates[i - 1];
        let curr = dates[i];
        if prev.succ_opt() == Some(curr) {
            current += 1;
        } else {
            current = 1;
        }
        best = best.max(current);
    }
    best.max(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayStatus;

    fn full() -> DayStatus {
        DayStatus {
            fajr: true,
            dhuhr: true,
            asr: true,
            maghrib: true,
            isha: true,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn summary_is_newest_first() {
        let mut history = History::new();
        history.insert("2025-03-01".into(), full());
        history.insert("2025-03-03".into(), DayStatus::default());
        let summary = daily_summary(&history);
        assert_eq!(summary[0].date, "2025-03-03");
        assert_eq!(summary[0].prayers_done, 0);
        assert_eq!(summary[1].prayers_done, 5);
    }

    #[test]
    fn unfinished_today_keeps_yesterdays_streak() {
        let mut history = History::new();
        for d in ["2025-03-07", "2025-03-08", "2025-03-09"] {
            history.insert(d.into(), full());
        }
        history.insert("2025-03-10".into(), DayStatus::default());
        let streak = calculate_streak(&history, date("2025-03-10"));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.best, 3);
    }

    #[test]
    fn gap_breaks_current_but_not_best() {
        let mut history = History::new();
        for d in ["2025-02-01", "2025-02-02", "2025-02-03", "2025-02-04", "2025-03-10"] {
            history.insert(d.into(), full());
        }
        let streak = calculate_streak(&history, date("2025-03-10"));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.best, 4);
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(
            calculate_streak(&History::new(), date("2025-03-10")),
            Streak::default()
        );
    }
}
