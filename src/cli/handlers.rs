use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;
use std::str::FromStr;

use prayermate::EngineResult;
use prayermate::calendar::{
    HijriCalendarProvider, HijriConverter, Tier, UmmAlQuraProvider, mark_month,
};
use prayermate::config::AppConfig;
use prayermate::db::SqliteStore;
use prayermate::location::{ConfigGeolocator, Place, locate};
use prayermate::models::{
    Dhikr, HijriDate, HijriDay, HijriMonth, NextPrayer, Prayer, count_for,
};
use prayermate::prayer_times::time::format_hms;
use prayermate::prayer_times::{
    Clock, SalahProvider, Schedule, ScheduleState, SystemClock, Zone, countdown,
};
use prayermate::tracker::{CompletionTracker, MILESTONE, TasbeehCounter};
use prayermate::utils::format::{format_percent, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! print_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        print!("\x1b[0m");
    }};
}

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;201;168;82m";
const UNDERLINE: &str = "\x1b[4m";
const REVERSE: &str = "\x1b[7m";
const BG_FULL: &str = "\x1b[42m";
const BG_PARTIAL: &str = "\x1b[43m";

fn zone(config: &AppConfig) -> Result<Zone> {
    Ok(Zone::from_offset_minutes(config.salah.timezone_offset)?)
}

fn tracker<'c>(
    conn: &'c Connection,
    config: &AppConfig,
) -> Result<CompletionTracker<SqliteStore<'c>, SystemClock>> {
    Ok(CompletionTracker::load(
        SqliteStore::new(conn),
        SystemClock::new(zone(config)?),
    ))
}

fn converter(config: &AppConfig) -> HijriConverter<UmmAlQuraProvider> {
    HijriConverter::new(UmmAlQuraProvider::new(config.salah.hijri_offset))
}

/// The configured place, or the fallback with a note on why.
fn current_place(config: &AppConfig) -> Place {
    let located = locate(&ConfigGeolocator::new(config.location.clone()), &Place::default());
    if let Some(reason) = &located.fallback_reason {
        println_colored!(DIM, "  {} (using {})", reason, located.place.label());
    }
    located.place
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(config: &AppConfig) -> Result<()> {
    let zone = zone(config)?;
    let now = SystemClock::new(zone).now();
    let place = current_place(config);

    let provider = SalahProvider::new(&config.salah.calc_method, &config.salah.madhab, zone)?;
    let mut schedule = Schedule::in_zone(zone);
    schedule.refresh(&provider, &place, now.date());

    println!();
    println_colored!(GOLD, "  Prayer Times · {} ({})", place.label(), now.date());
    println!();

    let timings = match schedule.state() {
        ScheduleState::Ready(timings) => timings,
        ScheduleState::Failed(e) => {
            println_colored!(RED, "  ✗ {}", e);
            println!();
            return Ok(());
        }
        ScheduleState::Loading => return Ok(()),
    };

    let next = schedule.next_prayer(now);
    for prayer in Prayer::ALL {
        let time = timings.usable(prayer).unwrap_or_else(|| "--:--".to_string());
        if next.prayer() == Some(prayer) {
            println_colored!(AMBER, "  {:<10}  {}  ◂", prayer.display_name(), time);
        } else if time.as_str() < now.format("%H:%M").to_string().as_str() {
            println_colored!(DIM, "  {:<10}  {}", prayer.display_name(), time);
        } else {
            let left = countdown(&time, now, zone).map(format_hms).unwrap_or_default();
            println_colored!(BOLD, "  {:<10}  {}  {}", prayer.display_name(), time, left);
        }
    }

    if let Some(mut ticker) = schedule.ticker(now) {
        let tick = ticker.tick(now);
        if let NextPrayer::Upcoming { prayer, time } = &tick.next {
            println!();
            println_colored!(
                AMBER,
                "  Next: {} at {} in {}",
                prayer.display_name(),
                time,
                tick.display
            );
        }
    }
    println!();
    Ok(())
}

// ─── Checklist ───────────────────────────────────────────────────────────────

pub fn handle_mark(conn: &Connection, config: &AppConfig, prayer_str: &str) -> Result<()> {
    let prayer = Prayer::from_str(prayer_str)
        .map_err(|_| anyhow!("Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha", prayer_str))?;

    let mut tracker = tracker(conn, config)?;
    let done = tracker.toggle(prayer)?;
    if done {
        println_colored!(GREEN, "  ✓ {} marked as prayed", prayer.display_name());
    } else {
        println_colored!(DIM, "  ○ {} unmarked", prayer.display_name());
    }
    println_colored!(
        DIM,
        "  Today: {}/5 ({})",
        tracker.completed_count(),
        format_percent(tracker.completion_percent())
    );
    Ok(())
}

pub fn handle_reset(conn: &Connection, config: &AppConfig) -> Result<()> {
    let mut tracker = tracker(conn, config)?;
    tracker.reset_today()?;
    println_colored!(AMBER, "  Cleared today's checklist ({})", tracker.today_key());
    Ok(())
}

pub fn handle_status(conn: &Connection, config: &AppConfig) -> Result<()> {
    let tracker = tracker(conn, config)?;
    let status = tracker.status();

    println!();
    println_colored!(GOLD, "  Today · {}", tracker.today_key());
    println!();
    for prayer in Prayer::ALL {
        if status.is_done(prayer) {
            println_colored!(GREEN, "  ● {}", prayer.display_name());
        } else {
            println_colored!(DIM, "  ○ {}", prayer.display_name());
        }
    }
    println!();
    println_colored!(
        BOLD,
        "  {}  {}/5  {}",
        progress_bar(tracker.completed_count() as u32, 5, 10),
        tracker.completed_count(),
        format_percent(tracker.completion_percent())
    );
    println!();
    Ok(())
}

pub fn handle_history(conn: &Connection, config: &AppConfig, days: Option<usize>) -> Result<()> {
    let tracker = tracker(conn, config)?;
    let summary = tracker.summary();

    println!();
    if summary.is_empty() {
        println_colored!(DIM, "  No days recorded yet");
        println!();
        return Ok(());
    }

    println_colored!(GOLD, "  Prayer History");
    println!();
    for day in summary.iter().take(days.unwrap_or(usize::MAX)) {
        let color = match day.prayers_done {
            5 => GREEN,
            3 | 4 => AMBER,
            _ => DIM,
        };
        println_colored!(
            color,
            "  {}  {}  {}/5",
            day.date,
            progress_bar(day.prayers_done as u32, 5, 5),
            day.prayers_done
        );
    }
    println!();
    Ok(())
}

pub fn handle_stats(conn: &Connection, config: &AppConfig) -> Result<()> {
    let tracker = tracker(conn, config)?;
    let streak = tracker.streak();
    let today = tracker.clock().today();

    println!();
    println_colored!(GOLD, "  Statistics");
    println!();
    println_colored!(
        BOLD,
        "  Streak:      {} days current  |  {} days best",
        streak.current,
        streak.best
    );
    println!("  Days logged: {}", tracker.history().len());

    println!();
    println_colored!(DIM, "  Last 7 days  (● = 5/5, ◕ = 3-4, ◑ = 1-2, ○ = 0/5)");
    println!();
    print!("  ");
    for offset in (0..7).rev() {
        let key = (today - Duration::days(offset)).format("%Y-%m-%d").to_string();
        let icon = match count_for(tracker.history(), &key) {
            5 => format!("{}●\x1b[0m ", GREEN),
            3 | 4 => format!("{}◕\x1b[0m ", AMBER),
            1 | 2 => format!("{}◑\x1b[0m ", AMBER),
            _ => format!("{}○\x1b[0m ", DIM),
        };
        print!("{}", icon);
    }
    println!();
    println!();
    Ok(())
}

// ─── Calendar ────────────────────────────────────────────────────────────────

pub fn handle_calendar(
    conn: &Connection,
    config: &AppConfig,
    year: Option<u32>,
    month: Option<u32>,
    select: Option<&str>,
    gregorian: bool,
) -> Result<()> {
    let converter = converter(config);
    let tracker = tracker(conn, config)?;
    let today = tracker.clock().today();

    let selected = match select {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("'{}' is not a date (use YYYY-MM-DD)", raw))?,
        None => today,
    };

    let (title, grid) = if gregorian {
        gregorian_grid(&converter, year, month, selected)
    } else {
        hijri_grid(&converter, &current_place(config), year, month, selected)
    };

    println!();
    println_colored!(GOLD, "  {}", title);
    println!();

    let days = match grid {
        Ok(days) if !days.is_empty() => days,
        Ok(_) => {
            println_colored!(DIM, "  No days to show");
            println!();
            return Ok(());
        }
        Err(e) => {
            log::warn!("{}", e);
            println_colored!(RED, "  ✗ Calendar unavailable: {}", e);
            println!();
            return Ok(());
        }
    };

    // Without today's Hijri date no cell is highlighted as today.
    let today_hijri = converter.gregorian_to_hijri(today).unwrap_or_else(|e| {
        log::warn!("{}", e);
        HijriDate {
            day: 0,
            month: 0,
            year: 0,
        }
    });
    let marks = mark_month(&days, tracker.history(), today_hijri, selected);

    println_colored!(DIM, "  Sun   Mon   Tue   Wed   Thu   Fri   Sat");

    let lead = days
        .first()
        .map(|d| d.gregorian.weekday().num_days_from_sunday() as usize)
        .unwrap_or(0);
    print!("  {}", "      ".repeat(lead));
    for (i, (day, mark)) in days.iter().zip(&marks).enumerate() {
        let mut style = String::new();
        match mark.tier {
            Tier::Full => style.push_str(BG_FULL),
            Tier::Partial => style.push_str(BG_PARTIAL),
            Tier::None => {}
        }
        if mark.is_today {
            style.push_str(BOLD);
            style.push_str(UNDERLINE);
        }
        if mark.is_selected {
            style.push_str(REVERSE);
        }
        let marker = if day.holidays.is_empty() { ' ' } else { '*' };
        let number = if gregorian { day.gregorian.day() } else { day.hijri.day };
        print_colored!(style, " {:>2}{} ", number, marker);
        print!(" ");
        if (lead + i + 1) % 7 == 0 {
            print!("\n  ");
        }
    }
    println!();
    println!();
    print_colored!(BG_FULL, " 5 ");
    print!(" all prayed  ");
    print_colored!(BG_PARTIAL, " 3-4 ");
    println!(" partial  * observance");

    let observances: Vec<_> = days.iter().filter(|d| !d.holidays.is_empty()).collect();
    if !observances.is_empty() {
        println!();
        for day in observances {
            println_colored!(
                AMBER,
                "  {}  {}  {}",
                day.hijri.formatted(),
                day.gregorian.format("%a %d %b"),
                day.holidays.join(" · ")
            );
        }
    }

    if let Some((day, mark)) = days.iter().zip(&marks).find(|(d, _)| d.gregorian == selected) {
        println!();
        println_colored!(BOLD, "  {}  ({})", day.hijri.formatted(), day.gregorian);
        println!("  Prayed {}/5", mark.count);
    }
    println!();
    Ok(())
}

/// Title and days of a Hijri month, defaulting to the month holding `selected`.
/// A failed lookup is handed back with the grid rather than raised.
fn hijri_grid<P: HijriCalendarProvider>(
    converter: &HijriConverter<P>,
    place: &Place,
    year: Option<u32>,
    month: Option<u32>,
    selected: NaiveDate,
) -> (String, EngineResult<Vec<HijriDay>>) {
    let month = match (year, month) {
        (Some(y), Some(m)) => Ok(HijriMonth::new(y, m)),
        _ => converter.current_month(selected).map(|anchor| {
            HijriMonth::new(year.unwrap_or(anchor.year), month.unwrap_or(anchor.month))
        }),
    };
    match month {
        Ok(month) => (month.to_string(), converter.month_grid(month, place)),
        Err(e) => ("Hijri calendar".to_string(), Err(e)),
    }
}

fn gregorian_grid<P: HijriCalendarProvider>(
    converter: &HijriConverter<P>,
    year: Option<u32>,
    month: Option<u32>,
    selected: NaiveDate,
) -> (String, EngineResult<Vec<HijriDay>>) {
    let year = year.map_or(selected.year(), |y| y as i32);
    let month = month.unwrap_or(selected.month());
    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map_or_else(|| format!("{}-{:02}", year, month), |d| d.format("%B %Y").to_string());
    (title, converter.gregorian_month(month, year))
}

// ─── Tasbeeh ─────────────────────────────────────────────────────────────────

pub fn handle_tasbeeh_show(conn: &Connection) -> Result<()> {
    let counter = TasbeehCounter::load(SqliteStore::new(conn));
    print_tasbeeh(counter.selected(), counter.count());
    Ok(())
}

pub fn handle_tasbeeh_count(conn: &Connection, times: u32) -> Result<()> {
    let mut counter = TasbeehCounter::load(SqliteStore::new(conn));
    for _ in 0..times {
        if counter.increment()? {
            println_colored!(GREEN, "  ✦ {} × {}", counter.selected(), counter.count());
        }
    }
    print_tasbeeh(counter.selected(), counter.count());
    Ok(())
}

pub fn handle_tasbeeh_select(conn: &Connection, name: &str) -> Result<()> {
    let dhikr = Dhikr::from_str(name).map_err(|_| {
        anyhow!(
            "Unknown dhikr '{}'. Use: {}",
            name,
            Dhikr::ALL.map(|d| d.id()).join(", ")
        )
    })?;
    let mut counter = TasbeehCounter::load(SqliteStore::new(conn));
    counter.select(dhikr)?;
    print_tasbeeh(counter.selected(), counter.count());
    Ok(())
}

pub fn handle_tasbeeh_reset(conn: &Connection) -> Result<()> {
    let mut counter = TasbeehCounter::load(SqliteStore::new(conn));
    counter.reset()?;
    print_tasbeeh(counter.selected(), counter.count());
    Ok(())
}

fn print_tasbeeh(dhikr: Dhikr, count: u32) {
    println_colored!(GOLD, "  {}  {}", dhikr, count);
    println_colored!(
        DIM,
        "  {} to next {}",
        MILESTONE - count % MILESTONE,
        MILESTONE
    );
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub method: Option<String>,
    pub madhab: Option<String>,
    pub hijri_offset: Option<i32>,
}

pub fn handle_config(config: &mut AppConfig, update: ConfigUpdate) -> Result<()> {
    let mut changed = false;
    if let Some(city) = update.city {
        config.location.city = Some(city);
        changed = true;
    }
    if let Some(country) = update.country {
        config.location.country = Some(country);
        changed = true;
    }
    if let Some(lat) = update.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(anyhow!("Latitude must be between -90 and 90"));
        }
        config.location.latitude = Some(lat);
        changed = true;
    }
    if let Some(lng) = update.longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(anyhow!("Longitude must be between -180 and 180"));
        }
        config.location.longitude = Some(lng);
        changed = true;
    }
    if let Some(tz) = update.timezone {
        config.salah.timezone_offset = parse_tz_setting(&tz)?;
        changed = true;
    }
    if let Some(method) = update.method {
        SalahProvider::new(&method, &config.salah.madhab, zone(config)?)?;
        config.salah.calc_method = method;
        changed = true;
    }
    if let Some(madhab) = update.madhab {
        SalahProvider::new(&config.salah.calc_method, &madhab, zone(config)?)?;
        config.salah.madhab = madhab;
        changed = true;
    }
    if let Some(offset) = update.hijri_offset {
        config.salah.hijri_offset = offset;
        changed = true;
    }

    if changed {
        config.save()?;
        println_colored!(GREEN, "  ✓ Configuration saved");
    }

    println!();
    println_colored!(DIM, "  {}", AppConfig::config_path()?.display());
    println!();
    println!(
        "  Location:  {}, {} ({}, {})",
        config.location.city.as_deref().unwrap_or("?"),
        config.location.country.as_deref().unwrap_or("?"),
        format_coord(config.location.latitude),
        format_coord(config.location.longitude)
    );
    println!("  Method:    {} ({})", config.salah.calc_method, config.salah.madhab);
    println!("  UTC:       {}", format_tz_setting(config.salah.timezone_offset));
    println!("  Hijri:     {:+} days", config.salah.hijri_offset);
    println!();
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `"local"` follows the system zone; anything else must be a valid offset.
fn parse_tz_setting(s: &str) -> Result<Option<i32>> {
    if s.trim().eq_ignore_ascii_case("local") {
        return Ok(None);
    }
    let minutes = parse_tz_offset(s).with_context(|| format!("Invalid UTC offset '{}'", s))?;
    Zone::from_offset_minutes(Some(minutes))?;
    Ok(Some(minutes))
}

fn format_tz_setting(minutes: Option<i32>) -> String {
    minutes.map_or_else(|| "local (system zone)".to_string(), format_tz_offset)
}

/// Parse a UTC offset string into total minutes.
/// Accepts: "5:30", "+5:30", "-5:30", "5", "+5", "5.5"
fn parse_tz_offset(s: &str) -> Result<i32> {
    let s = s.trim().trim_start_matches('+');
    let negative = s.starts_with('-');
    let s = s.trim_start_matches('-');
    let sign = if negative { -1 } else { 1 };

    let minutes = if let Some((hours, mins)) = s.split_once(':') {
        let hours: i32 = hours.parse()?;
        let mins: i32 = mins.parse()?;
        hours * 60 + mins
    } else if s.contains('.') {
        let hours: f64 = s.parse()?;
        (hours * 60.0).round() as i32
    } else {
        let hours: i32 = s.parse()?;
        hours * 60
    };

    Ok(sign * minutes)
}

fn format_coord(value: Option<f64>) -> String {
    value.map_or_else(|| "unset".to_string(), |v| format!("{:.4}", v))
}

/// Format total minutes as "+H:MM"
fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { "-" } else { "+" };
    let abs = minutes.abs();
    let (h, m) = (abs / 60, abs % 60);
    if m == 0 {
        format!("{}{}", sign, h)
    } else {
        format!("{}{}:{:02}", sign, h, m)
    }
}
