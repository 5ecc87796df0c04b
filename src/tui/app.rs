use anyhow::Result;
use chrono::{Duration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;

use prayermate::calendar::{HijriConverter, MonthNavigator, UmmAlQuraProvider, mark_now};
use prayermate::config::AppConfig;
use prayermate::db::SqliteStore;
use prayermate::location::{ConfigGeolocator, Place, locate};
use prayermate::models::{Dhikr, HijriMonth, Prayer};
use prayermate::prayer_times::{Clock, SalahProvider, Schedule, SystemClock, Tick, Ticker, Zone};
use prayermate::tracker::{CompletionTracker, TasbeehCounter};

use crate::tui::events::{Event, EventHandler, TICK_RATE};
use crate::tui::theme;
use crate::tui::widgets::{calendar, header, next_prayer, prayers, statusbar, streak, tasbeeh};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Calendar,
    Help,
}

pub struct App<'c> {
    pub view: View,
    pub should_quit: bool,
    pub focus_idx: usize,
    pub status_message: Option<String>,

    conn: &'c Connection,
    config: AppConfig,
    place: Place,
    provider: SalahProvider,
    schedule: Schedule,
    ticker: Option<Ticker>,
    last_tick: Option<Tick>,
    tracker: CompletionTracker<SqliteStore<'c>, SystemClock>,
    tasbeeh: TasbeehCounter<SqliteStore<'c>>,
    converter: HijriConverter<UmmAlQuraProvider>,
    navigator: MonthNavigator,
    selected_date: NaiveDate,
    today: NaiveDate,
    hijri_str: String,
}

impl<'c> App<'c> {
    pub fn new(conn: &'c Connection, config: AppConfig) -> Result<Self> {
        let zone = Zone::from_offset_minutes(config.salah.timezone_offset)?;
        let clock = SystemClock::new(zone);
        let today = clock.today();

        let located = locate(&ConfigGeolocator::new(config.location.clone()), &Place::default());
        let status_message = located
            .fallback_reason
            .as_ref()
            .map(|e| format!("{} (showing {})", e, located.place.label()));

        let provider = SalahProvider::new(
            &config.salah.calc_method,
            &config.salah.madhab,
            zone,
        )?;
        let converter = HijriConverter::new(UmmAlQuraProvider::new(config.salah.hijri_offset));

        let current_month = converter.current_month(today)?;
        let navigator = if config.calendar.remember_last_month {
            MonthNavigator::restore(&SqliteStore::new(conn), current_month)
        } else {
            MonthNavigator::new(current_month)
        };

        let mut app = App {
            view: View::Dashboard,
            should_quit: false,
            focus_idx: 0,
            status_message,
            conn,
            place: located.place,
            provider,
            schedule: Schedule::in_zone(zone),
            ticker: None,
            last_tick: None,
            tracker: CompletionTracker::load(SqliteStore::new(conn), clock),
            tasbeeh: TasbeehCounter::load(SqliteStore::new(conn)),
            converter,
            navigator,
            selected_date: today,
            today,
            hijri_str: String::new(),
            config,
        };
        app.refresh_day(today);
        Ok(app)
    }

    /// Recompute everything keyed by the calendar day.
    fn refresh_day(&mut self, today: NaiveDate) {
        self.today = today;
        self.hijri_str = match self.converter.gregorian_to_hijri(today) {
            Ok(hijri) => hijri.formatted(),
            Err(e) => {
                log::warn!("{}", e);
                String::from("Hijri date unavailable")
            }
        };
        self.schedule.refresh(&self.provider, &self.place, today);
        self.restart_countdown();
    }

    fn restart_countdown(&mut self) {
        let now = self.tracker.clock().now();
        self.ticker = self.schedule.ticker(now);
        self.last_tick = self.ticker.as_mut().map(|t| t.tick(now));
    }

    pub fn tick(&mut self) {
        let now = self.tracker.clock().now();
        if now.date() != self.today {
            log::info!("day changed to {}", now.date());
            self.refresh_day(now.date());
            return;
        }
        if let Some(ticker) = self.ticker.as_mut() {
            let tick = ticker.tick(now);
            if tick.rolled_over {
                log::info!("countdown moved on to {}", tick.next.name());
            }
            self.last_tick = Some(tick);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses; some terminals also report release/repeat
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Calendar => self.handle_calendar_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        self.status_message = None;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('c') => {
                self.open_calendar();
            }
            KeyCode::Char('r') => {
                self.schedule.retry(&self.provider);
                self.restart_countdown();
            }
            KeyCode::Char('R') => {
                if let Err(e) = self.tracker.reset_today() {
                    self.status_message = Some(e.to_string());
                }
            }
            KeyCode::Up => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < Prayer::ALL.len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => {
                self.toggle(Prayer::ALL[self.focus_idx]);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as u8 - b'1') as usize;
                self.focus_idx = idx;
                self.toggle(Prayer::ALL[idx]);
            }
            KeyCode::Char('+') => match self.tasbeeh.increment() {
                Ok(true) => {
                    self.status_message = Some(format!("{} × {}", self.tasbeeh.selected(), self.tasbeeh.count()));
                }
                Ok(false) => {}
                Err(e) => self.status_message = Some(e.to_string()),
            },
            KeyCode::Char('d') => {
                let current = self.tasbeeh.selected();
                let pos = Dhikr::ALL.iter().position(|d| *d == current).unwrap_or(0);
                let next = Dhikr::ALL[(pos + 1) % Dhikr::ALL.len()];
                if let Err(e) = self.tasbeeh.select(next) {
                    self.status_message = Some(e.to_string());
                }
            }
            KeyCode::Char('0') => {
                if let Err(e) = self.tasbeeh.reset() {
                    self.status_message = Some(e.to_string());
                }
            }
            _ => {}
        }
    }

    fn toggle(&mut self, prayer: Prayer) {
        if let Err(e) = self.tracker.toggle(prayer) {
            self.status_message = Some(format!("Not saved: {}", e));
        }
    }

    fn open_calendar(&mut self) {
        self.view = View::Calendar;
        if self.navigator.grid().is_empty() {
            self.load_month();
        }
    }

    /// Fetch the navigator's month, keep the selection inside it and
    /// remember it for next time.
    fn load_month(&mut self) {
        self.navigator.load(&self.converter, &self.place);
        let grid = self.navigator.grid();
        if !grid.iter().any(|d| d.gregorian == self.selected_date) {
            let today_in_grid = grid.iter().any(|d| d.gregorian == self.today);
            self.selected_date = if today_in_grid {
                self.today
            } else {
                grid.first().map(|d| d.gregorian).unwrap_or(self.selected_date)
            };
        }
        if self.config.calendar.remember_last_month {
            let mut store = SqliteStore::new(self.conn);
            if let Err(e) = self.navigator.remember(&mut store) {
                log::warn!("could not remember calendar month: {}", e);
            }
        }
    }

    fn change_month(&mut self, forward: bool) {
        if forward {
            self.navigator.next();
        } else {
            self.navigator.prev();
        }
        self.load_month();
    }

    fn move_selection(&mut self, days: i64) {
        let target = self.selected_date + Duration::days(days);
        let grid = self.navigator.grid();
        if grid.iter().any(|d| d.gregorian == target) {
            self.selected_date = target;
            return;
        }
        if grid.is_empty() {
            return;
        }
        self.change_month(days > 0);
        if self.navigator.grid().iter().any(|d| d.gregorian == target) {
            self.selected_date = target;
        }
    }

    fn jump_to_today(&mut self) {
        match self.converter.current_month(self.today) {
            Ok(month) => {
                self.selected_date = self.today;
                if month != self.navigator.selected() {
                    self.navigator.jump_to(month);
                    self.load_month();
                }
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        self.status_message = None;
        match key.code {
            KeyCode::Esc | KeyCode::Char('c') => {
                self.view = View::Dashboard;
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-7),
            KeyCode::Down => self.move_selection(7),
            KeyCode::PageDown | KeyCode::Char('n') => self.change_month(true),
            KeyCode::PageUp | KeyCode::Char('p') => self.change_month(false),
            KeyCode::Char('t') => self.jump_to_today(),
            KeyCode::Enter => {
                let labels = self
                    .navigator
                    .grid()
                    .iter()
                    .find(|d| d.gregorian == self.selected_date)
                    .map(|d| d.holidays.join(" · "))
                    .unwrap_or_default();
                self.status_message = Some(if labels.is_empty() {
                    "No observances on this day".to_string()
                } else {
                    labels
                });
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], self.today, &self.hijri_str, &self.place.label());
        statusbar::render(frame, outer_chunks[2], &self.view, self.status_message.as_deref());

        match self.view {
            View::Dashboard => self.draw_dashboard(frame, outer_chunks[1]),
            View::Calendar => self.draw_calendar(frame, outer_chunks[1]),
            View::Help => {
                self.draw_dashboard(frame, outer_chunks[1]);
                self.draw_help_overlay(frame);
            }
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame, body: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Length(4), Constraint::Min(0)])
            .split(columns[0]);

        let next = self.last_tick.as_ref().and_then(|t| t.next.prayer());
        prayers::render(
            frame,
            left_chunks[0],
            &self.tracker.status(),
            self.schedule.timings(),
            next,
            self.focus_idx,
        );
        tasbeeh::render(frame, left_chunks[1], self.tasbeeh.state());

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Length(6), Constraint::Min(0)])
            .split(columns[1]);

        next_prayer::render(frame, right_chunks[0], self.schedule.state(), self.last_tick.as_ref());
        streak::render(
            frame,
            right_chunks[1],
            self.tracker.completed_count(),
            self.tracker.completion_percent(),
            &self.tracker.streak(),
        );
    }

    fn draw_calendar(&self, frame: &mut Frame, body: Rect) {
        let days = self.navigator.grid();
        let marks = mark_now(
            &self.converter,
            self.tracker.clock(),
            days,
            self.tracker.history(),
            self.selected_date,
        )
        .unwrap_or_default();
        let month: HijriMonth = self.navigator.selected();
        calendar::render(
            frame,
            body,
            month,
            self.navigator.state(),
            days,
            &marks,
            self.selected_date,
        );
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 6,
            width: area.width / 2,
            height: (area.height * 2 / 3).min(20),
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[1-5]        ", "Toggle a prayer"),
            ("[Enter] [m]  ", "Toggle focused prayer"),
            ("[↑ ↓]        ", "Move focus"),
            ("[R]          ", "Reset today"),
            ("[r]          ", "Retry prayer times"),
            ("[+]          ", "Count tasbeeh"),
            ("[d]          ", "Next dhikr"),
            ("[0]          ", "Reset tasbeeh"),
            ("[c]          ", "Hijri calendar"),
            ("[?]          ", "Toggle help"),
            ("[Esc] [q]    ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        help_text.extend(bindings.iter().map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("  {}", key), theme::gold()),
                Span::styled(*what, theme::dim()),
            ])
        }));

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(&conn, config)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(TICK_RATE);

    let outcome: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Tick) => app.tick(),
            Ok(Event::Resize) => {}
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    outcome
}
