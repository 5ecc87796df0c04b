use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use prayermate::calendar::{DayMark, GridState, Tier};
use prayermate::models::{HijriDay, HijriMonth};
use prayermate::utils::format::fit_width;

use crate::tui::theme;

const CELL_WIDTH: usize = 6;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render(
    frame: &mut Frame,
    area: Rect,
    month: HijriMonth,
    state: &GridState,
    days: &[HijriDay],
    marks: &[DayMark],
    selected: NaiveDate,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(7 * CELL_WIDTH as u16 + 4), Constraint::Min(24)])
        .split(area);

    render_grid(frame, chunks[0], month, state, days, marks);
    render_day_info(frame, chunks[1], days, marks, selected);
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    month: HijriMonth,
    state: &GridState,
    days: &[HijriDay],
    marks: &[DayMark],
) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", month), theme::gold().add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    let mut lines = vec![
        Line::from(
            WEEKDAYS
                .iter()
                .map(|d| Span::styled(fit_width(&format!(" {}", d), CELL_WIDTH), theme::dim()))
                .collect::<Vec<_>>(),
        ),
        Line::from(""),
    ];

    match state {
        GridState::Loading => {
            lines.push(Line::from(Span::styled(" Loading...", theme::dim())));
        }
        GridState::Failed(e) => {
            lines.push(Line::from(Span::styled(" Calendar unavailable", theme::red())));
            lines.push(Line::from(Span::styled(format!(" {}", e), theme::dim())));
        }
        GridState::Ready(_) => lines.extend(week_rows(days, marks)),
    }

    lines.push(Line::from(""));
    lines.push(legend());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn week_rows(days: &[HijriDay], marks: &[DayMark]) -> Vec<Line<'static>> {
    let Some(first) = days.first() else {
        return vec![Line::from(Span::styled(" No days", theme::dim()))];
    };

    let lead = first.gregorian.weekday().num_days_from_sunday() as usize;
    let mut rows = Vec::new();
    let mut row: Vec<Span> = (0..lead)
        .map(|_| Span::raw(" ".repeat(CELL_WIDTH)))
        .collect();

    for (i, day) in days.iter().enumerate() {
        let mark = marks.get(i);
        let mut style = mark.map(|m| theme::tier(m.tier)).unwrap_or_else(theme::dim);
        if mark.is_some_and(|m| m.is_today) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if mark.is_some_and(|m| m.is_selected) {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let marker = if day.holidays.is_empty() { ' ' } else { '*' };
        row.push(Span::styled(format!(" {:>2}{} ", day.hijri.day, marker), style));
        row.push(Span::raw(" "));

        if (lead + i + 1) % 7 == 0 {
            rows.push(Line::from(std::mem::take(&mut row)));
        }
    }
    if !row.is_empty() {
        rows.push(Line::from(row));
    }
    rows
}

fn legend() -> Line<'static> {
    Line::from(vec![
        Span::styled("  5  ", theme::tier(Tier::Full)),
        Span::styled(" all prayed  ", theme::dim()),
        Span::styled(" 3-4 ", theme::tier(Tier::Partial)),
        Span::styled(" partial  ", theme::dim()),
        Span::styled(" 0-2 ", theme::tier(Tier::None)),
    ])
}

fn render_day_info(frame: &mut Frame, area: Rect, days: &[HijriDay], marks: &[DayMark], selected: NaiveDate) {
    let block = Block::default()
        .title(Span::styled(" Day ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let width = area.width.saturating_sub(4) as usize;
    let found = days
        .iter()
        .zip(marks.iter())
        .find(|(d, _)| d.gregorian == selected);

    let lines = match found {
        Some((day, mark)) => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {}", day.hijri.formatted()),
                    theme::gold().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(" {}", day.gregorian.format("%A, %d %B %Y")),
                    theme::dim(),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled(" Prayed ", theme::dim()),
                    Span::styled(format!("{}/5", mark.count), theme::tier(mark.tier)),
                ]),
                Line::from(""),
            ];
            for label in &day.holidays {
                lines.push(Line::from(Span::styled(
                    format!(" * {}", fit_width(label, width.saturating_sub(3))),
                    theme::amber(),
                )));
            }
            lines
        }
        None => vec![
            Line::from(""),
            Line::from(Span::styled(" No day selected", theme::dim())),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
