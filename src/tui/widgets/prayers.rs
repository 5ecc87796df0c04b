use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use prayermate::models::{DayStatus, Prayer, PrayerTimings, UNAVAILABLE_TIME};

use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    status: &DayStatus,
    timings: Option<&PrayerTimings>,
    next: Option<Prayer>,
    focused_idx: usize,
) {
    let block = Block::default()
        .title(Span::styled(
            format!(" Today  {}/5 ", status.completed_count()),
            theme::gold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    let items: Vec<ListItem> = Prayer::ALL
        .iter()
        .enumerate()
        .map(|(i, prayer)| {
            let is_focused = i == focused_idx;

            let time_str = timings
                .and_then(|t| t.usable(*prayer))
                .unwrap_or_else(|| UNAVAILABLE_TIME.to_string());

            let (icon, label, status_style) = if status.is_done(*prayer) {
                ("●", "prayed", theme::green())
            } else if next == Some(*prayer) {
                ("◌", "next", theme::amber())
            } else {
                ("○", "", theme::dim())
            };

            let name_style = if is_focused {
                theme::gold().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            let line = Line::from(vec![
                Span::styled(if is_focused { " ▸" } else { "  " }, theme::gold()),
                Span::styled(format!("{} {:<8}", i + 1, prayer.display_name()), name_style),
                Span::styled(format!("{:<7}", time_str), theme::dim()),
                Span::styled(icon, status_style),
                Span::styled(format!("  {}", label), theme::dim()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
