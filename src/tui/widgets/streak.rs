use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use prayermate::models::Streak;
use prayermate::utils::format::{format_percent, progress_bar};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, completed: u8, percent: f64, streak: &Streak) {
    let block = Block::default()
        .title(Span::styled(" Progress ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let today_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(progress_bar(completed as u32, 5, 10), theme::green()),
        Span::styled(
            format!("  {}", format_percent(percent)),
            theme::green().add_modifier(Modifier::BOLD),
        ),
    ]);

    let streak_line = Line::from(vec![Span::styled(
        format!("  Streak: {} days  ·  Best: {}", streak.current, streak.best),
        theme::dim(),
    )]);

    let text = vec![Line::from(""), today_line, Line::from(""), streak_line];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
