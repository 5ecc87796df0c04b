use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use prayermate::models::TasbeehState;
use prayermate::tracker::MILESTONE;

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, state: &TasbeehState) {
    let block = Block::default()
        .title(Span::styled(" Tasbeeh ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let into_round = state.count % MILESTONE;
    let text = vec![
        Line::from(vec![
            Span::styled(format!("  {}", state.selected.label()), theme::amber()),
            Span::styled(
                format!("  {}", state.count),
                theme::gold().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {}{}", "●".repeat(into_round as usize), "○".repeat((MILESTONE - into_round) as usize)),
            theme::green(),
        )),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}
