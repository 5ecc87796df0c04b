use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use prayermate::prayer_times::{ScheduleState, Tick};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, state: &ScheduleState, tick: Option<&Tick>) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match (state, tick) {
        (_, Some(tick)) => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("  {}", tick.next.name().to_uppercase()),
                    theme::gold().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", tick.next.time()), theme::dim()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  starts in  ", theme::dim()),
                Span::styled(
                    tick.display.clone(),
                    theme::amber().add_modifier(Modifier::BOLD),
                ),
            ]),
        ],
        (ScheduleState::Failed(e), None) => vec![
            Line::from(""),
            Line::from(Span::styled("  Prayer times unavailable", theme::red())),
            Line::from(Span::styled(format!("  {}", e), theme::dim())),
            Line::from(Span::styled("  [r] retry", theme::dim())),
        ],
        _ => vec![
            Line::from(""),
            Line::from(Span::styled("  Loading prayer times...", theme::dim())),
        ],
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
