use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::View;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, view: &View, message: Option<&str>) {
    if let Some(message) = message {
        let paragraph = Paragraph::new(Line::from(Span::styled(message, theme::amber())))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let hints: &[(&str, &str)] = match view {
        View::Calendar => &[
            ("[← →]", " day  "),
            ("[↑ ↓]", " week  "),
            ("[p n]", " month  "),
            ("[t]", " today  "),
            ("[Esc]", " back"),
        ],
        _ => &[
            ("[1-5]", " toggle  "),
            ("[Enter]", " toggle focused  "),
            ("[R]", " reset day  "),
            ("[c]", " calendar  "),
            ("[r]", " retry  "),
            ("[?]", " help  "),
            ("[q]", " quit"),
        ],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(*key, theme::gold()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
