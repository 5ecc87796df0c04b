use ratatui::style::{Color, Modifier, Style};

use prayermate::calendar::Tier;

pub const BG: Color = Color::Rgb(14, 18, 20);
pub const SURFACE: Color = Color::Rgb(22, 28, 31);
pub const BORDER: Color = Color::Rgb(44, 58, 62);
pub const TEXT: Color = Color::Rgb(222, 228, 224);
pub const TEXT_DIM: Color = Color::Rgb(112, 128, 126);
pub const GOLD: Color = Color::Rgb(201, 168, 82);
pub const GREEN: Color = Color::Rgb(76, 160, 110);
pub const AMBER: Color = Color::Rgb(214, 146, 62);
pub const RED: Color = Color::Rgb(186, 84, 70);

// Calendar legend: all five, three or four, fewer.
pub const TIER_FULL: Color = Color::Rgb(46, 125, 80);
pub const TIER_PARTIAL: Color = Color::Rgb(168, 124, 44);
pub const TIER_NONE: Color = Color::Rgb(34, 42, 46);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn tier(tier: Tier) -> Style {
    let bg = match tier {
        Tier::Full => TIER_FULL,
        Tier::Partial => TIER_PARTIAL,
        Tier::None => TIER_NONE,
    };
    Style::default().fg(TEXT).bg(bg)
}
