use ratatui::style::Color;

use crate::calendar::parse_hex_color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub title: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub today: Color,
    pub event_fallback: Color,
    pub weekday_header: Color,
    pub inactive_day: Color,
    pub hour_grid: Color,
    pub status_bar: Color,
    pub help_title: Color,
    pub help_section: Color,
    pub command_mode: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            title: Color::Cyan,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            today: Color::Green,
            event_fallback: Color::Rgb(26, 115, 232),
            weekday_header: Color::Yellow,
            inactive_day: Color::DarkGray,
            hour_grid: Color::DarkGray,
            status_bar: Color::White,
            help_title: Color::Cyan,
            help_section: Color::Yellow,
            command_mode: Color::White,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            title: Color::Rgb(250, 189, 47),
            selected_bg: Color::Rgb(80, 73, 69),
            selected_fg: Color::Rgb(251, 241, 199),
            today: Color::Rgb(184, 187, 38),
            event_fallback: Color::Rgb(131, 165, 152),
            weekday_header: Color::Rgb(254, 128, 25),
            inactive_day: Color::Rgb(124, 111, 100),
            hour_grid: Color::Rgb(102, 92, 84),
            status_bar: Color::Rgb(235, 219, 178),
            help_title: Color::Rgb(250, 189, 47),
            help_section: Color::Rgb(254, 128, 25),
            command_mode: Color::Rgb(235, 219, 178),
            error: Color::Rgb(251, 73, 52),
            warning: Color::Rgb(250, 189, 47),
            success: Color::Rgb(184, 187, 38),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            title: Color::Rgb(136, 192, 208),
            selected_bg: Color::Rgb(67, 76, 94),
            selected_fg: Color::Rgb(236, 239, 244),
            today: Color::Rgb(163, 190, 140),
            event_fallback: Color::Rgb(94, 129, 172),
            weekday_header: Color::Rgb(235, 203, 139),
            inactive_day: Color::Rgb(76, 86, 106),
            hour_grid: Color::Rgb(59, 66, 82),
            status_bar: Color::Rgb(216, 222, 233),
            help_title: Color::Rgb(136, 192, 208),
            help_section: Color::Rgb(235, 203, 139),
            command_mode: Color::Rgb(216, 222, 233),
            error: Color::Rgb(191, 97, 106),
            warning: Color::Rgb(208, 135, 112),
            success: Color::Rgb(163, 190, 140),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Some(Self::default_theme()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            _ => None,
        }
    }

    pub fn get_by_name(name: &str) -> Self {
        Self::by_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown theme {:?}, using default", name);
            Self::default_theme()
        })
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "gruvbox", "nord"]
    }

    /// Terminal colour for a calendar's `#RRGGBB` colour.
    pub fn calendar_color(&self, hex: Option<&str>) -> Color {
        hex.and_then(parse_hex_color)
            .map(|(r, g, b)| Color::Rgb(r, g, b))
            .unwrap_or(self.event_fallback)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
