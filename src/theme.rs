//! Color themes and category badge colors.

use ratatui::style::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Nord-inspired muted colors
    #[default]
    Nord,
    /// Amber CRT, orange text on black
    Amber,
}

impl Theme {
    /// Parse theme name from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "nord" => Ok(Theme::Nord),
            "amber" | "ambercrt" | "amber-crt" => Ok(Theme::Amber),
            _ => Err(format!("Unknown theme '{s}'. Available: nord, amber")),
        }
    }

    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Nord => ColorScheme::nord(),
            Theme::Amber => ColorScheme::amber(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Nord => write!(f, "nord"),
            Theme::Amber => write!(f, "amber"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub text: Color,
    /// Secondary info (numbers, hints)
    pub text_dim: Color,
    pub focus_border: Color,
    pub unfocused_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Favorite marker
    pub favorite: Color,
    pub error: Color,
    pub toast: Color,
}

impl ColorScheme {
    pub fn nord() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::Yellow,
            unfocused_border: Color::Gray,
            selection_bg: Color::Yellow,
            selection_fg: Color::Black,
            favorite: Color::LightRed,
            error: Color::Red,
            toast: Color::Green,
        }
    }

    pub fn amber() -> Self {
        let amber = Color::Rgb(255, 176, 0);
        let amber_bright = Color::Rgb(255, 200, 100);
        let amber_dim = Color::Rgb(180, 120, 0);

        Self {
            text: amber,
            text_dim: amber_dim,
            focus_border: amber_bright,
            unfocused_border: amber_dim,
            selection_bg: amber,
            selection_fg: Color::Black,
            favorite: amber_bright,
            error: Color::Red,
            toast: Color::Rgb(100, 255, 100),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::nord()
    }
}

const CATEGORY_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("Normal", (0xA8, 0xA8, 0x78)),
    ("Feu", (0xF0, 0x80, 0x30)),
    ("Eau", (0x68, 0x90, 0xF0)),
    ("Électrik", (0xF8, 0xD0, 0x30)),
    ("Plante", (0x78, 0xC8, 0x50)),
    ("Glace", (0x98, 0xD8, 0xD8)),
    ("Combat", (0xC0, 0x30, 0x28)),
    ("Poison", (0xA0, 0x40, 0xA0)),
    ("Sol", (0xE0, 0xC0, 0x68)),
    ("Vol", (0xA8, 0x90, 0xF0)),
    ("Psy", (0xF8, 0x58, 0x88)),
    ("Insecte", (0xA8, 0xB8, 0x20)),
    ("Roche", (0xB8, 0xA0, 0x38)),
    ("Spectre", (0x70, 0x58, 0x98)),
    ("Dragon", (0x70, 0x38, 0xF8)),
    ("Ténèbres", (0x70, 0x58, 0x48)),
    ("Acier", (0xB8, 0xB8, 0xD0)),
    ("Fée", (0xEE, 0x99, 0xAC)),
];

/// Badge color for a category name; gray for unknown names.
pub fn category_color(name: &str) -> Color {
    CATEGORY_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, (r, g, b))| Color::Rgb(*r, *g, *b))
        .unwrap_or(Color::Gray)
}
