use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub accent: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_omitted: String,
    pub text_pending: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

/// "#rrggbb" to a ratatui Color; anything unparsable falls back to Reset so
/// a broken user theme degrades instead of panicking.
fn color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    // Non-ASCII input would make the byte slices below split a char.
    if hex.len() != 6 || !hex.is_ascii() {
        return Color::Reset;
    }
    match (
        u8::from_str_radix(&hex[0..2], 16),
        u8::from_str_radix(&hex[2..4], 16),
        u8::from_str_radix(&hex[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

impl ThemeColors {
    pub fn bg(&self) -> Color {
        color(&self.bg)
    }
    pub fn fg(&self) -> Color {
        color(&self.fg)
    }
    pub fn accent(&self) -> Color {
        color(&self.accent)
    }
    pub fn border(&self) -> Color {
        color(&self.border)
    }
    pub fn header_bg(&self) -> Color {
        color(&self.header_bg)
    }
    pub fn header_fg(&self) -> Color {
        color(&self.header_fg)
    }
    pub fn text_correct(&self) -> Color {
        color(&self.text_correct)
    }
    pub fn text_incorrect(&self) -> Color {
        color(&self.text_incorrect)
    }
    pub fn text_omitted(&self) -> Color {
        color(&self.text_omitted)
    }
    pub fn text_pending(&self) -> Color {
        color(&self.text_pending)
    }
    pub fn error(&self) -> Color {
        color(&self.error)
    }
    pub fn warning(&self) -> Color {
        color(&self.warning)
    }
    pub fn success(&self) -> Color {
        color(&self.success)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "terminal-default".to_string(),
            colors: ThemeColors {
                bg: "#1a1b26".to_string(),
                fg: "#c0caf5".to_string(),
                accent: "#7aa2f7".to_string(),
                border: "#3b4261".to_string(),
                header_bg: "#24283b".to_string(),
                header_fg: "#7aa2f7".to_string(),
                text_correct: "#9ece6a".to_string(),
                text_incorrect: "#f7768e".to_string(),
                text_omitted: "#565f89".to_string(),
                text_pending: "#787c99".to_string(),
                error: "#f7768e".to_string(),
                warning: "#e0af68".to_string(),
                success: "#9ece6a".to_string(),
            },
        }
    }
}

impl Theme {
    /// User themes live under `config_dir()/typewise/themes/<name>.toml`;
    /// any other name resolves to the built-in default.
    pub fn load(name: &str) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir
                .join("typewise")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return theme;
                }
            }
        }
        Theme::default()
    }
}
