// Theme token table shared by all renderers
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Named colour slots; renderers refer to these instead of literal colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Bg,
    Card,
    Border,
    Text,
    Subtext,
    AccentBlue,
    MidBlue,
    DarkBlue,
    AccentGreen,
    MidGreen,
    DarkGreen,
    BarPrimary,
    BarSecondary,
    /// Index into the categorical palette, wrapping.
    Palette(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: ThemeName,
    bg: &'static str,
    card: &'static str,
    border: &'static str,
    text: &'static str,
    subtext: &'static str,
    accent_blue: &'static str,
    mid_blue: &'static str,
    dark_blue: &'static str,
    accent_green: &'static str,
    mid_green: &'static str,
    dark_green: &'static str,
    bar_primary: &'static str,
    bar_secondary: &'static str,
    palette: [&'static str; 6],
}

const DARK: Theme = Theme {
    name: ThemeName::Dark,
    bg: "rgb(10,12,20)",
    card: "rgb(18,32,58)",
    border: "rgb(30,48,80)",
    text: "rgb(200,220,255)",
    subtext: "rgb(120,140,170)",
    accent_blue: "rgb(6,165,225)",
    mid_blue: "rgb(50,110,220)",
    dark_blue: "rgb(10,40,120)",
    accent_green: "rgb(0,255,135)",
    mid_green: "rgb(50,200,100)",
    dark_green: "rgb(0,150,70)",
    bar_primary: "rgb(0,255,135)",
    bar_secondary: "rgb(50,110,220)",
    palette: [
        "rgb(6,165,225)",
        "rgb(0,255,135)",
        "rgb(124,58,237)",
        "rgb(50,110,220)",
        "rgb(50,200,100)",
        "rgb(249,115,22)",
    ],
};

const LIGHT: Theme = Theme {
    name: ThemeName::Light,
    bg: "rgb(248,250,252)",
    card: "rgba(255,255,255,0.9)",
    border: "rgba(15,23,42,0.06)",
    text: "rgb(15,23,42)",
    subtext: "rgba(15,23,42,0.66)",
    accent_blue: "rgb(0,110,255)",
    mid_blue: "rgb(20,90,200)",
    dark_blue: "rgb(8,30,110)",
    accent_green: "#10b981",
    mid_green: "#34d399",
    dark_green: "#059669",
    bar_primary: "#10b981",
    bar_secondary: "rgb(20,90,200)",
    palette: ["#0ea5e9", "#10b981", "#7c3aed", "#3b82f6", "#f59e0b", "#ef4444"],
};

impl Theme {
    pub fn get(name: ThemeName) -> &'static Theme {
        match name {
            ThemeName::Dark => &DARK,
            ThemeName::Light => &LIGHT,
        }
    }

    pub fn color(&self, token: ThemeToken) -> &'static str {
        match token {
            ThemeToken::Bg => self.bg,
            ThemeToken::Card => self.card,
            ThemeToken::Border => self.border,
            ThemeToken::Text => self.text,
            ThemeToken::Subtext => self.subtext,
            ThemeToken::AccentBlue => self.accent_blue,
            ThemeToken::MidBlue => self.mid_blue,
            ThemeToken::DarkBlue => self.dark_blue,
            ThemeToken::AccentGreen => self.accent_green,
            ThemeToken::MidGreen => self.mid_green,
            ThemeToken::DarkGreen => self.dark_green,
            ThemeToken::BarPrimary => self.bar_primary,
            ThemeToken::BarSecondary => self.bar_secondary,
            ThemeToken::Palette(i) => self.palette[i % self.palette.len()],
        }
    }

    /// CSS custom properties for the page root.
    pub fn css_variables(&self) -> String {
        [
            ("bg", ThemeToken::Bg),
            ("card", ThemeToken::Card),
            ("border", ThemeToken::Border),
            ("text", ThemeToken::Text),
            ("subtext", ThemeToken::Subtext),
            ("accentBlue", ThemeToken::AccentBlue),
            ("accentGreen", ThemeToken::AccentGreen),
        ]
        .iter()
        .map(|(name, token)| format!("--{}:{};", name, self.color(*token)))
        .collect()
    }
}

/// Fixed colours for misinformation categories.
pub fn category_color(category: &str) -> &'static str {
    match category {
        "Health" => "#4CAF50",
        "Political" => "#2196F3",
        "Financial" => "#FF9800",
        "Science" => "#9C27B0",
        "Social" => "#E91E63",
        "Satire" => "#795548",
        "Geopolitics" => "#FFC107",
        "None" => "#9E9E9E",
        "Other" => "#607D8B",
        "Unreliable Information" => "red",
        "Out of Context" => "#00BCD4",
        _ => "#cccccc",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        let theme = Theme::get(ThemeName::Dark);
        assert_eq!(
            theme.color(ThemeToken::Palette(0)),
            theme.color(ThemeToken::Palette(6))
        );
    }

    #[test]
    fn test_parse_theme_name() {
        assert_eq!(ThemeName::parse(" Light "), Some(ThemeName::Light));
        assert_eq!(ThemeName::parse("sepia"), None);
    }

    #[test]
    fn test_category_fallback() {
        assert_eq!(category_color("Health"), "#4CAF50");
        assert_eq!(category_color("Astrology"), "#cccccc");
    }
}
