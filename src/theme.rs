//! UI palette with Catppuccin-inspired defaults and optional hex overrides
//! from the `[theme]` section of config.toml.

use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Active borders, highlights, key hints
    pub danger: Color,      // Errors
    pub success: Color,     // Selected card, affirmations
    pub warning: Color,     // Status messages
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Dimmed text, face-down cards
    pub bg_selected: Color, // Selection background in lists
    pub inactive: Color,    // Inactive borders
    pub header: Color,      // Titles, table headers
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

impl Theme {
    /// Build the palette, applying any configured overrides
    pub fn load(overrides: &ThemeConfig) -> Self {
        let mut theme = Self::default();

        let slots: [(&Option<String>, &mut Color); 9] = [
            (&overrides.accent, &mut theme.accent),
            (&overrides.danger, &mut theme.danger),
            (&overrides.success, &mut theme.success),
            (&overrides.warning, &mut theme.warning),
            (&overrides.text, &mut theme.text),
            (&overrides.text_dim, &mut theme.text_dim),
            (&overrides.bg_selected, &mut theme.bg_selected),
            (&overrides.inactive, &mut theme.inactive),
            (&overrides.header, &mut theme.header),
        ];

        for (value, slot) in slots {
            if let Some(s) = value {
                match Self::parse_hex_color(s) {
                    Some(color) => *slot = color,
                    None => tracing::warn!("Ignoring invalid theme color: {}", s),
                }
            }
        }

        theme
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            Theme::parse_hex_color("#fab387"),
            Some(Color::Rgb(250, 179, 135))
        );
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("not-a-color"), None);
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ThemeConfig {
            accent: Some("#000000".to_string()),
            danger: Some("garbage".to_string()),
            ..ThemeConfig::default()
        };

        let theme = Theme::load(&overrides);
        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));
        // Malformed override falls back to the default
        assert_eq!(theme.danger, Theme::default().danger);
    }
}
