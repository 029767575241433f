//! Theme modes and palettes

use serde::{Deserialize, Serialize};

/// Environment variable standing in for the system color scheme
pub const COLOR_SCHEME_ENV: &str = "COMPARAPRECO_COLOR_SCHEME";

/// Light or dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Stored preferences only know "dark"; anything else reads as light
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    /// Mode reported by the environment, light when unset
    pub fn system_default() -> Self {
        std::env::var(COLOR_SCHEME_ENV)
            .map(|v| ThemeMode::from_str(&v))
            .unwrap_or_default()
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            ThemeMode::Light => ThemeColors::LIGHT,
            ThemeMode::Dark => ThemeColors::DARK,
        }
    }
}

/// Palette handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub background: &'static str,
    pub card: &'static str,
    pub text: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub border: &'static str,
    pub error: &'static str,
    pub success: &'static str,
}

impl ThemeColors {
    pub const LIGHT: ThemeColors = ThemeColors {
        background: "#FFFFFF",
        card: "#F5F5F5",
        text: "#333333",
        primary: "#4CAF50",
        secondary: "#2196F3",
        border: "#E0E0E0",
        error: "#F44336",
        success: "#4CAF50",
    };

    pub const DARK: ThemeColors = ThemeColors {
        background: "#083043",
        card: "#474852",
        text: "#FFFFFF",
        primary: "#BA94E2",
        secondary: "#64B5F6",
        border: "#333333",
        error: "#E57373",
        success: "#BA94E2",
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(ThemeMode::from_str("dark"), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_str("DARK "), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_str("light"), ThemeMode::Light);
        assert_eq!(ThemeMode::from_str("sepia"), ThemeMode::Light);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert!(ThemeMode::Dark.is_dark());
    }

    #[test]
    fn test_palettes() {
        assert_eq!(ThemeMode::Light.colors().background, "#FFFFFF");
        assert_eq!(ThemeMode::Dark.colors().primary, "#BA94E2");
    }
}
