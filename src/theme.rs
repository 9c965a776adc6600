//! Visual preference domains and their applied configurations
//!
//! Both preferences are pure functions of the stored value: a [`Theme`] maps
//! to a [`Palette`] and a [`FontSize`] maps to a [`Scale`]. They are persisted
//! under fixed keys in the config file and re-applied on every start.

use owo_colors::AnsiColors;
use serde::{Deserialize, Serialize};

/// Color theme preference (default dark)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Applied color configuration for this theme
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                info: AnsiColors::BrightBlue,
                success: AnsiColors::BrightGreen,
                warning: AnsiColors::BrightYellow,
                error: AnsiColors::BrightRed,
                accent: AnsiColors::BrightCyan,
                dim: AnsiColors::BrightBlack,
                accent_hex: "#58a6ff",
                highlight_hex: "#3fb950",
            },
            Theme::Light => Palette {
                info: AnsiColors::Blue,
                success: AnsiColors::Green,
                warning: AnsiColors::Yellow,
                error: AnsiColors::Red,
                accent: AnsiColors::Cyan,
                dim: AnsiColors::Default,
                accent_hex: "#0969da",
                highlight_hex: "#1a7f37",
            },
        }
    }
}

/// Font size preference (default: default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Default,
    Large,
}

impl FontSize {
    /// Applied sizing configuration: base size and heading multiplier
    pub fn scale(self) -> Scale {
        match self {
            FontSize::Small => Scale {
                base: 14,
                heading_multiplier: 1.1,
            },
            FontSize::Default => Scale {
                base: 16,
                heading_multiplier: 1.2,
            },
            FontSize::Large => Scale {
                base: 18,
                heading_multiplier: 1.3,
            },
        }
    }
}

/// Colors applied to terminal output for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub info: AnsiColors,
    pub success: AnsiColors,
    pub warning: AnsiColors,
    pub error: AnsiColors,
    pub accent: AnsiColors,
    pub dim: AnsiColors,
    /// Hex source for the derived accent channel triple
    pub accent_hex: &'static str,
    pub highlight_hex: &'static str,
}

impl Palette {
    /// Derived channel values for colors needing partial-opacity blending;
    /// recomputed whenever the theme is applied
    pub fn accent_rgb(&self) -> Option<(u8, u8, u8)> {
        hex_to_rgb(self.accent_hex)
    }

    pub fn highlight_rgb(&self) -> Option<(u8, u8, u8)> {
        hex_to_rgb(self.highlight_hex)
    }
}

/// Sizing applied to rendered output for one font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub base: u16,
    pub heading_multiplier: f32,
}

impl Scale {
    /// Width of heading rules, scaled by the heading multiplier
    pub fn heading_width(&self) -> usize {
        (f32::from(self.base) * 3.0 * self.heading_multiplier).round() as usize
    }
}

/// Parse a hex color (`#abc` or `#aabbcc`, hash optional) into RGB channels
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let cleaned = hex.trim().strip_prefix('#').unwrap_or(hex.trim());

    let full: String = if cleaned.len() == 3 {
        cleaned.chars().flat_map(|c| [c, c]).collect()
    } else {
        cleaned.to_string()
    };

    if full.len() != 6 || !full.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&full[0..2], 16).ok()?;
    let g = u8::from_str_radix(&full[2..4], 16).ok()?;
    let b = u8::from_str_radix(&full[4..6], 16).ok()?;
    Some((r, g, b))
}
