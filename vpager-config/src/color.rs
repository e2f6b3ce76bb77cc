//! ARGB colors as accepted by the pager's option surface.
//!
//! Strings follow the Android convention: `#RGB`, `#RRGGBB` and `#AARRGGBB`
//! (alpha first), plus a handful of named colors. Parsing is
//! case-insensitive and ignores surrounding whitespace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 8-bit ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_argb(0xFF, 0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::from_argb(0xFF, 0x00, 0x00, 0x00);
    pub const TRANSPARENT: Color = Color::from_argb(0x00, 0x00, 0x00, 0x00);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xFF, r, g, b)
    }

    /// Packed `0xAARRGGBB`.
    pub const fn to_argb_u32(self) -> u32 {
        ((self.a as u32) << 24)
            | ((self.r as u32) << 16)
            | ((self.g as u32) << 8)
            | self.b as u32
    }

    /// Same color with its alpha channel replaced. Paint alpha overrides the
    /// color's own alpha when dots are drawn.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "transparent" => Self::TRANSPARENT,
            "red" => Self::from_rgb(0xFF, 0x00, 0x00),
            "green" => Self::from_rgb(0x00, 0x80, 0x00),
            "blue" => Self::from_rgb(0x00, 0x00, 0xFF),
            "yellow" => Self::from_rgb(0xFF, 0xFF, 0x00),
            "gray" | "grey" => Self::from_rgb(0x80, 0x80, 0x80),
            _ => return None,
        };
        Some(color)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || ConfigError::InvalidColor(raw.to_string());

        let Some(hex) = trimmed.strip_prefix('#') else {
            return Self::named(&trimmed.to_ascii_lowercase()).ok_or_else(invalid);
        };

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        // Expand a single hex digit into a full byte, e.g. "a" -> 0xAA.
        let nibble = |s: &str| byte(s).map(|v| v * 0x11);

        match hex.len() {
            3 => Ok(Self::from_rgb(
                nibble(&hex[0..1])?,
                nibble(&hex[1..2])?,
                nibble(&hex[2..3])?,
            )),
            6 => Ok(Self::from_rgb(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
            )),
            8 => Ok(Self::from_argb(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.to_argb_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(
            "#80FFFFFF".parse::<Color>().unwrap(),
            Color::from_argb(0x80, 0xFF, 0xFF, 0xFF)
        );
        assert_eq!(
            "#4ECDC4".parse::<Color>().unwrap(),
            Color::from_rgb(0x4E, 0xCD, 0xC4)
        );
        assert_eq!(
            "#f0a".parse::<Color>().unwrap(),
            Color::from_rgb(0xFF, 0x00, 0xAA)
        );
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(" White ".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("transparent".parse::<Color>().unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "#", "#12345", "#GGGGGG", "chartreuse-ish", "#1234567890"] {
            assert!(raw.parse::<Color>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn display_is_alpha_first() {
        assert_eq!(Color::from_rgb(0x12, 0x34, 0x56).to_string(), "#FF123456");
        assert_eq!(Color::WHITE.with_alpha(153).a, 153);
    }
}
