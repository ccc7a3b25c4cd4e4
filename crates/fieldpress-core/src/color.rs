// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour normalisation. Every colour enters as a `#RRGGBB` string and leaves
// this module as unit RGB; drawing code never sees hex.

use serde::{Deserialize, Serialize};

/// An sRGB colour with each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#RRGGBB` (case-insensitive, `#` optional).
    ///
    /// Malformed input yields black.
    pub fn from_hex(hex: &str) -> Self {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).unwrap_or(0)
        };
        Self::from_rgb8(channel(0..2), channel(2..4), channel(4..6))
    }

    /// Lowercase `#rrggbb` representation.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Channels scaled back to 8 bits (rounded, clamped).
    pub fn to_rgb8(&self) -> [u8; 3] {
        let scale = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [scale(self.r), scale(self.g), scale(self.b)]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<String> for Rgb {
    fn from(hex: String) -> Self {
        Self::from_hex(&hex)
    }
}

impl From<&str> for Rgb {
    fn from(hex: &str) -> Self {
        Self::from_hex(hex)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#FF0000"), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(Rgb::from_hex("00ff00"), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn mixed_case_is_accepted() {
        assert_eq!(Rgb::from_hex("#d1D5db").to_rgb8(), [0xd1, 0xd5, 0xdb]);
    }

    #[test]
    fn malformed_hex_is_black() {
        for bad in ["", "#", "#FFF", "#GGGGGG", "#1234567", "ré#abc", "#12 456"] {
            assert_eq!(Rgb::from_hex(bad), Rgb::BLACK, "input {bad:?}");
        }
    }

    #[test]
    fn serde_uses_hex_strings() {
        let color: Rgb = serde_json::from_str("\"#808080\"").unwrap();
        assert_eq!(color.to_rgb8(), [128, 128, 128]);
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#808080\"");
    }
}
