// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standard-14 font metrics and WinAnsi encoding.
//
// Fields are drawn with the non-embedded Helvetica family, so widths come
// from the Adobe AFM tables (units per 1000 em) rather than from a font file.
// Text that cannot be expressed in WinAnsi is replaced by `?` before it is
// measured, so measured and drawn widths always agree.

/// Replacement for characters outside WinAnsiEncoding.
const REPLACEMENT: u8 = b'?';

/// Helvetica advance widths for codes 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // { | } ~
];

/// Helvetica-Bold advance widths for codes 0x20..=0x7E.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    333, 333, 584, 584, 584, 611, 975, // : ; < = > ? @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [ \ ] ^ _ `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // { | } ~
];

/// Helvetica widths for codes 0x80..=0xFF. Zero marks an unassigned code.
/// Bold reuses this table above 0x7E.
const HELVETICA_HIGH: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, // 0x80
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

/// Unicode code points for WinAnsi 0x80..=0x9F (0 = unassigned).
const WIN_ANSI_0X80: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// The non-embedded fonts fields are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name written to the font dictionary's `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used in page `/Font` dictionaries.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "FpHelv",
            Self::HelveticaBold => "FpHelvB",
        }
    }

    /// Resolve a `/BaseFont` name (subset prefix tolerated) to a standard font.
    pub fn from_base_font(name: &str) -> Option<Self> {
        let name = name.split_once('+').map_or(name, |(_, rest)| rest);
        match name {
            "Helvetica" | "Arial" | "ArialMT" => Some(Self::Helvetica),
            "Helvetica-Bold" | "Arial-Bold" | "Arial,Bold" | "Arial-BoldMT" => {
                Some(Self::HelveticaBold)
            }
            _ => None,
        }
    }

    /// Advance width of a WinAnsi code in 1/1000 em.
    pub fn code_width(&self, code: u8) -> u16 {
        match code {
            0x20..=0x7E => {
                let idx = (code - 0x20) as usize;
                match self {
                    Self::Helvetica => HELVETICA_ASCII[idx],
                    Self::HelveticaBold => HELVETICA_BOLD_ASCII[idx],
                }
            }
            0x80..=0xFF => HELVETICA_HIGH[(code - 0x80) as usize],
            _ => 0,
        }
    }

    /// Advance width of a character in 1/1000 em, after WinAnsi substitution.
    pub fn char_width(&self, ch: char) -> u16 {
        self.code_width(encode_char(ch))
    }
}

/// Map one character to its WinAnsi code, substituting `?` when unmappable.
/// Tabs become spaces; other control characters are unmappable.
pub fn encode_char(ch: char) -> u8 {
    let cp = ch as u32;
    match cp {
        0x09 => b' ',
        0x20..=0x7E | 0xA0..=0xFF => cp as u8,
        _ => WIN_ANSI_0X80
            .iter()
            .position(|&mapped| mapped != 0 && mapped == cp)
            .map_or(REPLACEMENT, |idx| 0x80 + idx as u8),
    }
}

/// Encode a string as WinAnsi bytes for a PDF string operand.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Decode one WinAnsi code back to a character.
pub fn decode_win_ansi(code: u8) -> char {
    match code {
        0x80..=0x9F => {
            let cp = WIN_ANSI_0X80[(code - 0x80) as usize];
            char::from_u32(cp).filter(|_| cp != 0).unwrap_or('?')
        }
        other => other as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_match_afm() {
        assert_eq!(StandardFont::Helvetica.char_width(' '), 278);
        assert_eq!(StandardFont::Helvetica.char_width('W'), 944);
        assert_eq!(StandardFont::Helvetica.char_width('i'), 222);
        assert_eq!(StandardFont::HelveticaBold.char_width('i'), 278);
        assert_eq!(StandardFont::HelveticaBold.char_width('~'), 584);
    }

    #[test]
    fn ellipsis_and_bullet_encode_into_win_ansi() {
        assert_eq!(encode_char('…'), 0x85);
        assert_eq!(encode_char('•'), 0x95);
        assert_eq!(StandardFont::Helvetica.char_width('…'), 1000);
        assert_eq!(decode_win_ansi(0x85), '…');
    }

    #[test]
    fn unmappable_characters_become_question_marks() {
        assert_eq!(encode_win_ansi("a✓b"), b"a?b".to_vec());
        assert_eq!(
            StandardFont::Helvetica.char_width('✓'),
            StandardFont::Helvetica.char_width('?')
        );
    }

    #[test]
    fn latin1_passes_through() {
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(decode_win_ansi(0xE9), 'é');
    }

    #[test]
    fn subset_prefixes_are_ignored() {
        assert_eq!(
            StandardFont::from_base_font("ABCDEF+Helvetica-Bold"),
            Some(StandardFont::HelveticaBold)
        );
        assert_eq!(StandardFont::from_base_font("Times-Roman"), None);
    }
}
