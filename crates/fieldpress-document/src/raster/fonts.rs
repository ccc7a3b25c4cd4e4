// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolution for rasterization — embedded TrueType/OpenType programs,
// PDF advance widths, and caller-supplied fallback faces for non-embedded
// fonts.

use std::collections::HashMap;
use std::sync::Arc;

use fieldpress_core::error::{FieldpressError, Result};
use lopdf::{Dictionary, Document, Object};
use tiny_skia::PathBuilder;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::layout::metrics::{decode_win_ansi, StandardFont};
use crate::pdf::objects;

/// Caller-supplied faces drawn for fonts that carry no program.
#[derive(Clone, Default)]
pub(crate) struct FallbackFaces {
    regular: Option<Arc<Vec<u8>>>,
    bold: Option<Arc<Vec<u8>>>,
}

impl FallbackFaces {
    /// Check that each program parses before accepting it.
    pub(crate) fn new(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            regular: Some(parsed(regular, "regular")?),
            bold: bold.map(|bytes| parsed(bytes, "bold")).transpose()?,
        })
    }

    /// Fallback face for a `/BaseFont` name.
    pub(crate) fn for_base_font(&self, base_font: &str) -> Option<Arc<Vec<u8>>> {
        let lowered = base_font.to_ascii_lowercase();
        let wants_bold =
            lowered.contains("bold") || lowered.contains("black") || lowered.contains("heavy");
        if wants_bold && self.bold.is_some() {
            return self.bold.clone();
        }
        self.regular.clone()
    }
}

fn parsed(bytes: Vec<u8>, role: &str) -> Result<Arc<Vec<u8>>> {
    Face::parse(&bytes, 0).map_err(|err| {
        FieldpressError::Render(format!("{role} fallback font is not a usable face: {err}"))
    })?;
    Ok(Arc::new(bytes))
}

// -- PDF fonts ----------------------------------------------------------------

/// A font resource prepared for drawing.
pub(crate) struct PdfFont {
    /// TrueType/OpenType program, embedded or fallback.
    program: Option<Arc<Vec<u8>>>,
    embedded: bool,
    /// Type0 fonts use two-byte codes that are glyph ids (Identity).
    two_byte: bool,
    first_char: u16,
    widths: Vec<f32>,
    cid_widths: HashMap<u16, f32>,
    default_width: f32,
    standard: Option<StandardFont>,
    /// Glyph id for each CID when a CIDToGIDMap stream is present.
    cid_to_gid: Option<Vec<u16>>,
}

impl PdfFont {
    pub(crate) fn load(doc: &Document, font: &Dictionary, fallback: &FallbackFaces) -> Self {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(objects::name_str)
            .unwrap_or_default();
        let base_font = strip_subset_prefix(&base_font).to_string();
        let two_byte = matches!(font.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Type0");

        let descendant = two_byte
            .then(|| {
                let array = objects::resolve(doc, font.get(b"DescendantFonts").ok()?)?;
                objects::resolve_dict(doc, array.as_array().ok()?.first()?)
            })
            .flatten();
        let metrics_dict = descendant.unwrap_or(font);

        let embedded_program = metrics_dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|descriptor| font_file_bytes(doc, descriptor))
            .filter(|bytes| Face::parse(bytes, 0).is_ok())
            .map(Arc::new);
        let embedded = embedded_program.is_some();
        let program = embedded_program.or_else(|| fallback.for_base_font(&base_font));

        let mut loaded = Self {
            program,
            embedded,
            two_byte,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            default_width: if two_byte { 1000.0 } else { 500.0 },
            standard: StandardFont::from_base_font(&base_font),
            cid_to_gid: None,
        };
        if two_byte {
            loaded.read_cid_metrics(doc, metrics_dict);
        } else {
            loaded.read_simple_metrics(doc, font);
        }
        loaded
    }

    fn read_simple_metrics(&mut self, doc: &Document, font: &Dictionary) {
        if let Some(missing) = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| objects::resolve_dict(doc, d))
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|w| objects::number(doc, w))
        {
            self.default_width = missing.max(0.0);
        }
        self.first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|c| objects::number(doc, c))
            .map(|c| c.clamp(0.0, 255.0) as u16)
            .unwrap_or(0);
        if let Some(Object::Array(widths)) = font.get(b"Widths").ok().and_then(|w| objects::resolve(doc, w)) {
            self.widths = widths
                .iter()
                .map(|w| objects::number(doc, w).unwrap_or(self.default_width).max(0.0))
                .collect();
        }
    }

    fn read_cid_metrics(&mut self, doc: &Document, cid_font: &Dictionary) {
        if let Some(dw) = cid_font.get(b"DW").ok().and_then(|w| objects::number(doc, w)) {
            self.default_width = dw.max(0.0);
        }
        if let Some(Object::Array(entries)) = cid_font.get(b"W").ok().and_then(|w| objects::resolve(doc, w)) {
            self.cid_widths = parse_cid_widths(doc, entries);
        }
        if let Some(Object::Stream(map)) = cid_font
            .get(b"CIDToGIDMap")
            .ok()
            .and_then(|m| objects::resolve(doc, m))
        {
            if let Ok(bytes) = map.get_plain_content() {
                self.cid_to_gid = Some(
                    bytes
                        .chunks_exact(2)
                        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                        .collect(),
                );
            }
        }
    }

    pub(crate) fn program(&self) -> Option<&[u8]> {
        self.program.as_deref().map(Vec::as_slice)
    }

    pub(crate) fn is_two_byte(&self) -> bool {
        self.two_byte
    }

    /// Character codes of a shown string.
    pub(crate) fn codes(&self, bytes: &[u8]) -> Vec<u16> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|pair| match pair {
                    [hi, lo] => u16::from_be_bytes([*hi, *lo]),
                    [single] => u16::from(*single),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|&b| u16::from(b)).collect()
        }
    }

    /// Advance of `code` in thousandths of an em.
    pub(crate) fn width(&self, code: u16, face: Option<&Face<'_>>) -> f32 {
        if self.two_byte {
            return self.cid_widths.get(&code).copied().unwrap_or(self.default_width);
        }
        if let Some(width) = code
            .checked_sub(self.first_char)
            .and_then(|offset| self.widths.get(usize::from(offset)))
        {
            return *width;
        }
        if let Some(standard) = self.standard {
            return f32::from(standard.code_width(code as u8));
        }
        if !self.widths.is_empty() {
            return self.default_width;
        }
        face.and_then(|face| {
            let glyph = self.glyph(face, code)?;
            let advance = face.glyph_hor_advance(glyph)?;
            Some(f32::from(advance) * 1000.0 / f32::from(face.units_per_em()))
        })
        .unwrap_or(self.default_width)
    }

    /// Glyph drawn for `code`.
    pub(crate) fn glyph(&self, face: &Face<'_>, code: u16) -> Option<GlyphId> {
        if self.two_byte {
            if !self.embedded {
                return None;
            }
            let gid = match &self.cid_to_gid {
                Some(map) => *map.get(usize::from(code))?,
                None => code,
            };
            return Some(GlyphId(gid));
        }
        let ch = decode_win_ansi(code as u8);
        face.glyph_index(ch)
            .or_else(|| char::from_u32(0xF000 + u32::from(code)).and_then(|sym| face.glyph_index(sym)))
    }
}

/// `/W` array: `c [w1 w2 …]` and `c_first c_last w` entries.
fn parse_cid_widths(doc: &Document, entries: &[Object]) -> HashMap<u16, f32> {
    let mut widths = HashMap::new();
    let mut index = 0;
    while index < entries.len() {
        let Some(first) = objects::number(doc, &entries[index]) else {
            break;
        };
        let first = first.max(0.0) as u32;
        match entries.get(index + 1).and_then(|o| objects::resolve(doc, o)) {
            Some(Object::Array(run)) => {
                for (offset, w) in run.iter().enumerate() {
                    if let (Some(w), Ok(cid)) =
                        (objects::number(doc, w), u16::try_from(first + offset as u32))
                    {
                        widths.insert(cid, w);
                    }
                }
                index += 2;
            }
            Some(last) => {
                let (Some(last), Some(w)) = (
                    objects::number(doc, last),
                    entries.get(index + 2).and_then(|w| objects::number(doc, w)),
                ) else {
                    break;
                };
                for cid in first..=(last.max(0.0) as u32).min(u32::from(u16::MAX)) {
                    if let Ok(cid) = u16::try_from(cid) {
                        widths.insert(cid, w);
                    }
                }
                index += 3;
            }
            None => break,
        }
    }
    widths
}

fn font_file_bytes(doc: &Document, descriptor: &Object) -> Option<Vec<u8>> {
    let descriptor = objects::resolve_dict(doc, descriptor)?;
    [&b"FontFile2"[..], &b"FontFile3"[..], &b"FontFile"[..]]
        .iter()
        .filter_map(|key| descriptor.get(key).ok())
        .filter_map(|obj| match objects::resolve(doc, obj)? {
            Object::Stream(stream) => stream.get_plain_content().ok(),
            _ => None,
        })
        .find(|data| !data.is_empty())
}

/// `ABCDEF+Helvetica` → `Helvetica`.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

// -- Glyph outlines -----------------------------------------------------------

/// Collects a glyph outline, in font units, into a tiny-skia path.
pub(crate) struct GlyphOutline {
    builder: PathBuilder,
}

impl GlyphOutline {
    pub(crate) fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
        }
    }

    pub(crate) fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_fallback() -> FallbackFaces {
        FallbackFaces::default()
    }

    #[test]
    fn simple_font_uses_widths_then_missing_width() {
        let doc = Document::with_version("1.7");
        let font = Dictionary::from_iter([
            ("Subtype", Object::Name(b"TrueType".to_vec())),
            ("BaseFont", Object::Name(b"ABCDEF+Custom".to_vec())),
            ("FirstChar", Object::Integer(65)),
            ("Widths", Object::Array(vec![Object::Integer(600), Object::Integer(700)])),
            (
                "FontDescriptor",
                Object::Dictionary(Dictionary::from_iter([("MissingWidth", Object::Integer(250))])),
            ),
        ]);
        let loaded = PdfFont::load(&doc, &font, &no_fallback());
        assert_eq!(loaded.width(u16::from(b'A'), None), 600.0);
        assert_eq!(loaded.width(u16::from(b'B'), None), 700.0);
        assert_eq!(loaded.width(u16::from(b'Z'), None), 250.0);
    }

    #[test]
    fn standard_font_without_widths_uses_builtin_metrics() {
        let doc = Document::with_version("1.7");
        let font = Dictionary::from_iter([
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]);
        let loaded = PdfFont::load(&doc, &font, &no_fallback());
        assert_eq!(loaded.width(u16::from(b'W'), None), 944.0);
        assert!(loaded.program().is_none());
    }

    #[test]
    fn type0_codes_are_two_bytes_with_w_array_widths() {
        let doc = Document::with_version("1.7");
        let cid_font = Dictionary::from_iter([
            ("Subtype", Object::Name(b"CIDFontType2".to_vec())),
            ("DW", Object::Integer(900)),
            (
                "W",
                Object::Array(vec![
                    Object::Integer(3),
                    Object::Array(vec![Object::Integer(400), Object::Integer(410)]),
                    Object::Integer(10),
                    Object::Integer(12),
                    Object::Integer(333),
                ]),
            ),
        ]);
        let font = Dictionary::from_iter([
            ("Subtype", Object::Name(b"Type0".to_vec())),
            ("BaseFont", Object::Name(b"Custom".to_vec())),
            ("DescendantFonts", Object::Array(vec![Object::Dictionary(cid_font)])),
        ]);
        let loaded = PdfFont::load(&doc, &font, &no_fallback());
        assert!(loaded.is_two_byte());
        assert_eq!(loaded.codes(&[0x00, 0x03, 0x00, 0x0B]), vec![3, 11]);
        assert_eq!(loaded.width(3, None), 400.0);
        assert_eq!(loaded.width(4, None), 410.0);
        assert_eq!(loaded.width(11, None), 333.0);
        assert_eq!(loaded.width(99, None), 900.0);
    }

    #[test]
    fn subset_prefix_is_stripped() {
        assert_eq!(strip_subset_prefix("ABCDEF+Helvetica-Bold"), "Helvetica-Bold");
        assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
        assert_eq!(strip_subset_prefix("abc+Thing"), "abc+Thing");
    }

    #[test]
    fn unparseable_fallback_program_is_refused() {
        assert!(matches!(
            FallbackFaces::new(b"not a font".to_vec(), None),
            Err(FieldpressError::Render(_))
        ));
    }

    #[test]
    fn without_fallback_faces_non_embedded_fonts_have_no_program() {
        let faces = no_fallback();
        assert!(faces.for_base_font("Helvetica-Bold").is_none());
        assert!(faces.for_base_font("Helvetica").is_none());
    }
}
