// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page canvas — records drawing operations against local resource names and
// appends them to a page as a new, state-isolated content stream.

use std::collections::HashMap;

use fieldpress_core::Rgb;
use fieldpress_core::error::{FieldpressError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::image::PdfImage;
use crate::layout::StandardFont;
use crate::layout::metrics::encode_win_ansi;
use crate::pdf::objects;
use crate::pdf::store::PdfDocument;

/// Bézier control-point factor for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// A batch of drawing operations for one page.
///
/// Resources (fonts, images, opacity states, form XObjects) are referenced by
/// canvas-local names; [`PdfDocument::paint`] assigns page-unique names when
/// the canvas is committed.
#[derive(Debug, Default)]
pub struct PageCanvas {
    ops: Vec<Operation>,
    fonts: Vec<StandardFont>,
    images: Vec<(String, PdfImage)>,
    opacities: Vec<(String, f32)>,
    forms: Vec<(String, ObjectId)>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    // -- Graphics state -------------------------------------------------------

    pub fn save_state(&mut self) {
        self.push("q", vec![]);
    }

    pub fn restore_state(&mut self) {
        self.push("Q", vec![]);
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.push("rg", vec![real(color.r), real(color.g), real(color.b)]);
    }

    pub fn set_stroke_color(&mut self, color: Rgb) {
        self.push("RG", vec![real(color.r), real(color.g), real(color.b)]);
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.push("w", vec![real(width)]);
    }

    /// Round caps and joins, used for check marks and chevrons.
    pub fn set_round_strokes(&mut self) {
        self.push("J", vec![Object::Integer(1)]);
        self.push("j", vec![Object::Integer(1)]);
    }

    /// Constant fill and stroke opacity for subsequent painting.
    pub fn set_opacity(&mut self, alpha: f32) {
        let name = format!("Gs{}", self.opacities.len());
        self.push("gs", vec![Object::Name(name.clone().into_bytes())]);
        self.opacities.push((name, alpha.clamp(0.0, 1.0)));
    }

    /// Concatenate `[a b c d e f]` onto the current transformation matrix.
    pub fn transform(&mut self, matrix: [f32; 6]) {
        self.push("cm", matrix.iter().copied().map(real).collect());
    }

    // -- Paths ----------------------------------------------------------------

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push("re", vec![real(x), real(y), real(width), real(height)]);
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.push("m", vec![real(x), real(y)]);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.push("l", vec![real(x), real(y)]);
    }

    pub fn curve_to(&mut self, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) {
        self.push(
            "c",
            vec![real(c1.0), real(c1.1), real(c2.0), real(c2.1), real(end.0), real(end.1)],
        );
    }

    pub fn close_path(&mut self) {
        self.push("h", vec![]);
    }

    /// Closed circle path from four Bézier quarter arcs.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        let k = radius * KAPPA;
        self.move_to(cx + radius, cy);
        self.curve_to((cx + radius, cy + k), (cx + k, cy + radius), (cx, cy + radius));
        self.curve_to((cx - k, cy + radius), (cx - radius, cy + k), (cx - radius, cy));
        self.curve_to((cx - radius, cy - k), (cx - k, cy - radius), (cx, cy - radius));
        self.curve_to((cx + k, cy - radius), (cx + radius, cy - k), (cx + radius, cy));
        self.close_path();
    }

    pub fn fill(&mut self) {
        self.push("f", vec![]);
    }

    pub fn stroke(&mut self) {
        self.push("S", vec![]);
    }

    pub fn fill_and_stroke(&mut self) {
        self.push("B", vec![]);
    }

    /// Filled rectangle with a border, the box shape every form widget uses.
    pub fn bordered_rect(
        &mut self,
        (x, y, width, height): (f32, f32, f32, f32),
        fill: Rgb,
        border: Rgb,
        border_width: f32,
    ) {
        self.set_fill_color(fill);
        if border_width > 0.0 {
            self.set_stroke_color(border);
            self.set_line_width(border_width);
            self.rect(x, y, width, height);
            self.fill_and_stroke();
        } else {
            self.rect(x, y, width, height);
            self.fill();
        }
    }

    // -- Text -----------------------------------------------------------------

    fn font_name(&mut self, font: StandardFont) -> Object {
        if !self.fonts.contains(&font) {
            self.fonts.push(font);
        }
        Object::Name(font.resource_name().as_bytes().to_vec())
    }

    /// One line of text with its baseline starting at `(x, y)`.
    pub fn text(&mut self, font: StandardFont, size: f32, x: f32, y: f32, text: &str, color: Rgb) {
        let font_name = self.font_name(font);
        self.set_fill_color(color);
        self.push("BT", vec![]);
        self.push("Tf", vec![font_name, real(size)]);
        self.push("Td", vec![real(x), real(y)]);
        self.push("Tj", vec![Object::String(encode_win_ansi(text), StringFormat::Literal)]);
        self.push("ET", vec![]);
    }

    /// One line of text rotated by `angle_deg` counter-clockwise about its
    /// baseline origin `(x, y)`.
    pub fn rotated_text(
        &mut self,
        font: StandardFont,
        size: f32,
        (x, y): (f32, f32),
        angle_deg: f32,
        text: &str,
        color: Rgb,
    ) {
        let font_name = self.font_name(font);
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        self.set_fill_color(color);
        self.push("BT", vec![]);
        self.push("Tf", vec![font_name, real(size)]);
        self.push("Tm", vec![real(cos), real(sin), real(-sin), real(cos), real(x), real(y)]);
        self.push("Tj", vec![Object::String(encode_win_ansi(text), StringFormat::Literal)]);
        self.push("ET", vec![]);
    }

    // -- XObjects -------------------------------------------------------------

    /// Paint an image stretched over the box `(x, y, width, height)`.
    pub fn image(&mut self, image: PdfImage, x: f32, y: f32, width: f32, height: f32) {
        let name = format!("Im{}", self.images.len());
        self.save_state();
        self.transform([width, 0.0, 0.0, height, x, y]);
        self.push("Do", vec![Object::Name(name.clone().into_bytes())]);
        self.restore_state();
        self.images.push((name, image));
    }

    /// Paint an existing form XObject under `matrix`.
    pub fn form(&mut self, form_id: ObjectId, matrix: [f32; 6]) {
        let name = format!("Fm{}", self.forms.len());
        self.save_state();
        self.transform(matrix);
        self.push("Do", vec![Object::Name(name.clone().into_bytes())]);
        self.restore_state();
        self.forms.push((name, form_id));
    }
}

/// Names the canvas used, mapped to the names claimed on the page.
#[derive(Default)]
struct Renames {
    fonts: HashMap<Vec<u8>, Vec<u8>>,
    xobjects: HashMap<Vec<u8>, Vec<u8>>,
    states: HashMap<Vec<u8>, Vec<u8>>,
}

impl Renames {
    fn apply(&self, mut op: Operation) -> Operation {
        let table = match op.operator.as_str() {
            "Tf" => &self.fonts,
            "Do" => &self.xobjects,
            "gs" => &self.states,
            _ => return op,
        };
        if let Some(Object::Name(name)) = op.operands.first_mut() {
            if let Some(renamed) = table.get(name.as_slice()) {
                *name = renamed.clone();
            }
        }
        op
    }
}

impl PdfDocument {
    /// Append a canvas to a page as a new content stream.
    ///
    /// The page's existing content is wrapped in `q … Q` the first time the
    /// page is painted, and every canvas is wrapped in its own `q … Q`, so
    /// leftover graphics state on either side cannot leak into the other.
    /// Nothing is mutated when the page does not exist.
    pub fn paint(&mut self, page_index: usize, canvas: PageCanvas) -> Result<()> {
        let page_id = self.page_id(page_index)?;
        if canvas.is_empty() {
            return Ok(());
        }

        let PageCanvas {
            ops,
            fonts,
            images,
            opacities,
            forms,
        } = canvas;

        let mut resources = self.local_resources(page_id);
        let mut renames = Renames::default();

        for font in fonts {
            let font_id = self.font_id(font);
            let claimed = claim_name(&mut resources, b"Font", font.resource_name(), font_id);
            renames.fonts.insert(font.resource_name().as_bytes().to_vec(), claimed);
        }
        for (name, image) in images {
            let smask_id = image.smask().map(|mask| self.document.add_object(mask));
            let image_id = self.document.add_object(image.xobject(smask_id));
            let claimed =
                claim_name(&mut resources, b"XObject", &format!("Fp{name}"), image_id);
            renames.xobjects.insert(name.into_bytes(), claimed);
        }
        for (name, form_id) in forms {
            let claimed =
                claim_name(&mut resources, b"XObject", &format!("Fp{name}"), form_id);
            renames.xobjects.insert(name.into_bytes(), claimed);
        }
        for (name, alpha) in opacities {
            let state = Dictionary::from_iter([
                ("Type", Object::Name(b"ExtGState".to_vec())),
                ("ca", real(alpha)),
                ("CA", real(alpha)),
            ]);
            let state_id = self.document.add_object(state);
            let claimed =
                claim_name(&mut resources, b"ExtGState", &format!("Fp{name}"), state_id);
            renames.states.insert(name.into_bytes(), claimed);
        }

        let mut refs = objects::content_refs(&self.document, page_id);
        let restore_original = !refs.is_empty() && !self.isolated_pages.contains(&page_id);

        let mut operations = Vec::with_capacity(ops.len() + 3);
        if restore_original {
            operations.push(Operation::new("Q", vec![]));
        }
        operations.push(Operation::new("q", vec![]));
        operations.extend(ops.into_iter().map(|op| renames.apply(op)));
        operations.push(Operation::new("Q", vec![]));

        let encoded = Content { operations }.encode().map_err(|err| {
            FieldpressError::Serialization(format!("failed to encode content stream: {err}"))
        })?;

        if restore_original {
            let open_id = self
                .document
                .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            refs.insert(0, Object::Reference(open_id));
        }
        let stream_id = self.document.add_object(Stream::new(Dictionary::new(), encoded));
        refs.push(Object::Reference(stream_id));
        self.isolated_pages.insert(page_id);

        let page = self.document.get_dictionary_mut(page_id).map_err(|err| {
            FieldpressError::InvalidDocument(format!("page object is not a dictionary: {err}"))
        })?;
        page.set("Contents", Object::Array(refs));
        page.set("Resources", Object::Dictionary(resources));
        debug!(page = page_index, stream = ?stream_id, "Canvas appended to page");
        Ok(())
    }

    /// Shared font dictionary for one of the standard fonts.
    pub(crate) fn font_id(&mut self, font: StandardFont) -> ObjectId {
        let document = &mut self.document;
        *self.font_ids.entry(font).or_insert_with(|| {
            document.add_object(Dictionary::from_iter([
                ("Type", Object::Name(b"Font".to_vec())),
                ("Subtype", Object::Name(b"Type1".to_vec())),
                ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
                ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
            ]))
        })
    }

    /// A private copy of the page's effective resources, with the category
    /// dictionaries inlined so new entries never touch shared objects.
    pub(crate) fn local_resources(&self, page_id: ObjectId) -> Dictionary {
        let doc = &self.document;
        let mut resources = objects::inherited(doc, page_id, b"Resources")
            .and_then(|object| objects::resolve_dict(doc, object))
            .cloned()
            .unwrap_or_else(Dictionary::new);
        for category in [&b"Font"[..], &b"XObject"[..], &b"ExtGState"[..]] {
            let inlined = resources
                .get(category)
                .ok()
                .and_then(|object| objects::resolve_dict(doc, object))
                .cloned();
            if let Some(entries) = inlined {
                resources.set(category, Object::Dictionary(entries));
            }
        }
        resources
    }
}

/// Register `target` under a name in a resource category, reusing the entry
/// if it already points at the same object, otherwise suffixing the base
/// name until it is free.
fn claim_name(resources: &mut Dictionary, category: &[u8], base: &str, target: ObjectId) -> Vec<u8> {
    let mut entries = resources
        .get(category)
        .ok()
        .and_then(|object| object.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);

    let mut candidate = base.as_bytes().to_vec();
    let mut suffix = 0;
    loop {
        match entries.get(&candidate) {
            Ok(Object::Reference(existing)) if *existing == target => break,
            Ok(_) => {
                suffix += 1;
                candidate = format!("{base}_{suffix}").into_bytes();
            }
            Err(_) => {
                entries.set(candidate.clone(), Object::Reference(target));
                break;
            }
        }
    }
    resources.set(category, Object::Dictionary(entries));
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_pdf, page_operators};
    use fieldpress_core::SaveOptions;

    #[test]
    fn first_paint_isolates_existing_content() {
        let mut doc = PdfDocument::load(&fixture_pdf(&[(612.0, 792.0)])).unwrap();
        let mut canvas = PageCanvas::new();
        canvas.rect(10.0, 10.0, 20.0, 20.0);
        canvas.fill();
        doc.paint(0, canvas).unwrap();

        let mut second = PageCanvas::new();
        second.text(StandardFont::Helvetica, 12.0, 5.0, 5.0, "hi", Rgb::BLACK);
        doc.paint(0, second).unwrap();

        let bytes = doc.save(&SaveOptions::default()).unwrap();
        let ops = page_operators(&bytes, 0);
        assert_eq!(ops.first().map(String::as_str), Some("q"));
        let saves = ops.iter().filter(|op| op.as_str() == "q").count();
        let restores = ops.iter().filter(|op| op.as_str() == "Q").count();
        assert_eq!(saves, restores);
        assert!(ops.iter().any(|op| op == "Tj"));
    }

    #[test]
    fn clashing_resource_names_are_suffixed() {
        let mut resources = Dictionary::new();
        resources.set(
            "Font",
            Dictionary::from_iter([("FpHelv", Object::Reference((99, 0)))]),
        );
        let name = claim_name(&mut resources, b"Font", "FpHelv", (7, 0));
        assert_eq!(name, b"FpHelv_1".to_vec());
        let again = claim_name(&mut resources, b"Font", "FpHelv", (7, 0));
        assert_eq!(again, b"FpHelv_1".to_vec());
    }

    #[test]
    fn painting_a_missing_page_fails_without_changes() {
        let mut doc = PdfDocument::load(&fixture_pdf(&[(612.0, 792.0)])).unwrap();
        let objects_before = doc.as_lopdf().objects.len();
        let mut canvas = PageCanvas::new();
        canvas.rect(0.0, 0.0, 1.0, 1.0);
        let err = doc.paint(3, canvas).unwrap_err();
        assert!(matches!(err, FieldpressError::PageNotFound { page: 3, .. }));
        assert_eq!(doc.as_lopdf().objects.len(), objects_before);
    }
}
