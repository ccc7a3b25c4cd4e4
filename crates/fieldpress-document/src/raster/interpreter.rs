// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream interpreter — executes page and form operators against a
// tiny-skia pixmap.
//
// Paths are built in user space and painted with the device transform
// (page transform × CTM) in effect when the painting operator runs. Clipping
// is kept as a device-space mask on the graphics state, so `q`/`Q` restore it
// along with everything else.

use std::collections::HashMap;
use std::rc::Rc;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap,
    PixmapPaint, Stroke, StrokeDash, Transform,
};
use tracing::{debug, warn};
use ttf_parser::Face;

use crate::pdf::objects;
use crate::raster::color::{self, ColorSpace};
use crate::raster::fonts::{FallbackFaces, GlyphOutline, PdfFont};
use crate::raster::images;

/// Nesting limit for form XObjects.
const MAX_FORM_DEPTH: usize = 16;

#[derive(Clone)]
struct TextState {
    font: Option<Rc<PdfFont>>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
    render_mode: i64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
            render_mode: 0,
        }
    }
}

#[derive(Clone)]
struct GraphicsState {
    ctm: Transform,
    fill_space: ColorSpace,
    stroke_space: ColorSpace,
    fill_color: [f32; 3],
    stroke_color: [f32; 3],
    fill_alpha: f32,
    stroke_alpha: f32,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f32,
    dash: Option<(Vec<f32>, f32)>,
    clip: Option<Mask>,
    text: TextState,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Transform::identity(),
            fill_space: ColorSpace::Gray,
            stroke_space: ColorSpace::Gray,
            fill_color: [0.0; 3],
            stroke_color: [0.0; 3],
            fill_alpha: 1.0,
            stroke_alpha: 1.0,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash: None,
            clip: None,
            text: TextState::default(),
        }
    }
}

/// Which parts of a path a painting operator draws.
#[derive(Clone, Copy)]
enum Painting {
    Fill(FillRule),
    Stroke,
    FillStroke(FillRule),
    Nothing,
}

pub(crate) struct Interpreter<'a> {
    doc: &'a Document,
    fonts: &'a FallbackFaces,
    pixmap: &'a mut Pixmap,
    /// PDF user space of the page to device pixels.
    base: Transform,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: PathBuilder,
    current_point: (f32, f32),
    subpath_start: (f32, f32),
    pending_clip: Option<FillRule>,
    text_matrix: Transform,
    line_matrix: Transform,
    active_forms: Vec<ObjectId>,
    form_depth: usize,
    font_cache: HashMap<ObjectId, Rc<PdfFont>>,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(
        doc: &'a Document,
        fonts: &'a FallbackFaces,
        pixmap: &'a mut Pixmap,
        base: Transform,
    ) -> Self {
        Self {
            doc,
            fonts,
            pixmap,
            base,
            state: GraphicsState::default(),
            stack: Vec::new(),
            path: PathBuilder::new(),
            current_point: (0.0, 0.0),
            subpath_start: (0.0, 0.0),
            pending_clip: None,
            text_matrix: Transform::identity(),
            line_matrix: Transform::identity(),
            active_forms: Vec::new(),
            form_depth: 0,
            font_cache: HashMap::new(),
        }
    }

    fn device(&self) -> Transform {
        self.base.pre_concat(self.state.ctm)
    }

    /// Execute a list of operators with the given resource dictionary.
    pub(crate) fn run(&mut self, operations: &[Operation], resources: Option<&'a Dictionary>) {
        for op in operations {
            self.execute(op, resources);
        }
    }

    fn execute(&mut self, op: &Operation, resources: Option<&'a Dictionary>) {
        match op.operator.as_str() {
            // -- Graphics state -----------------------------------------------
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(previous) = self.stack.pop() {
                    self.state = previous;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = operands::<6>(op) {
                    self.state.ctm = self.state.ctm.pre_concat(Transform::from_row(a, b, c, d, e, f));
                }
            }
            "w" => {
                if let Some(width) = operand(op, 0) {
                    self.state.line_width = width.max(0.0);
                }
            }
            "J" => {
                self.state.line_cap = match operand(op, 0).map(|v| v as i64) {
                    Some(1) => LineCap::Round,
                    Some(2) => LineCap::Square,
                    _ => LineCap::Butt,
                };
            }
            "j" => {
                self.state.line_join = match operand(op, 0).map(|v| v as i64) {
                    Some(1) => LineJoin::Round,
                    Some(2) => LineJoin::Bevel,
                    _ => LineJoin::Miter,
                };
            }
            "M" => {
                if let Some(limit) = operand(op, 0) {
                    self.state.miter_limit = limit.max(1.0);
                }
            }
            "d" => self.set_dash(op),
            "gs" => self.set_ext_gstate(op, resources),

            // -- Colour -------------------------------------------------------
            "g" | "rg" | "k" => {
                let space = color::device_space_for(op.operands.len());
                self.state.fill_color = space.to_rgb(&numbers(op));
                self.state.fill_space = space;
            }
            "G" | "RG" | "K" => {
                let space = color::device_space_for(op.operands.len());
                self.state.stroke_color = space.to_rgb(&numbers(op));
                self.state.stroke_space = space;
            }
            "cs" | "CS" => {
                let space = op
                    .operands
                    .first()
                    .and_then(|name| color::parse(self.doc, name, resources))
                    .unwrap_or_else(|| {
                        debug!("Unknown colour space, using DeviceRGB");
                        ColorSpace::Rgb
                    });
                if op.operator == "cs" {
                    self.state.fill_color = space.initial_color();
                    self.state.fill_space = space;
                } else {
                    self.state.stroke_color = space.initial_color();
                    self.state.stroke_space = space;
                }
            }
            "sc" | "scn" => {
                if let Some(rgb) = color_operands(&self.state.fill_space, op) {
                    self.state.fill_color = rgb;
                }
            }
            "SC" | "SCN" => {
                if let Some(rgb) = color_operands(&self.state.stroke_space, op) {
                    self.state.stroke_color = rgb;
                }
            }

            // -- Path construction --------------------------------------------
            "m" => {
                if let Some([x, y]) = operands::<2>(op) {
                    self.path.move_to(x, y);
                    self.current_point = (x, y);
                    self.subpath_start = (x, y);
                }
            }
            "l" => {
                if let Some([x, y]) = operands::<2>(op) {
                    self.path.line_to(x, y);
                    self.current_point = (x, y);
                }
            }
            "c" => {
                if let Some([x1, y1, x2, y2, x, y]) = operands::<6>(op) {
                    self.path.cubic_to(x1, y1, x2, y2, x, y);
                    self.current_point = (x, y);
                }
            }
            "v" => {
                if let Some([x2, y2, x, y]) = operands::<4>(op) {
                    let (x1, y1) = self.current_point;
                    self.path.cubic_to(x1, y1, x2, y2, x, y);
                    self.current_point = (x, y);
                }
            }
            "y" => {
                if let Some([x1, y1, x, y]) = operands::<4>(op) {
                    self.path.cubic_to(x1, y1, x, y, x, y);
                    self.current_point = (x, y);
                }
            }
            "h" => self.close_subpath(),
            "re" => {
                if let Some([x, y, w, h]) = operands::<4>(op) {
                    self.path.move_to(x, y);
                    self.path.line_to(x + w, y);
                    self.path.line_to(x + w, y + h);
                    self.path.line_to(x, y + h);
                    self.path.close();
                    self.current_point = (x, y);
                    self.subpath_start = (x, y);
                }
            }

            // -- Path painting ------------------------------------------------
            "S" => self.paint_path(Painting::Stroke),
            "s" => {
                self.close_subpath();
                self.paint_path(Painting::Stroke);
            }
            "f" | "F" => self.paint_path(Painting::Fill(FillRule::Winding)),
            "f*" => self.paint_path(Painting::Fill(FillRule::EvenOdd)),
            "B" => self.paint_path(Painting::FillStroke(FillRule::Winding)),
            "B*" => self.paint_path(Painting::FillStroke(FillRule::EvenOdd)),
            "b" => {
                self.close_subpath();
                self.paint_path(Painting::FillStroke(FillRule::Winding));
            }
            "b*" => {
                self.close_subpath();
                self.paint_path(Painting::FillStroke(FillRule::EvenOdd));
            }
            "n" => self.paint_path(Painting::Nothing),
            "W" => self.pending_clip = Some(FillRule::Winding),
            "W*" => self.pending_clip = Some(FillRule::EvenOdd),

            // -- Text ---------------------------------------------------------
            "BT" => {
                self.text_matrix = Transform::identity();
                self.line_matrix = Transform::identity();
            }
            "ET" => {}
            "Tf" => self.set_font(op, resources),
            "Tc" => {
                if let Some(v) = operand(op, 0) {
                    self.state.text.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = operand(op, 0) {
                    self.state.text.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = operand(op, 0) {
                    self.state.text.horizontal_scale = v / 100.0;
                }
            }
            "TL" => {
                if let Some(v) = operand(op, 0) {
                    self.state.text.leading = v;
                }
            }
            "Ts" => {
                if let Some(v) = operand(op, 0) {
                    self.state.text.rise = v;
                }
            }
            "Tr" => {
                if let Some(v) = operand(op, 0) {
                    self.state.text.render_mode = v as i64;
                }
            }
            "Td" => {
                if let Some([tx, ty]) = operands::<2>(op) {
                    self.move_text_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = operands::<2>(op) {
                    self.state.text.leading = -ty;
                    self.move_text_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = operands::<6>(op) {
                    self.line_matrix = Transform::from_row(a, b, c, d, e, f);
                    self.text_matrix = self.line_matrix;
                }
            }
            "T*" => self.next_text_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show_text(bytes);
                }
            }
            "'" => {
                self.next_text_line();
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show_text(bytes);
                }
            }
            "\"" => {
                if let Some([aw, ac]) = operands::<2>(op) {
                    self.state.text.word_spacing = aw;
                    self.state.text.char_spacing = ac;
                }
                self.next_text_line();
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    self.show_text(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show_text(bytes),
                            Object::Integer(_) | Object::Real(_) => {
                                let adjust = number(item).unwrap_or(0.0);
                                let text = &self.state.text;
                                let tx = -adjust / 1000.0 * text.size * text.horizontal_scale;
                                self.text_matrix = self.text_matrix.pre_concat(Transform::from_translate(tx, 0.0));
                            }
                            _ => {}
                        }
                    }
                }
            }

            // -- XObjects -----------------------------------------------------
            "Do" => self.draw_xobject(op, resources),
            "sh" => debug!("Shading fill skipped"),
            _ => {}
        }
    }

    // -- Paths ----------------------------------------------------------------

    fn close_subpath(&mut self) {
        self.path.close();
        self.current_point = self.subpath_start;
    }

    fn take_path(&mut self) -> Option<Path> {
        std::mem::replace(&mut self.path, PathBuilder::new()).finish()
    }

    fn paint_path(&mut self, painting: Painting) {
        let path = self.take_path();
        let clip_rule = self.pending_clip.take();
        let transform = self.device();

        if let Some(path) = &path {
            match painting {
                Painting::Fill(rule) => self.fill(path, rule, transform),
                Painting::Stroke => self.stroke(path, transform),
                Painting::FillStroke(rule) => {
                    self.fill(path, rule, transform);
                    self.stroke(path, transform);
                }
                Painting::Nothing => {}
            }
        }

        if let Some(rule) = clip_rule {
            self.intersect_clip(path.as_ref(), rule, transform);
        }
    }

    fn fill(&mut self, path: &Path, rule: FillRule, transform: Transform) {
        let paint = solid_paint(self.state.fill_color, self.state.fill_alpha);
        self.pixmap
            .fill_path(path, &paint, rule, transform, self.state.clip.as_ref());
    }

    fn stroke(&mut self, path: &Path, transform: Transform) {
        let paint = solid_paint(self.state.stroke_color, self.state.stroke_alpha);
        let stroke = self.line_style(self.state.line_width);
        self.pixmap
            .stroke_path(path, &paint, &stroke, transform, self.state.clip.as_ref());
    }

    fn line_style(&self, width: f32) -> Stroke {
        let mut stroke = Stroke {
            width,
            miter_limit: self.state.miter_limit,
            line_cap: self.state.line_cap,
            line_join: self.state.line_join,
            ..Stroke::default()
        };
        if let Some((pattern, phase)) = &self.state.dash {
            let mut pattern = pattern.clone();
            if pattern.len() % 2 == 1 {
                pattern.extend_from_within(..);
            }
            stroke.dash = StrokeDash::new(pattern, *phase);
        }
        stroke
    }

    /// Intersect the clip with `path`. An empty path clips everything.
    fn intersect_clip(&mut self, path: Option<&Path>, rule: FillRule, transform: Transform) {
        if let Some(mask) = self.state.clip.as_mut() {
            match path {
                Some(path) => mask.intersect_path(path, rule, true, transform),
                None => mask.data_mut().fill(0),
            }
            return;
        }
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        if let Some(path) = path {
            mask.fill_path(path, rule, true, transform);
        }
        self.state.clip = Some(mask);
    }

    fn set_dash(&mut self, op: &Operation) {
        let pattern: Vec<f32> = match op.operands.first() {
            Some(Object::Array(items)) => items.iter().filter_map(number).map(f32::abs).collect(),
            _ => return,
        };
        let phase = operand(op, 1).unwrap_or(0.0);
        self.state.dash = (!pattern.is_empty()).then_some((pattern, phase));
    }

    fn set_ext_gstate(&mut self, op: &Operation, resources: Option<&'a Dictionary>) {
        let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) else {
            return;
        };
        let doc = self.doc;
        let Some(params) = resource(doc, resources, b"ExtGState", name)
            .and_then(|o| objects::resolve_dict(doc, o))
        else {
            warn!(name = %String::from_utf8_lossy(name), "Graphics state parameters not found");
            return;
        };
        let value = |key: &[u8]| params.get(key).ok().and_then(|v| objects::number(doc, v));
        if let Some(alpha) = value(b"ca") {
            self.state.fill_alpha = alpha.clamp(0.0, 1.0);
        }
        if let Some(alpha) = value(b"CA") {
            self.state.stroke_alpha = alpha.clamp(0.0, 1.0);
        }
        if let Some(width) = value(b"LW") {
            self.state.line_width = width.max(0.0);
        }
    }

    // -- Text -----------------------------------------------------------------

    fn set_font(&mut self, op: &Operation, resources: Option<&'a Dictionary>) {
        let (Some(name), Some(size)) = (op.operands.first().and_then(|o| o.as_name().ok()), operand(op, 1))
        else {
            return;
        };
        self.state.text.size = size;
        self.state.text.font = match resource(self.doc, resources, b"Font", name) {
            Some(Object::Reference(id)) => self.cached_font(*id),
            Some(inline) => objects::resolve_dict(self.doc, inline)
                .map(|dict| Rc::new(PdfFont::load(self.doc, dict, self.fonts))),
            None => {
                warn!(name = %String::from_utf8_lossy(name), "Font resource not found");
                None
            }
        };
    }

    fn cached_font(&mut self, id: ObjectId) -> Option<Rc<PdfFont>> {
        if let Some(font) = self.font_cache.get(&id) {
            return Some(Rc::clone(font));
        }
        let dict = self.doc.get_dictionary(id).ok()?;
        let font = Rc::new(PdfFont::load(self.doc, dict, self.fonts));
        self.font_cache.insert(id, Rc::clone(&font));
        Some(font)
    }

    fn move_text_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = self.line_matrix.pre_concat(Transform::from_translate(tx, ty));
        self.text_matrix = self.line_matrix;
    }

    fn next_text_line(&mut self) {
        let leading = self.state.text.leading;
        self.move_text_line(0.0, -leading);
    }

    fn show_text(&mut self, bytes: &[u8]) {
        let Some(font) = self.state.text.font.clone() else {
            return;
        };
        let text = self.state.text.clone();
        let face = font.program().and_then(|data| Face::parse(data, 0).ok());
        if face.is_none() {
            debug!("No usable face for font, text advanced without drawing");
        }
        let fill = matches!(text.render_mode, 0 | 2 | 4 | 6);
        let stroke = matches!(text.render_mode, 1 | 2 | 5 | 6);
        let device = self.device();

        for code in font.codes(bytes) {
            if let (Some(face), true) = (&face, fill || stroke) {
                if let Some(outline) = font.glyph(face, code).and_then(|glyph| {
                    let mut outline = GlyphOutline::new();
                    face.outline_glyph(glyph, &mut outline)?;
                    outline.finish()
                }) {
                    let units = f32::from(face.units_per_em().max(1));
                    let glyph_space = Transform::from_row(
                        text.size * text.horizontal_scale / units,
                        0.0,
                        0.0,
                        text.size / units,
                        0.0,
                        text.rise,
                    );
                    let transform = device.pre_concat(self.text_matrix).pre_concat(glyph_space);
                    if fill {
                        self.fill(&outline, FillRule::Winding, transform);
                    }
                    if stroke && text.size.abs() > f32::EPSILON {
                        let paint = solid_paint(self.state.stroke_color, self.state.stroke_alpha);
                        let line = self.line_style(self.state.line_width * units / text.size.abs());
                        self.pixmap
                            .stroke_path(&outline, &paint, &line, transform, self.state.clip.as_ref());
                    }
                }
            }

            let width = font.width(code, face.as_ref());
            let word_space = if !font.is_two_byte() && code == 32 {
                text.word_spacing
            } else {
                0.0
            };
            let tx = (width / 1000.0 * text.size + text.char_spacing + word_space) * text.horizontal_scale;
            self.text_matrix = self.text_matrix.pre_concat(Transform::from_translate(tx, 0.0));
        }
    }

    // -- XObjects -------------------------------------------------------------

    fn draw_xobject(&mut self, op: &Operation, resources: Option<&'a Dictionary>) {
        let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) else {
            return;
        };
        let Some(entry) = resource(self.doc, resources, b"XObject", name) else {
            warn!(name = %String::from_utf8_lossy(name), "XObject resource not found");
            return;
        };
        let id = match entry {
            Object::Reference(id) => Some(*id),
            _ => None,
        };
        let Some(Object::Stream(stream)) = objects::resolve(self.doc, entry) else {
            return;
        };
        match stream.dict.get(b"Subtype").ok().and_then(|s| s.as_name().ok()) {
            Some(b"Image") => self.draw_image(stream, resources),
            Some(b"Form") => self.run_form(id, stream, resources),
            _ => debug!("XObject of unknown subtype skipped"),
        }
    }

    fn draw_image(&mut self, stream: &Stream, resources: Option<&'a Dictionary>) {
        let Some(image) = images::decode(self.doc, stream, resources, self.state.fill_color) else {
            return;
        };
        let (w, h) = (image.width() as f32, image.height() as f32);
        // Image space is the unit square with row 0 at the top.
        let transform = self
            .device()
            .pre_concat(Transform::from_row(1.0 / w, 0.0, 0.0, -1.0 / h, 0.0, 1.0));
        let paint = PixmapPaint {
            opacity: self.state.fill_alpha,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, transform, self.state.clip.as_ref());
    }

    fn run_form(&mut self, id: Option<ObjectId>, stream: &'a Stream, resources: Option<&'a Dictionary>) {
        if self.form_depth >= MAX_FORM_DEPTH || id.is_some_and(|id| self.active_forms.contains(&id)) {
            warn!("Form XObject recursion stopped");
            return;
        }
        let content = match stream.get_plain_content().map(|bytes| Content::decode(&bytes)) {
            Ok(Ok(content)) => content,
            _ => {
                warn!("Form XObject content could not be decoded");
                return;
            }
        };
        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| objects::resolve_dict(self.doc, r))
            .or(resources);

        let saved = self.state.clone();
        let saved_depth = self.stack.len();
        if let Some([a, b, c, d, e, f]) = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|m| objects::resolve(self.doc, m))
            .and_then(|m| m.as_array().ok())
            .and_then(|items| numbers_of::<6>(items))
        {
            self.state.ctm = self.state.ctm.pre_concat(Transform::from_row(a, b, c, d, e, f));
        }
        if let Some([x0, y0, x1, y1]) = stream.dict.get(b"BBox").ok().and_then(|b| objects::rect(self.doc, b)) {
            let mut bbox = PathBuilder::new();
            bbox.move_to(x0, y0);
            bbox.line_to(x1, y0);
            bbox.line_to(x1, y1);
            bbox.line_to(x0, y1);
            bbox.close();
            let transform = self.device();
            self.intersect_clip(bbox.finish().as_ref(), FillRule::Winding, transform);
        }

        self.form_depth += 1;
        if let Some(id) = id {
            self.active_forms.push(id);
        }
        self.run(&content.operations, form_resources);
        if id.is_some() {
            self.active_forms.pop();
        }
        self.form_depth -= 1;

        self.stack.truncate(saved_depth);
        self.state = saved;
    }
}

// -- Operands ---------------------------------------------------------------

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn operand(op: &Operation, index: usize) -> Option<f32> {
    number(op.operands.get(index)?)
}

fn operands<const N: usize>(op: &Operation) -> Option<[f32; N]> {
    numbers_of::<N>(&op.operands)
}

fn numbers_of<const N: usize>(items: &[Object]) -> Option<[f32; N]> {
    let mut values = [0.0f32; N];
    for (slot, item) in values.iter_mut().zip(items.iter()) {
        *slot = number(item)?;
    }
    (items.len() >= N).then_some(values)
}

/// Every numeric operand, in order.
fn numbers(op: &Operation) -> Vec<f32> {
    op.operands.iter().filter_map(number).collect()
}

/// Colour for `sc`/`scn`; `None` leaves the colour unchanged (patterns).
fn color_operands(space: &ColorSpace, op: &Operation) -> Option<[f32; 3]> {
    if matches!(space, ColorSpace::Pattern) {
        return None;
    }
    let values = numbers(op);
    if values.is_empty() {
        return None;
    }
    if values.len() == space.components() {
        Some(space.to_rgb(&values))
    } else {
        Some(color::device_space_for(values.len()).to_rgb(&values))
    }
}

/// Entry `name` of the resource category `category`.
fn resource<'a>(
    doc: &'a Document,
    resources: Option<&'a Dictionary>,
    category: &[u8],
    name: &[u8],
) -> Option<&'a Object> {
    let entries = objects::resolve_dict(doc, resources?.get(category).ok()?)?;
    entries.get(name).ok()
}

fn solid_paint(color: [f32; 3], alpha: f32) -> Paint<'static> {
    let [r, g, b] = color.map(|c| c.clamp(0.0, 1.0));
    let mut paint = Paint::default();
    paint.set_color(tiny_skia::Color::from_rgba(r, g, b, alpha.clamp(0.0, 1.0)).unwrap_or(tiny_skia::Color::BLACK));
    paint.anti_alias = true;
    paint
}
