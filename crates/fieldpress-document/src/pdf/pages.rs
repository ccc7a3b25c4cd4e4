// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page structure operations — merge, extract, rotate, watermark, and the
// certificate page. Pages move between documents through a memoised deep
// copy of their object graph.

use std::collections::HashMap;

use fieldpress_core::error::{FieldpressError, Result};
use fieldpress_core::types::{CertificateInfo, WatermarkOptions};
use fieldpress_core::Rgb;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

use crate::layout::{StandardFont, measure_width};
use crate::pdf::canvas::PageCanvas;
use crate::pdf::objects;
use crate::pdf::store::PdfDocument;

/// Page attributes a page may inherit from the page tree. Copied pages carry
/// them directly, since they no longer sit under the original tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

// -- Page copying -------------------------------------------------------------

/// Copies pages out of one source document. Objects shared between copied
/// pages (fonts, images, resource dictionaries) are copied once.
struct PageCopier<'a> {
    source: &'a Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Copy one page into `target` and append it to the target's page tree.
    /// Copying the same page twice yields two independent pages.
    fn copy_page(&mut self, target: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
        let source = self.source;
        let page = source.get_dictionary(page_id).map_err(|err| {
            FieldpressError::InvalidDocument(format!("cannot read page {page_id:?}: {err}"))
        })?;
        let pages_root = objects::pages_root_id(target).ok_or_else(|| {
            FieldpressError::InvalidDocument("target document has no page tree".to_string())
        })?;

        let new_id = target.new_object_id();
        self.copied.insert(page_id, new_id);

        let mut dict = self.copy_dict(target, page);
        for key in INHERITABLE {
            if dict.has(key) {
                continue;
            }
            if let Some(value) = objects::inherited(source, page_id, key) {
                let value = self.copy_object(target, value);
                dict.set(key, value);
            }
        }
        dict.set("Parent", Object::Reference(pages_root));
        target.objects.insert(new_id, Object::Dictionary(dict));

        append_kid(target, pages_root, new_id)?;
        Ok(new_id)
    }

    fn copy_dict(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            match key.as_slice() {
                // Tree links are re-established by the caller.
                b"Parent" => continue,
                // Annotation back-links survive only when their page came along.
                b"P" => {
                    if let Object::Reference(id) = value {
                        if let Some(mapped) = self.copied.get(id) {
                            copy.set(key.clone(), Object::Reference(*mapped));
                        }
                        continue;
                    }
                }
                _ => {}
            }
            let value = self.copy_object(target, value);
            copy.set(key.clone(), value);
        }
        copy
    }

    fn copy_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(target, *id),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dict(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dict(target, &stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(mapped) = self.copied.get(&id) {
            return Object::Reference(*mapped);
        }
        let source = self.source;
        let referenced = match source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference while copying, using null");
                return Object::Null;
            }
        };
        // Links to pages that are not being copied would drag whole pages in.
        if is_page(referenced) {
            return Object::Null;
        }

        // Reserve the id first so cycles resolve to it.
        let new_id = target.new_object_id();
        self.copied.insert(id, new_id);
        let copy = self.copy_object(target, referenced);
        target.objects.insert(new_id, copy);
        Object::Reference(new_id)
    }
}

fn is_page(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(dict.get(b"Type"), Ok(Object::Name(name)) if name == b"Page")
}

/// Add a page to the root `/Kids` and bump `/Count`.
fn append_kid(doc: &mut Document, pages_root: ObjectId, page_id: ObjectId) -> Result<()> {
    let root = doc.get_dictionary_mut(pages_root).map_err(|err| {
        FieldpressError::InvalidDocument(format!("page tree root is unreadable: {err}"))
    })?;
    match root.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
        _ => root.set("Kids", Object::Array(vec![Object::Reference(page_id)])),
    }
    let count = root.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    root.set("Count", Object::Integer(count + 1));
    Ok(())
}

// -- Operations ---------------------------------------------------------------

impl PdfDocument {
    /// Concatenate the pages of `documents`, in order, into a new document.
    /// An empty list gives a valid document with no pages.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn merge(documents: &[PdfDocument]) -> Result<PdfDocument> {
        let mut merged = PdfDocument::create();
        for source in documents {
            let mut copier = PageCopier::new(&source.document);
            for page_id in source.page_ids() {
                copier.copy_page(&mut merged.document, page_id)?;
            }
        }
        info!(pages = merged.page_count(), "Documents merged");
        Ok(merged)
    }

    /// A new document holding the requested pages in the requested order.
    /// Indices may repeat.
    #[instrument(skip(self), fields(source_pages = self.page_count()))]
    pub fn extract_pages(&self, indices: &[usize]) -> Result<PdfDocument> {
        let page_ids = indices
            .iter()
            .map(|&index| self.page_id(index))
            .collect::<Result<Vec<_>>>()?;

        let mut extracted = PdfDocument::create();
        let mut copier = PageCopier::new(&self.document);
        for page_id in page_ids {
            copier.copy_page(&mut extracted.document, page_id)?;
        }
        info!(pages = extracted.page_count(), "Pages extracted");
        Ok(extracted)
    }

    /// Turn a page clockwise by a multiple of 90 degrees.
    #[instrument(skip(self))]
    pub fn rotate_page(&mut self, page_index: usize, degrees: i64) -> Result<()> {
        if degrees % 90 != 0 {
            return Err(FieldpressError::MalformedField(format!(
                "rotation must be a multiple of 90, got {degrees}"
            )));
        }
        let page_id = self.page_id(page_index)?;
        let existing = objects::rotation(&self.document, page_id);
        let rotation = (existing + degrees).rem_euclid(360);

        let page = self.document.get_dictionary_mut(page_id).map_err(|err| {
            FieldpressError::InvalidDocument(format!("page object is not a dictionary: {err}"))
        })?;
        page.set("Rotate", Object::Integer(rotation));
        info!(page_index, existing, rotation, "Page rotated");
        Ok(())
    }

    /// Stamp `text` across every page: centred on the page midpoint, rotated,
    /// and drawn with the given fill opacity.
    #[instrument(skip(self, options), fields(pages = self.page_count()))]
    pub fn add_watermark(&mut self, text: &str, options: &WatermarkOptions) -> Result<()> {
        if text.is_empty() {
            warn!("Empty watermark text, nothing to stamp");
            return Ok(());
        }
        let font = StandardFont::Helvetica;
        let half_width = measure_width(font, text, options.font_size) / 2.0;
        let half_height = options.font_size * 0.35;
        let (sin, cos) = options.rotation_deg.to_radians().sin_cos();

        let canvases: Vec<PageCanvas> = self
            .page_ids()
            .into_iter()
            .map(|page_id| {
                let [x0, y0, x1, y1] = objects::media_box(&self.document, page_id);
                let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
                // Shift the baseline origin so the rotated text's centre lands
                // on the page centre.
                let origin = (
                    cx - (half_width * cos - half_height * sin),
                    cy - (half_width * sin + half_height * cos),
                );
                let mut canvas = PageCanvas::new();
                canvas.set_opacity(options.opacity);
                canvas.rotated_text(
                    font,
                    options.font_size,
                    origin,
                    options.rotation_deg,
                    text,
                    options.color,
                );
                canvas
            })
            .collect();

        let stamped = canvases.len();
        for (page_index, canvas) in canvases.into_iter().enumerate() {
            self.paint(page_index, canvas)?;
        }
        info!(pages = stamped, "Watermark applied");
        Ok(())
    }

    /// Append one US Letter page summarising completion and the signers.
    #[instrument(skip_all, fields(signers = info.signers.len()))]
    pub fn add_certificate(&mut self, info: &CertificateInfo) -> Result<()> {
        let (width, height) = CERT_PAGE_SIZE;
        let canvas = certificate_canvas(info, height);

        let pages_root = objects::pages_root_id(&self.document).ok_or_else(|| {
            FieldpressError::InvalidDocument("PDF has no page tree".to_string())
        })?;
        let page_id = self.document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_root)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
        ]));
        append_kid(&mut self.document, pages_root, page_id)?;

        let page_index = self.page_count() - 1;
        self.paint(page_index, canvas)?;
        info!(page_index, "Certificate page appended");
        Ok(())
    }
}

/// US Letter, in points.
const CERT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);
const CERT_MARGIN: f32 = 72.0;
const TITLE_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 12.0;
const SMALL_SIZE: f32 = 10.0;
const SIGNER_ADVANCE: f32 = 18.0;

struct CertificateLine {
    text: String,
    font: StandardFont,
    size: f32,
    indent: f32,
    /// Distance down to the next baseline.
    advance: f32,
}

impl CertificateLine {
    fn new(text: String, font: StandardFont, size: f32, advance: f32) -> Self {
        Self {
            text,
            font,
            size,
            indent: 0.0,
            advance,
        }
    }
}

fn certificate_lines(info: &CertificateInfo) -> Vec<CertificateLine> {
    use StandardFont::{Helvetica, HelveticaBold};

    let mut lines = vec![
        CertificateLine::new("Certificate of Completion".into(), HelveticaBold, TITLE_SIZE, 40.0),
        CertificateLine::new(format!("Document: {}", info.document_title), Helvetica, BODY_SIZE, 20.0),
        CertificateLine::new(format!("Completed: {}", info.completed_date), Helvetica, BODY_SIZE, 20.0),
        CertificateLine::new(format!("Document ID: {}", info.document_id), Helvetica, SMALL_SIZE, 20.0),
    ];
    if let Some(fingerprint) = &info.fingerprint {
        lines.push(CertificateLine::new(
            format!("SHA-256: {fingerprint}"),
            Helvetica,
            SMALL_SIZE,
            20.0,
        ));
    }
    if let Some(last) = lines.last_mut() {
        last.advance += 10.0;
    }
    lines.push(CertificateLine::new("Signers:".into(), HelveticaBold, BODY_SIZE, 20.0));
    for signer in &info.signers {
        let mut line = CertificateLine::new(
            format!(
                "\u{2022} {} ({}) - Signed: {}",
                signer.name, signer.email, signer.signed_at
            ),
            Helvetica,
            SMALL_SIZE,
            SIGNER_ADVANCE,
        );
        line.indent = 18.0;
        lines.push(line);
    }
    lines
}

/// Lay the certificate out top-down on one page. Signer rows keep their
/// fixed step while they fit above the bottom margin; a longer list is
/// condensed evenly, text size included, so every row stays on the page.
fn certificate_canvas(info: &CertificateInfo, page_height: f32) -> PageCanvas {
    let mut lines = certificate_lines(info);
    let top = page_height - CERT_MARGIN;
    let header_drop: f32 = lines
        .iter()
        .take_while(|line| line.indent == 0.0)
        .map(|line| line.advance)
        .sum();
    let first_signer = top - header_drop;
    let signers = info.signers.len();
    let needed = SIGNER_ADVANCE * signers.saturating_sub(1) as f32;
    let room = first_signer - CERT_MARGIN;
    if signers > 1 && needed > room {
        let advance = room / (signers - 1) as f32;
        let size = SMALL_SIZE * advance / SIGNER_ADVANCE;
        warn!(signers, advance, size, "Signer list condensed to fit the certificate page");
        for line in lines.iter_mut().filter(|line| line.indent > 0.0) {
            line.advance = advance;
            line.size = size;
        }
    }

    let mut canvas = PageCanvas::new();
    let mut baseline = top;
    for line in &lines {
        canvas.text(
            line.font,
            line.size,
            CERT_MARGIN + line.indent,
            baseline,
            &line.text,
            Rgb::BLACK,
        );
        baseline -= line.advance;
    }
    debug!(lines = lines.len(), "Certificate laid out");
    canvas
}
