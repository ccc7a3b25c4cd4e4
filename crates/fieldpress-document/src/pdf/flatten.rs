// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form flattening — paint each widget's normal appearance into its page and
// drop the interactive form.

use fieldpress_core::error::{FieldpressError, Result};
use lopdf::{Dictionary, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

use crate::pdf::canvas::PageCanvas;
use crate::pdf::objects;
use crate::pdf::store::PdfDocument;

/// Annotation flag bit for hidden annotations.
const FLAG_HIDDEN: i64 = 1 << 1;

/// A widget's appearance resolved to a painting instruction.
struct WidgetAppearance {
    form: Appearance,
    matrix: [f32; 6],
}

enum Appearance {
    Existing(ObjectId),
    /// An appearance stream stored directly inside the annotation.
    Inline(lopdf::Stream),
}

/// What flattening will do to one page.
struct PagePlan {
    page_index: usize,
    page_id: ObjectId,
    appearances: Vec<WidgetAppearance>,
    kept_annotations: Vec<Object>,
}

impl PdfDocument {
    /// Convert interactive form fields into static page content.
    ///
    /// Every widget annotation with a normal appearance is drawn at its
    /// rectangle; all widget annotations are removed, as is the catalog's
    /// `/AcroForm`. A document without a form is left untouched. Returns the
    /// number of widgets painted.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn flatten(&mut self) -> Result<usize> {
        if !self.has_form() {
            debug!("No interactive form, nothing to flatten");
            return Ok(0);
        }

        let plans: Vec<PagePlan> = self
            .page_ids()
            .into_iter()
            .enumerate()
            .filter_map(|(page_index, page_id)| self.plan_page(page_index, page_id))
            .collect();

        let mut painted = 0;
        for plan in plans {
            let mut canvas = PageCanvas::new();
            for widget in plan.appearances {
                let form_id = match widget.form {
                    Appearance::Existing(id) => id,
                    Appearance::Inline(stream) => self.document.add_object(stream),
                };
                mark_as_form(&mut self.document, form_id);
                canvas.form(form_id, widget.matrix);
                painted += 1;
            }
            self.paint(plan.page_index, canvas)?;

            let page = self.document.get_dictionary_mut(plan.page_id).map_err(|err| {
                FieldpressError::InvalidDocument(format!("page object is not a dictionary: {err}"))
            })?;
            if plan.kept_annotations.is_empty() {
                page.remove(b"Annots");
            } else {
                page.set("Annots", Object::Array(plan.kept_annotations));
            }
        }

        if let Some(catalog_id) = objects::catalog_id(&self.document) {
            if let Ok(catalog) = self.document.get_dictionary_mut(catalog_id) {
                catalog.remove(b"AcroForm");
            }
        }
        info!(widgets = painted, "Form flattened");
        Ok(painted)
    }

    /// Widgets to paint and annotations to keep on one page, or `None` when
    /// the page has no widgets.
    fn plan_page(&self, page_index: usize, page_id: ObjectId) -> Option<PagePlan> {
        let doc = &self.document;
        let page = doc.get_dictionary(page_id).ok()?;
        let annotations = match objects::resolve(doc, page.get(b"Annots").ok()?)? {
            Object::Array(items) => items,
            _ => return None,
        };

        let mut appearances = Vec::new();
        let mut kept_annotations = Vec::new();
        let mut widgets = 0;
        for annotation in annotations {
            let Some(dict) = objects::resolve_dict(doc, annotation) else {
                continue;
            };
            if !is_widget(dict) {
                kept_annotations.push(annotation.clone());
                continue;
            }
            widgets += 1;
            let hidden = dict
                .get(b"F")
                .ok()
                .and_then(|flags| flags.as_i64().ok())
                .is_some_and(|flags| flags & FLAG_HIDDEN != 0);
            if hidden {
                continue;
            }
            match self.widget_appearance(dict) {
                Some(appearance) => appearances.push(appearance),
                None => warn!(page = page_index, "Widget has no normal appearance, dropped"),
            }
        }

        (widgets > 0).then_some(PagePlan {
            page_index,
            page_id,
            appearances,
            kept_annotations,
        })
    }

    fn widget_appearance(&self, widget: &Dictionary) -> Option<WidgetAppearance> {
        let doc = &self.document;
        let rect = objects::rect(doc, widget.get(b"Rect").ok()?)?;
        let appearance_dict = objects::resolve_dict(doc, widget.get(b"AP").ok()?)?;
        let mut normal = appearance_dict.get(b"N").ok()?;

        // A dictionary of named states: pick the one named by /AS.
        if let Some(Object::Dictionary(states)) = objects::resolve(doc, normal) {
            let state = widget.get(b"AS").ok().and_then(|s| s.as_name().ok())?;
            normal = states.get(state).ok()?;
        }

        let (form, stream) = match normal {
            Object::Reference(id) => match doc.get_object(*id).ok()? {
                Object::Stream(stream) => (Appearance::Existing(*id), stream),
                _ => return None,
            },
            Object::Stream(stream) => (Appearance::Inline(stream.clone()), stream),
            _ => return None,
        };

        let bbox = stream
            .dict
            .get(b"BBox")
            .ok()
            .and_then(|bbox| objects::rect(doc, bbox))
            .unwrap_or([0.0, 0.0, rect[2] - rect[0], rect[3] - rect[1]]);
        let form_matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|m| matrix(doc, m))
            .unwrap_or([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

        Some(WidgetAppearance {
            form,
            matrix: fit_box(transformed_bounds(bbox, form_matrix), rect),
        })
    }
}

fn is_widget(annotation: &Dictionary) -> bool {
    matches!(annotation.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Widget")
}

/// Appearance streams are form XObjects; some writers omit the type keys.
fn mark_as_form(doc: &mut lopdf::Document, form_id: ObjectId) {
    if let Ok(Object::Stream(stream)) = doc.get_object_mut(form_id) {
        if !stream.dict.has(b"Type") {
            stream.dict.set("Type", Object::Name(b"XObject".to_vec()));
        }
        if !stream.dict.has(b"Subtype") {
            stream.dict.set("Subtype", Object::Name(b"Form".to_vec()));
        }
    }
}

fn matrix(doc: &lopdf::Document, object: &Object) -> Option<[f32; 6]> {
    let Object::Array(items) = objects::resolve(doc, object)? else {
        return None;
    };
    if items.len() != 6 {
        return None;
    }
    let mut values = [0.0f32; 6];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = objects::number(doc, item)?;
    }
    Some(values)
}

/// Bounding box of `bbox` after applying `m`.
fn transformed_bounds(bbox: [f32; 4], m: [f32; 6]) -> [f32; 4] {
    let [x0, y0, x1, y1] = bbox;
    let corners = [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
        .map(|(x, y)| (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5]));
    corners.iter().fold(
        [f32::MAX, f32::MAX, f32::MIN, f32::MIN],
        |[a, b, c, d], &(x, y)| [a.min(x), b.min(y), c.max(x), d.max(y)],
    )
}

/// Matrix that maps `from` onto `to`, both `[x0 y0 x1 y1]`.
fn fit_box(from: [f32; 4], to: [f32; 4]) -> [f32; 6] {
    let scale = |target: f32, source: f32| if source.abs() > f32::EPSILON { target / source } else { 1.0 };
    let sx = scale(to[2] - to[0], from[2] - from[0]);
    let sy = scale(to[3] - to[1], from[3] - from[1]);
    [sx, 0.0, 0.0, sy, to[0] - from[0] * sx, to[1] - from[1] * sy]
}
