// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field renderer — one drawing routine per field type, dispatched through a
// single exhaustive match over `FieldPlacement`.

pub mod checkbox;
pub mod date;
pub mod dropdown;
pub mod radio;
pub mod signature;
pub mod table;
pub mod text;
pub mod textarea;

use chrono::NaiveDate;
use fieldpress_core::config::EngineConfig;
use fieldpress_core::error::Result;
use fieldpress_core::fields::{
    CheckboxField, DateField, DropdownField, FieldPlacement, RadioGroupField, SignatureField,
    TableField, TextField, TextareaField,
};
use tracing::{debug, instrument};

use crate::pdf::canvas::PageCanvas;
use crate::pdf::store::PdfDocument;

/// Inputs a renderer needs beyond the field itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The date that date fields print.
    pub today: NaiveDate,
    /// `strftime` pattern for [`DateFormat::Locale`](fieldpress_core::DateFormat).
    pub locale_date_format: String,
}

impl RenderContext {
    pub fn new(today: NaiveDate, locale_date_format: impl Into<String>) -> Self {
        Self {
            today,
            locale_date_format: locale_date_format.into(),
        }
    }

    /// Today's local date with the configured locale pattern.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            chrono::Local::now().date_naive(),
            config.locale_date_format.clone(),
        )
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Draw one field onto its page.
///
/// The page and the field geometry are checked before anything is built, and
/// the page is only touched once the complete drawing exists, so a failure
/// leaves the document as it was.
#[instrument(skip_all, fields(kind = ?field.category(), page = field.page()))]
pub fn draw_field(doc: &mut PdfDocument, field: &FieldPlacement, ctx: &RenderContext) -> Result<()> {
    let canvas = build_canvas(doc, field, ctx)?;
    doc.paint(field.page(), canvas)
}

/// Check a field against the document and build its drawing without
/// touching the document.
pub fn build_canvas(doc: &PdfDocument, field: &FieldPlacement, ctx: &RenderContext) -> Result<PageCanvas> {
    doc.page_id(field.page())?;
    field.validate()?;

    let canvas = match field {
        FieldPlacement::Signature(f) => signature::canvas(f)?,
        FieldPlacement::Text(f) => text::canvas(f),
        FieldPlacement::Date(f) => date::canvas(f, ctx)?,
        FieldPlacement::Checkbox(f) => checkbox::canvas(f),
        FieldPlacement::RadioGroup(f) => radio::canvas(f),
        FieldPlacement::Dropdown(f) => dropdown::canvas(f),
        FieldPlacement::Textarea(f) => textarea::canvas(f),
        FieldPlacement::Table(f) => table::canvas(f),
    };

    debug!(
        kind = ?field.category(),
        operations = canvas.operations().len(),
        "Field drawing built"
    );
    Ok(canvas)
}

// -- Per-type entry points ----------------------------------------------------

pub fn draw_signature(doc: &mut PdfDocument, field: &SignatureField) -> Result<()> {
    draw_field(doc, &FieldPlacement::Signature(field.clone()), &RenderContext::default())
}

pub fn draw_text(doc: &mut PdfDocument, field: &TextField) -> Result<()> {
    draw_field(doc, &FieldPlacement::Text(field.clone()), &RenderContext::default())
}

pub fn draw_date(doc: &mut PdfDocument, field: &DateField, ctx: &RenderContext) -> Result<()> {
    draw_field(doc, &FieldPlacement::Date(field.clone()), ctx)
}

pub fn draw_checkbox(doc: &mut PdfDocument, field: &CheckboxField) -> Result<()> {
    draw_field(doc, &FieldPlacement::Checkbox(field.clone()), &RenderContext::default())
}

pub fn draw_radio_group(doc: &mut PdfDocument, field: &RadioGroupField) -> Result<()> {
    draw_field(doc, &FieldPlacement::RadioGroup(field.clone()), &RenderContext::default())
}

pub fn draw_dropdown(doc: &mut PdfDocument, field: &DropdownField) -> Result<()> {
    draw_field(doc, &FieldPlacement::Dropdown(field.clone()), &RenderContext::default())
}

pub fn draw_textarea(doc: &mut PdfDocument, field: &TextareaField) -> Result<()> {
    draw_field(doc, &FieldPlacement::Textarea(field.clone()), &RenderContext::default())
}

pub fn draw_table(doc: &mut PdfDocument, field: &TableField) -> Result<()> {
    draw_field(doc, &FieldPlacement::Table(field.clone()), &RenderContext::default())
}

/// Baseline that vertically centres a line of `font_size` text in a band of
/// `height` starting at `bottom`.
pub(crate) fn centred_baseline(bottom: f32, height: f32, font_size: f32) -> f32 {
    bottom + height / 2.0 - font_size * 0.35
}
