// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition pipeline — apply an ordered batch of field instructions to one
// open document handle and serialise once.

use chrono::NaiveDate;
use fieldpress_core::config::EngineConfig;
use fieldpress_core::error::Result;
use fieldpress_core::fields::{FieldBatch, FieldPlacement};
use fieldpress_core::types::SaveOptions;
use tracing::{info, instrument};

use crate::pdf::store::PdfDocument;
use crate::render::{self, RenderContext};

/// Applies field batches with a fixed configuration and date.
#[derive(Debug, Clone)]
pub struct Composer {
    config: EngineConfig,
    context: RenderContext,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Composer {
    pub fn new(config: EngineConfig) -> Self {
        let context = RenderContext::from_config(&config);
        Self { config, context }
    }

    /// Pin the date printed by date fields.
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.context.today = today;
        self
    }

    /// Draw `instructions` onto an open handle.
    ///
    /// Instructions are stably ordered by category (signatures, text, dates,
    /// checkboxes, radio groups, dropdowns, textareas, tables), so later
    /// categories paint over earlier ones and fields of one category keep
    /// their given order. Every field is checked and built before the first
    /// one is painted: a bad field leaves the handle untouched.
    #[instrument(skip_all, fields(fields = instructions.len()))]
    pub fn apply(&self, doc: &mut PdfDocument, mut instructions: Vec<FieldPlacement>) -> Result<()> {
        instructions.sort_by_key(FieldPlacement::category);

        let drawings = instructions
            .iter()
            .map(|field| {
                render::build_canvas(doc, field, &self.context).map(|canvas| (field.page(), canvas))
            })
            .collect::<Result<Vec<_>>>()?;

        for (page, canvas) in drawings {
            doc.paint(page, canvas)?;
        }
        Ok(())
    }

    /// Load `input`, draw `instructions`, and serialise the result. The input
    /// bytes are never modified.
    #[instrument(skip_all, fields(bytes_len = input.len(), fields = instructions.len()))]
    pub fn compose(&self, input: &[u8], instructions: Vec<FieldPlacement>) -> Result<Vec<u8>> {
        let field_count = instructions.len();
        let mut doc = PdfDocument::load(input)?;
        self.apply(&mut doc, instructions)?;
        let output = doc.save(&SaveOptions {
            compress: self.config.compress_output,
        })?;
        info!(field_count, output_bytes = output.len(), "Fields composed");
        Ok(output)
    }

    /// [`compose`](Self::compose) for a batch grouped by category.
    pub fn apply_batch(&self, input: &[u8], batch: FieldBatch) -> Result<Vec<u8>> {
        self.compose(input, batch.into_instructions())
    }
}

/// Apply a grouped batch with the default configuration and today's date.
pub fn add_multiple_fields(input: &[u8], batch: FieldBatch) -> Result<Vec<u8>> {
    Composer::default().apply_batch(input, batch)
}
