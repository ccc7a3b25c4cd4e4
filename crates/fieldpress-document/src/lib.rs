// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fieldpress-document — PDF field composition for Fieldpress.
//
// Opens PDFs into editable handles, draws field placements (signatures,
// text, dates, checkboxes, radio groups, dropdowns, textareas, tables) onto
// their pages, performs page-level operations (merge, extract, rotate,
// watermark, certificate, flatten, optimize), and rasterizes pages to PNG.

pub mod compose;
pub mod image;
pub mod layout;
pub mod pdf;
pub mod raster;
pub mod render;

// Lets the fixture module shared with tests/ name this crate by its path.
#[cfg(test)]
extern crate self as fieldpress_document;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_support;

// Re-export the primary entry points so callers can use
// `fieldpress_document::PdfDocument` etc.
pub use crate::compose::{Composer, add_multiple_fields};
pub use crate::image::ImageProcessor;
pub use crate::pdf::integrity::hash_bytes;
pub use crate::pdf::{PageCanvas, PdfDocument};
pub use crate::raster::{Rasterizer, generate_thumbnail, render_page_to_image};
pub use crate::render::{RenderContext, draw_field};
