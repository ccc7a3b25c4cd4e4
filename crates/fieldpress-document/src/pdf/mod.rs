// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the document store, content-stream canvas, and page-level
// operations (merge, extract, rotate, watermark, certificate, flatten).

pub mod canvas;
pub mod flatten;
pub mod integrity;
pub mod objects;
pub mod pages;
pub mod store;

pub use canvas::PageCanvas;
pub use store::PdfDocument;
