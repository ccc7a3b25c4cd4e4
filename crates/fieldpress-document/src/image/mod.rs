// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — signature image intake and raster post-processing.

pub mod embed;
pub mod processor;

pub use embed::{PdfImage, decode_base64_image, decode_image_bytes};
pub use processor::ImageProcessor;
