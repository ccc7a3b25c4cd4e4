// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature field — an inline image stretched over the field box.

use fieldpress_core::error::Result;
use fieldpress_core::fields::SignatureField;
use tracing::debug;

use crate::image::decode_base64_image;
use crate::pdf::canvas::PageCanvas;

pub fn canvas(field: &SignatureField) -> Result<PageCanvas> {
    let image = decode_base64_image(&field.image)?;
    debug!(
        pixels_w = image.width,
        pixels_h = image.height,
        jpeg = image.is_jpeg_passthrough(),
        "Signature image prepared"
    );
    let mut canvas = PageCanvas::new();
    canvas.image(image, field.x, field.y, field.width, field.height);
    Ok(canvas)
}
