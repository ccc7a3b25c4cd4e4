// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — post-processing for rasterized pages: bounded
// downscaling for thumbnails and PNG encoding. Operates on in-memory images
// using the `image` crate.

use image::{DynamicImage, ImageFormat};
use fieldpress_core::error::FieldpressError;
use tracing::{debug, instrument};

/// Processing pipeline over a single in-memory image.
///
/// Each transformation consumes `self` and returns a new processor, so calls
/// chain:
///
/// ```ignore
/// let png = ImageProcessor::from_dynamic(page)
///     .fit_within(200, 300)
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations ------------------------------------------------------

    /// Shrink the image to fit within `max_width` x `max_height`, preserving
    /// aspect ratio. Images that already fit are returned untouched: this
    /// never upscales.
    #[instrument(skip(self), fields(max_width, max_height))]
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        let (target_w, target_h) = fitted_size(width, height, max_width, max_height);
        if (target_w, target_h) == (width, height) {
            return self;
        }
        debug!(
            from_w = width,
            from_h = height,
            target_w,
            target_h,
            "Downscaling image"
        );
        let resized = self.image.resize_exact(
            target_w,
            target_h,
            image::imageops::FilterType::Lanczos3,
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, FieldpressError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }
}

/// Largest size no bigger than `width` x `height` that fits the box while
/// keeping the aspect ratio. Never larger than the input; never zero.
pub fn fitted_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width.max(1), height.max(1));
    }
    let ratio = (max_width as f64 / width as f64)
        .min(max_height as f64 / height as f64)
        .min(1.0);
    if ratio >= 1.0 {
        return (width, height);
    }
    let target_w = ((width as f64 * ratio).round() as u32).clamp(1, max_width.max(1));
    let target_h = ((height as f64 * ratio).round() as u32).clamp(1, max_height.max(1));
    (target_w, target_h)
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, FieldpressError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        FieldpressError::Render(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}
