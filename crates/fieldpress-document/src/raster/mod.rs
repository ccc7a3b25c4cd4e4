// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterization — render a page to PNG and derive bounded thumbnails.
//
// Pages are painted onto a white tiny-skia pixmap by interpreting their
// content streams; the result is encoded through `ImageProcessor`.

mod color;
mod fonts;
mod images;
mod interpreter;

use fieldpress_core::error::{FieldpressError, Result};
use fieldpress_core::{EngineConfig, RenderOptions, ThumbnailOptions};
use image::{DynamicImage, RgbaImage};
use tiny_skia::{Pixmap, Transform};
use tracing::{debug, info, instrument};

use crate::image::ImageProcessor;
use crate::pdf::objects;
use crate::pdf::PdfDocument;
use fonts::FallbackFaces;
use interpreter::Interpreter;

/// Largest accepted output dimension, in pixels.
pub const MAX_DIMENSION: u32 = 20_000;

/// Scale thumbnails are rendered at before downsizing.
pub const THUMBNAIL_RENDER_SCALE: f32 = 2.0;

/// Page renderer. Works purely in memory: fallback faces for non-embedded
/// fonts are handed in as bytes, and without them such text is not drawn.
pub struct Rasterizer {
    fonts: FallbackFaces,
    thumbnail_scale: f32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            fonts: FallbackFaces::default(),
            thumbnail_scale: THUMBNAIL_RENDER_SCALE,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            thumbnail_scale: config.thumbnail_scale,
            ..Self::new()
        }
    }

    /// Use these TrueType/OpenType programs for fonts that embed none.
    /// `bold` serves bold, black, and heavy base fonts when given.
    pub fn with_fallback_faces(mut self, regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<Self> {
        self.fonts = FallbackFaces::new(regular, bold)?;
        Ok(self)
    }

    /// Render one page to PNG bytes.
    #[instrument(skip(self, doc), fields(scale = options.scale))]
    pub fn render_page(
        &self,
        doc: &PdfDocument,
        page_index: usize,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        let image = self.render_image(doc, page_index, options)?;
        let png = ImageProcessor::from_dynamic(image).to_png_bytes()?;
        info!(page = page_index, png_bytes = png.len(), "Page rendered");
        Ok(png)
    }

    /// Render page 0 at the thumbnail scale and shrink it into the box.
    #[instrument(skip(self, doc))]
    pub fn thumbnail(&self, doc: &PdfDocument, options: &ThumbnailOptions) -> Result<Vec<u8>> {
        if options.max_width == 0 || options.max_height == 0 {
            return Err(FieldpressError::MalformedField(format!(
                "thumbnail box {}x{} must be at least 1x1",
                options.max_width, options.max_height
            )));
        }
        let image = self.render_image(doc, 0, &RenderOptions::at_scale(self.thumbnail_scale))?;
        let png = ImageProcessor::from_dynamic(image)
            .fit_within(options.max_width, options.max_height)
            .to_png_bytes()?;
        info!(png_bytes = png.len(), "Thumbnail generated");
        Ok(png)
    }

    /// Render one page to an opaque RGB image.
    pub fn render_image(
        &self,
        doc: &PdfDocument,
        page_index: usize,
        options: &RenderOptions,
    ) -> Result<DynamicImage> {
        let pixmap = self.render_pixmap(doc, page_index, options)?;
        let (width, height) = (pixmap.width(), pixmap.height());
        // The background is opaque, so premultiplied and straight RGBA agree.
        let rgba = RgbaImage::from_raw(width, height, pixmap.take()).ok_or_else(|| {
            FieldpressError::Render("pixel buffer does not match its dimensions".to_string())
        })?;
        Ok(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()))
    }

    fn render_pixmap(
        &self,
        doc: &PdfDocument,
        page_index: usize,
        options: &RenderOptions,
    ) -> Result<Pixmap> {
        let page_id = doc.page_id(page_index)?;
        let lopdf = doc.as_lopdf();
        let media_box = objects::media_box(lopdf, page_id);
        let rotation = objects::rotation(lopdf, page_id);
        let (page_w, page_h) = (media_box[2] - media_box[0], media_box[3] - media_box[1]);
        let (shown_w, shown_h) = if rotation % 180 == 90 {
            (page_h, page_w)
        } else {
            (page_w, page_h)
        };

        let (width, height) = viewport(shown_w, shown_h, options)?;
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            FieldpressError::Render(format!("cannot allocate a {width}x{height} pixmap"))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let base = page_transform(
            media_box,
            rotation,
            width as f32 / shown_w,
            height as f32 / shown_h,
        );
        let content = lopdf.get_and_decode_page_content(page_id).map_err(|err| {
            FieldpressError::Render(format!("page {page_index} content is unreadable: {err}"))
        })?;
        let resources = objects::inherited(lopdf, page_id, b"Resources")
            .and_then(|r| objects::resolve_dict(lopdf, r));
        debug!(
            width,
            height,
            rotation,
            operators = content.operations.len(),
            "Interpreting page content"
        );

        Interpreter::new(lopdf, &self.fonts, &mut pixmap, base).run(&content.operations, resources);
        Ok(pixmap)
    }
}

/// Render one page to PNG without fallback faces.
pub fn render_page_to_image(doc: &PdfDocument, page_index: usize, options: &RenderOptions) -> Result<Vec<u8>> {
    Rasterizer::default().render_page(doc, page_index, options)
}

/// PNG thumbnail of page 0, fitted into `options` without upscaling.
pub fn generate_thumbnail(doc: &PdfDocument, options: &ThumbnailOptions) -> Result<Vec<u8>> {
    Rasterizer::default().thumbnail(doc, options)
}

/// Output size in pixels for a page shown at `width_pt` × `height_pt`.
/// Explicit dimensions win over the scale; a single explicit dimension
/// derives the other from the page's aspect ratio.
pub fn viewport(width_pt: f32, height_pt: f32, options: &RenderOptions) -> Result<(u32, u32)> {
    let derive = |value: f32| value.round().max(1.0);
    let (width, height) = match (options.width, options.height) {
        (Some(w), Some(h)) => (w as f32, h as f32),
        (Some(w), None) => (w as f32, derive(w as f32 * height_pt / width_pt)),
        (None, Some(h)) => (derive(h as f32 * width_pt / height_pt), h as f32),
        (None, None) => {
            if !options.scale.is_finite() || options.scale <= 0.0 {
                return Err(FieldpressError::Render(format!(
                    "scale must be positive, got {}",
                    options.scale
                )));
            }
            (derive(width_pt * options.scale), derive(height_pt * options.scale))
        }
    };
    let limit = MAX_DIMENSION as f32;
    if !(1.0..=limit).contains(&width) || !(1.0..=limit).contains(&height) {
        return Err(FieldpressError::Render(format!(
            "output size {width}x{height} is outside 1..={MAX_DIMENSION} pixels"
        )));
    }
    Ok((width as u32, height as u32))
}

/// Maps PDF user space to pixels: move the media box origin to the top-left,
/// flip y, apply `/Rotate` clockwise, then scale.
fn page_transform(media_box: [f32; 4], rotation: i64, sx: f32, sy: f32) -> Transform {
    let [x0, y0, x1, y1] = media_box;
    let (w, h) = (x1 - x0, y1 - y0);
    let flip = Transform::from_row(1.0, 0.0, 0.0, -1.0, -x0, y1);
    let rotate = match rotation {
        90 => Transform::from_row(0.0, 1.0, -1.0, 0.0, h, 0.0),
        180 => Transform::from_row(-1.0, 0.0, 0.0, -1.0, w, h),
        270 => Transform::from_row(0.0, -1.0, 1.0, 0.0, 0.0, w),
        _ => Transform::identity(),
    };
    Transform::from_scale(sx, sy).pre_concat(rotate).pre_concat(flip)
}
