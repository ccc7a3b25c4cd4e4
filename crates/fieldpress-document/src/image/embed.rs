// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature image intake — decode an inline (optionally data-URL) base64
// image, negotiate PNG then JPEG, and prepare the pixel data as a PDF image
// XObject.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fieldpress_core::error::{FieldpressError, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat};
use lopdf::{Dictionary, Object, Stream};
use tracing::debug;

/// Pixel data ready to be written as an image XObject.
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
    /// Flate-compressed 8-bit alpha channel, present only when some pixel is
    /// not fully opaque.
    alpha: Option<Vec<u8>>,
}

impl PdfImage {
    /// Image XObject stream, pointing at `smask` when one was written.
    pub(crate) fn xobject(&self, smask: Option<lopdf::ObjectId>) -> Stream {
        let mut dict = image_dict(self.width, self.height, self.color_space, self.filter);
        if let Some(id) = smask {
            dict.set("SMask", Object::Reference(id));
        }
        Stream::new(dict, self.data.clone()).with_compression(false)
    }

    /// Soft-mask stream carrying the alpha channel, if any.
    pub(crate) fn smask(&self) -> Option<Stream> {
        self.alpha.as_ref().map(|alpha| {
            let dict = image_dict(self.width, self.height, "DeviceGray", "FlateDecode");
            Stream::new(dict, alpha.clone()).with_compression(false)
        })
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Whether the encoded bytes are carried through as JPEG.
    pub fn is_jpeg_passthrough(&self) -> bool {
        self.filter == "DCTDecode"
    }
}

fn image_dict(width: u32, height: u32, color_space: &str, filter: &str) -> Dictionary {
    Dictionary::from_iter([
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(width))),
        ("Height", Object::Integer(i64::from(height))),
        ("ColorSpace", Object::Name(color_space.as_bytes().to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(filter.as_bytes().to_vec())),
    ])
}

/// Decode a base64 image string. A `data:<mime>;base64,` prefix is removed
/// first; whitespace inside the payload is ignored.
pub fn decode_base64_image(encoded: &str) -> Result<PdfImage> {
    let payload = match encoded.trim_start().strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes()).map_err(|err| {
        FieldpressError::MalformedField(format!("signature image is not valid base64: {err}"))
    })?;
    decode_image_bytes(&bytes)
}

/// Decode raw image bytes: PNG first, then JPEG.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<PdfImage> {
    if let Ok(png) = image::load_from_memory_with_format(bytes, ImageFormat::Png) {
        debug!(width = png.width(), height = png.height(), "Signature decoded as PNG");
        return raw_image(&png);
    }
    match image::load_from_memory_with_format(bytes, ImageFormat::Jpeg) {
        Ok(jpeg) => {
            debug!(width = jpeg.width(), height = jpeg.height(), "Signature decoded as JPEG");
            let color_space = match jpeg_components(bytes) {
                Some(1) => Some("DeviceGray"),
                Some(3) => Some("DeviceRGB"),
                _ => None,
            };
            match color_space {
                Some(color_space) => Ok(PdfImage {
                    width: jpeg.width(),
                    height: jpeg.height(),
                    color_space,
                    filter: "DCTDecode",
                    data: bytes.to_vec(),
                    alpha: None,
                }),
                None => raw_image(&jpeg),
            }
        }
        Err(_) => Err(FieldpressError::UnsupportedImageFormat(
            "signature image is neither PNG nor JPEG".to_string(),
        )),
    }
}

/// Re-encode decoded pixels as Flate RGB plus an optional alpha mask.
fn raw_image(image: &DynamicImage) -> Result<PdfImage> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixel_count = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }
    let translucent = alpha.iter().any(|&a| a < u8::MAX);
    Ok(PdfImage {
        width,
        height,
        color_space: "DeviceRGB",
        filter: "FlateDecode",
        data: deflate(&rgb)?,
        alpha: if translucent { Some(deflate(&alpha)?) } else { None },
    })
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Number of colour components declared in a JPEG's start-of-frame header.
fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    if bytes.get(..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = bytes[pos + 1];
        match marker {
            0xFF => {
                pos += 1;
                continue;
            }
            0x01 | 0xD0..=0xD9 => {
                pos += 2;
                continue;
            }
            _ => {}
        }
        let length = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }
        pos += 2 + length;
    }
    None
}
