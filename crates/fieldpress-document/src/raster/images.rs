// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image XObjects decoded to premultiplied tiny-skia pixmaps.

use lopdf::{Dictionary, Document, Object, Stream};
use tiny_skia::Pixmap;
use tracing::warn;

use crate::pdf::objects;
use crate::raster::color::{self, ColorSpace};

/// Decode an image XObject. Stencil masks (`/ImageMask true`) are painted
/// with `fill`. Returns `None` for encodings that cannot be drawn.
pub(crate) fn decode(
    doc: &Document,
    stream: &Stream,
    resources: Option<&Dictionary>,
    fill: [f32; 3],
) -> Option<Pixmap> {
    let dict = &stream.dict;
    let width = dimension(doc, dict, b"Width")?;
    let height = dimension(doc, dict, b"Height")?;

    let mut rgba = match last_filter(dict).as_deref() {
        Some(b"DCTDecode") => decode_jpeg(&stream.content, width, height)?,
        Some(b"JPXDecode") | Some(b"JBIG2Decode") | Some(b"CCITTFaxDecode") => {
            warn!("Unsupported image filter, image skipped");
            return None;
        }
        _ => {
            let data = stream.get_plain_content().ok()?;
            if flag(dict, b"ImageMask") {
                decode_stencil(&data, width, height, inverted_decode(doc, dict), fill)?
            } else {
                decode_samples(doc, dict, resources, &data, width, height)?
            }
        }
    };

    if let Some(alpha) = dict
        .get(b"SMask")
        .ok()
        .and_then(|mask| soft_mask(doc, mask, width, height))
    {
        for (pixel, a) in rgba.chunks_exact_mut(4).zip(alpha) {
            pixel[3] = a;
        }
    }

    pixmap_from_rgba(&rgba, width, height)
}

fn dimension(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<u32> {
    let value = objects::number(doc, dict.get(key).ok()?)?;
    (value >= 1.0).then_some(value as u32)
}

fn flag(dict: &Dictionary, key: &[u8]) -> bool {
    matches!(dict.get(key), Ok(Object::Boolean(true)))
}

fn last_filter(dict: &Dictionary) -> Option<Vec<u8>> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.clone()),
        Object::Array(filters) => filters.last()?.as_name().ok().map(<[u8]>::to_vec),
        _ => None,
    }
}

/// `/Decode [1 0]` flips a stencil's meaning.
fn inverted_decode(doc: &Document, dict: &Dictionary) -> bool {
    let Some(Object::Array(decode)) = dict.get(b"Decode").ok().and_then(|d| objects::resolve(doc, d)) else {
        return false;
    };
    decode.first().and_then(|v| objects::number(doc, v)) == Some(1.0)
}

fn decode_jpeg(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|err| warn!(error = %err, "JPEG image could not be decoded"))
        .ok()?;
    let rgba = decoded.to_rgba8();
    if rgba.dimensions() != (width, height) {
        warn!("JPEG dimensions disagree with the image dictionary");
    }
    let (w, h) = rgba.dimensions();
    (w == width && h == height).then(|| rgba.into_raw())
}

/// Unpack `width × height × components` samples of `bpc` bits, rows padded
/// to whole bytes.
pub(crate) fn unpack_samples(
    data: &[u8],
    width: u32,
    height: u32,
    components: usize,
    bpc: u32,
) -> Option<Vec<u16>> {
    if !matches!(bpc, 1 | 2 | 4 | 8 | 16) {
        return None;
    }
    let per_row = width as usize * components;
    let row_bytes = (per_row * bpc as usize).div_ceil(8);
    if data.len() < row_bytes * height as usize {
        return None;
    }
    let mut samples = Vec::with_capacity(per_row * height as usize);
    for row in data.chunks_exact(row_bytes).take(height as usize) {
        match bpc {
            8 => samples.extend(row.iter().map(|&b| u16::from(b))),
            16 => samples.extend(row.chunks_exact(2).map(|p| u16::from_be_bytes([p[0], p[1]]))),
            _ => {
                let mask = (1u16 << bpc) - 1;
                for index in 0..per_row {
                    let bit = index * bpc as usize;
                    let byte = u16::from(row[bit / 8]);
                    let shift = 8 - bpc as usize - bit % 8;
                    samples.push((byte >> shift) & mask);
                }
            }
        }
    }
    Some(samples)
}

fn decode_samples(
    doc: &Document,
    dict: &Dictionary,
    resources: Option<&Dictionary>,
    data: &[u8],
    width: u32,
    height: u32,
) -> Option<Vec<u8>> {
    let space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|cs| color::parse(doc, cs, resources))
        .unwrap_or(ColorSpace::Gray);
    let bpc = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|b| objects::number(doc, b))
        .unwrap_or(8.0) as u32;
    let components = space.components().max(1);
    let Some(samples) = unpack_samples(data, width, height, components, bpc) else {
        warn!(bpc, components, "Image data is short or has an unsupported depth");
        return None;
    };
    let max = if bpc == 16 { u16::MAX } else { (1u16 << bpc) - 1 };

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for pixel in samples.chunks_exact(components) {
        let [r, g, b] = space.sample_to_rgb(pixel, max);
        rgba.extend_from_slice(&[r, g, b, 255]);
    }
    Some(rgba)
}

fn decode_stencil(data: &[u8], width: u32, height: u32, inverted: bool, fill: [f32; 3]) -> Option<Vec<u8>> {
    let samples = unpack_samples(data, width, height, 1, 1)?;
    let [r, g, b] = fill.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    let painted_bit = u16::from(inverted);
    Some(
        samples
            .iter()
            .flat_map(|&bit| if bit == painted_bit { [r, g, b, 255] } else { [0, 0, 0, 0] })
            .collect(),
    )
}

/// Alpha channel from an `/SMask` image of matching size.
fn soft_mask(doc: &Document, mask: &Object, width: u32, height: u32) -> Option<Vec<u8>> {
    let Object::Stream(stream) = objects::resolve(doc, mask)? else {
        return None;
    };
    if dimension(doc, &stream.dict, b"Width") != Some(width)
        || dimension(doc, &stream.dict, b"Height") != Some(height)
    {
        warn!("Soft mask size differs from its image, mask ignored");
        return None;
    }
    let bpc = stream
        .dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|b| objects::number(doc, b))
        .unwrap_or(8.0) as u32;
    let data = stream.get_plain_content().ok()?;
    let samples = unpack_samples(&data, width, height, 1, bpc)?;
    let max = if bpc == 16 { f32::from(u16::MAX) } else { f32::from((1u16 << bpc) - 1) };
    Some(
        samples
            .iter()
            .map(|&s| (f32::from(s) / max * 255.0).round() as u8)
            .collect(),
    )
}

/// Straight RGBA bytes to a premultiplied pixmap.
pub(crate) fn pixmap_from_rgba(rgba: &[u8], width: u32, height: u32) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)?;
    for (src, dst) in rgba.chunks_exact(4).zip(pixmap.data_mut().chunks_exact_mut(4)) {
        let a = src[3];
        dst[0] = premultiply(src[0], a);
        dst[1] = premultiply(src[1], a);
        dst[2] = premultiply(src[2], a);
        dst[3] = a;
    }
    Some(pixmap)
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    let product = u16::from(channel) * u16::from(alpha) + 127;
    ((product + (product >> 8)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_stream(entries: Vec<(&str, Object)>, data: Vec<u8>) -> Stream {
        let mut dict = Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
        ]);
        for (key, value) in entries {
            dict.set(key, value);
        }
        Stream::new(dict, data).with_compression(false)
    }

    #[test]
    fn one_bit_samples_unpack_with_row_padding() {
        // 3 pixels per row: 101 then padding; 010 then padding.
        let samples = unpack_samples(&[0b1010_0000, 0b0100_0000], 3, 2, 1, 1).unwrap();
        assert_eq!(samples, vec![1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn short_data_is_rejected() {
        assert!(unpack_samples(&[0, 0, 0], 2, 1, 3, 8).is_none());
        assert!(unpack_samples(&[0; 16], 2, 1, 3, 3).is_none());
    }

    #[test]
    fn rgb_image_decodes_to_opaque_pixels() {
        let doc = Document::with_version("1.7");
        let stream = image_stream(
            vec![
                ("Width", Object::Integer(2)),
                ("Height", Object::Integer(1)),
                ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
                ("BitsPerComponent", Object::Integer(8)),
            ],
            vec![255, 0, 0, 0, 0, 255],
        );
        let pixmap = decode(&doc, &stream, None, [0.0; 3]).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (2, 1));
        assert_eq!(pixmap.data(), &[255, 0, 0, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn stencil_mask_paints_the_fill_colour() {
        let doc = Document::with_version("1.7");
        let stream = image_stream(
            vec![
                ("Width", Object::Integer(2)),
                ("Height", Object::Integer(1)),
                ("ImageMask", Object::Boolean(true)),
            ],
            vec![0b0100_0000],
        );
        let pixmap = decode(&doc, &stream, None, [0.0, 1.0, 0.0]).unwrap();
        assert_eq!(pixmap.data(), &[0, 255, 0, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn soft_mask_sets_alpha() {
        let mut doc = Document::with_version("1.7");
        let mask = doc.add_object(image_stream(
            vec![
                ("Width", Object::Integer(2)),
                ("Height", Object::Integer(1)),
                ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
                ("BitsPerComponent", Object::Integer(8)),
            ],
            vec![255, 0],
        ));
        let stream = image_stream(
            vec![
                ("Width", Object::Integer(2)),
                ("Height", Object::Integer(1)),
                ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
                ("BitsPerComponent", Object::Integer(8)),
                ("SMask", Object::Reference(mask)),
            ],
            vec![0, 0],
        );
        let pixmap = decode(&doc, &stream, None, [0.0; 3]).unwrap();
        assert_eq!(pixmap.data()[3], 255);
        assert_eq!(pixmap.data()[7], 0);
    }
}
