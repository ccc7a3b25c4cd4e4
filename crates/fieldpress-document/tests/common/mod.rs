// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixture documents and content inspection, shared by the unit tests and the
// integration tests.

#![allow(dead_code)]

use fieldpress_core::FieldPlacement;
use fieldpress_document::layout::metrics::decode_win_ansi;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

/// A PDF with one page per `(width, height)`. Page N shows the string
/// "Page N" and a grey rectangle, with resources on each page.
pub fn fixture_pdf(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));

    let mut kids = Vec::new();
    for (index, &(width, height)) in sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("rg", vec![Object::Real(0.5), Object::Real(0.5), Object::Real(0.5)]),
                Operation::new(
                    "re",
                    vec![Object::Integer(5), Object::Integer(5), Object::Integer(10), Object::Integer(10)],
                ),
                Operation::new("f", vec![]),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(20), Object::Integer(20)]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", index + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            (
                "Resources",
                Object::Dictionary(Dictionary::from_iter([(
                    "Font",
                    Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
                )])),
            ),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A one-page lopdf document whose page paints `content`. `resources` builds
/// the page's resource dictionary and may add objects it refers to.
pub fn single_page(
    (width, height): (f32, f32),
    content: &str,
    resources: impl FnOnce(&mut Document) -> Dictionary,
) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let resources = resources(&mut doc);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.as_bytes().to_vec()));
    let page_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Dictionary(resources)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ]),
        ),
    ]));
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Count", Object::Integer(1)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

/// `(width, height)` of every page, from its own media box.
pub fn page_sizes(bytes: &[u8]) -> Vec<(f32, f32)> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            let value = |i: usize| media_box[i].as_float().unwrap();
            (value(2) - value(0), value(3) - value(1))
        })
        .collect()
}

/// Operations of one page's decoded content.
pub fn page_operations(bytes: &[u8], page_index: usize) -> Vec<Operation> {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = doc.get_pages()[&(page_index as u32 + 1)];
    doc.get_and_decode_page_content(page_id).unwrap().operations
}

/// One page's content re-encoded, for comparing pages byte for byte.
pub fn page_content(bytes: &[u8], page_index: usize) -> Vec<u8> {
    Content {
        operations: page_operations(bytes, page_index),
    }
    .encode()
    .unwrap()
}

pub fn page_operators(bytes: &[u8], page_index: usize) -> Vec<String> {
    page_operations(bytes, page_index)
        .into_iter()
        .map(|op| op.operator)
        .collect()
}

/// Raw bytes of every string shown with `Tj` on a page.
pub fn page_byte_strings(bytes: &[u8], page_index: usize) -> Vec<Vec<u8>> {
    page_operations(bytes, page_index)
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.into_iter().next() {
            Some(Object::String(raw, _)) => Some(raw),
            _ => None,
        })
        .collect()
}

/// Strings shown with `Tj` on a page, decoded from WinAnsi.
pub fn page_strings(bytes: &[u8], page_index: usize) -> Vec<String> {
    page_byte_strings(bytes, page_index)
        .iter()
        .map(|raw| raw.iter().map(|&b| decode_win_ansi(b)).collect())
        .collect()
}

/// Parse one field placement from its JSON form.
pub fn field(json: serde_json::Value) -> FieldPlacement {
    serde_json::from_value(json).unwrap()
}

/// A base64 PNG of the given size, filled with one colour.
pub fn png_base64(width: u32, height: u32, rgba: [u8; 4]) -> String {
    use base64::Engine;
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    base64::engine::general_purpose::STANDARD.encode(png)
}
