// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field composition through the public API: JSON placements in, PDF bytes out.

mod common;

use chrono::NaiveDate;
use common::{
    field, fixture_pdf, page_byte_strings, page_content, page_count, page_operators, page_sizes,
    page_strings, png_base64,
};
use fieldpress_core::{EngineConfig, FieldBatch, FieldpressError};
use fieldpress_document::{Composer, PdfDocument, add_multiple_fields};
use serde_json::json;

fn composer() -> Composer {
    Composer::new(EngineConfig::default()).with_date(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
}

fn every_field_kind(page: usize) -> Vec<fieldpress_core::FieldPlacement> {
    vec![
        field(json!({
            "type": "signature", "page": page, "x": 50, "y": 600, "width": 120, "height": 40,
            "image": format!("data:image/png;base64,{}", png_base64(4, 2, [0, 0, 128, 255])),
        })),
        field(json!({"type": "text", "page": page, "x": 50, "y": 560, "text": "Jane Doe", "color": "#1F2937"})),
        field(json!({"type": "date", "page": page, "x": 50, "y": 540, "format": "iso"})),
        field(json!({"type": "checkbox", "page": page, "x": 50, "y": 500, "width": 14, "height": 14, "checked": true})),
        field(json!({
            "type": "radio_group", "page": page, "x": 50, "y": 400, "width": 200, "height": 80,
            "options": [{"label": "Yes", "value": "y"}, {"label": "No", "value": "n"}],
            "selectedValue": "n",
        })),
        field(json!({
            "type": "dropdown", "page": page, "x": 300, "y": 500, "width": 150, "height": 24,
            "options": [{"label": "Red", "value": "r"}], "selectedValue": "r",
        })),
        field(json!({
            "type": "textarea", "page": page, "x": 300, "y": 300, "width": 200, "height": 150,
            "text": "Terms and conditions apply to every line written here.",
        })),
        field(json!({
            "type": "table", "page": page, "x": 50, "y": 250, "width": 300,
            "columns": [
                {"id": "item", "name": "Item"},
                {"id": "qty", "name": "Qty", "type": "number", "width": 60},
                {"id": "ok", "name": "OK", "type": "checkbox", "width": 40},
            ],
            "rows": [{"values": {"item": "Widget", "qty": 3, "ok": true}}],
        })),
    ]
}

#[test]
fn every_field_kind_composes_onto_one_page() {
    let input = fixture_pdf(&[(612.0, 792.0), (612.0, 792.0)]);
    let output = composer().compose(&input, every_field_kind(0)).unwrap();

    assert_eq!(page_count(&output), 2);
    let strings = page_strings(&output, 0);
    for expected in ["Page 1", "Jane Doe", "2025-03-07", "No", "Red", "Item", "Widget", "3"] {
        assert!(strings.iter().any(|s| s == expected), "missing {expected:?} in {strings:?}");
    }
    assert!(page_operators(&output, 0).contains(&"Do".to_string()), "signature image is painted");
}

#[test]
fn drawing_on_one_page_leaves_the_others_alone() {
    let input = fixture_pdf(&[(612.0, 792.0), (300.0, 400.0), (612.0, 792.0)]);
    let output = composer().compose(&input, every_field_kind(1)).unwrap();

    assert_eq!(page_sizes(&output), page_sizes(&input));
    for untouched in [0, 2] {
        assert_eq!(page_content(&output, untouched), page_content(&input, untouched));
    }
    assert_ne!(page_content(&output, 1), page_content(&input, 1));
}

#[test]
fn out_of_range_page_fails_and_input_is_unchanged() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let snapshot = input.clone();
    let fields = vec![
        field(json!({"type": "text", "page": 0, "x": 10, "y": 10, "text": "ok"})),
        field(json!({"type": "text", "page": 1, "x": 10, "y": 10, "text": "too far"})),
    ];

    let err = composer().compose(&input, fields).unwrap_err();
    assert!(matches!(err, FieldpressError::PageNotFound { page: 1, page_count: 1 }));
    assert_eq!(input, snapshot);
    assert_eq!(page_strings(&input, 0), vec!["Page 1"]);
}

#[test]
fn failed_batch_does_not_touch_an_open_handle() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let mut doc = PdfDocument::load(&input).unwrap();
    let mut fields = every_field_kind(0);
    fields.push(field(json!({"type": "checkbox", "page": 4, "x": 0, "y": 0, "width": 10, "height": 10})));

    assert!(composer().apply(&mut doc, fields).is_err());
    let saved = doc.save(&Default::default()).unwrap();
    assert_eq!(page_content(&saved, 0), page_content(&input, 0));
}

#[test]
fn largest_page_index_is_page_not_found() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let far = field(json!({"type": "text", "page": u64::MAX, "x": 10, "y": 10, "text": "x"}));
    let err = composer().compose(&input, vec![far]).unwrap_err();
    assert!(matches!(err, FieldpressError::PageNotFound { page_count: 1, .. }));
}

#[test]
fn unusable_locale_date_pattern_is_malformed() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let config = EngineConfig {
        locale_date_format: "%Q".into(),
        ..EngineConfig::default()
    };
    let date = field(json!({"type": "date", "page": 0, "x": 10, "y": 10, "format": "locale"}));
    let err = Composer::new(config).compose(&input, vec![date]).unwrap_err();
    assert!(matches!(err, FieldpressError::MalformedField(_)));
}

#[test]
fn undecodable_signature_is_rejected() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let bad = field(json!({
        "type": "signature", "page": 0, "x": 0, "y": 0, "width": 10, "height": 10,
        "image": "R0lGODlhAQABAAAAACw=",
    }));
    let err = composer().compose(&input, vec![bad]).unwrap_err();
    assert!(matches!(err, FieldpressError::UnsupportedImageFormat(_)));
}

#[test]
fn long_textarea_text_wraps_and_overwide_words_are_truncated() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let output = composer()
        .compose(
            &input,
            vec![
                field(json!({
                    "type": "textarea", "page": 0, "x": 50, "y": 400, "width": 120, "height": 200,
                    "text": "the quick brown fox jumps over the lazy dog again and again",
                })),
                field(json!({
                    "type": "textarea", "page": 0, "x": 300, "y": 400, "width": 60, "height": 40,
                    "text": "Supercalifragilisticexpialidocious",
                })),
            ],
        )
        .unwrap();

    let strings = page_strings(&output, 0);
    let wrapped: Vec<_> = strings
        .iter()
        .filter(|s| ["the", "fox", "over", "lazy", "again"].iter().any(|w| s.contains(w)))
        .collect();
    assert!(wrapped.len() >= 2, "expected wrapped lines in {strings:?}");
    // The ellipsis is WinAnsi 0x85.
    let truncated = page_byte_strings(&output, 0)
        .into_iter()
        .find(|s| s.starts_with(b"Super"))
        .unwrap();
    assert_eq!(truncated.last(), Some(&0x85));
    assert!(truncated.len() < "Supercalifragilisticexpialidocious".len());
}

#[test]
fn checkbox_marks_differ_by_style() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let draw = |checked: bool, style: &str| {
        let output = composer()
            .compose(
                &input,
                vec![field(json!({
                    "type": "checkbox", "page": 0, "x": 100, "y": 100, "width": 20, "height": 20,
                    "checked": checked, "style": style,
                }))],
            )
            .unwrap();
        let operators = page_operators(&output, 0);
        let count = |name: &str| operators.iter().filter(|op| *op == name).count();
        (count("m"), count("l"))
    };

    assert_eq!(draw(false, "x"), (0, 0));
    assert_eq!(draw(true, "x"), (2, 2));
    assert_eq!(draw(true, "checkmark"), (1, 2));
}

#[test]
fn grouped_batch_from_json_applies_in_one_pass() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let batch: FieldBatch = serde_json::from_value(json!({
        "texts": [{"page": 0, "x": 10, "y": 700, "text": "Batch text"}],
        "checkboxes": [{"page": 0, "x": 10, "y": 650, "width": 12, "height": 12, "checked": true}],
    }))
    .unwrap();
    assert_eq!(batch.len(), 2);

    let output = add_multiple_fields(&input, batch).unwrap();
    assert!(page_strings(&output, 0).contains(&"Batch text".to_string()));
}

#[test]
fn compressed_output_keeps_content() {
    let input = fixture_pdf(&[(612.0, 792.0)]);
    let config = EngineConfig {
        compress_output: true,
        ..EngineConfig::default()
    };
    let output = Composer::new(config)
        .compose(&input, vec![field(json!({"type": "text", "page": 0, "x": 10, "y": 10, "text": "packed"}))])
        .unwrap();
    assert_eq!(page_strings(&output, 0), vec!["Page 1", "packed"]);
}
