// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-level operations on whole documents, checked after a save and reload.

mod common;

use common::{fixture_pdf, page_content, page_count, page_operators, page_sizes, page_strings};
use fieldpress_core::{CertificateInfo, FieldpressError, SaveOptions, Signer, WatermarkOptions};
use fieldpress_document::{PdfDocument, hash_bytes};

fn open(sizes: &[(f32, f32)]) -> PdfDocument {
    PdfDocument::load(&fixture_pdf(sizes)).unwrap()
}

fn saved(mut doc: PdfDocument) -> Vec<u8> {
    doc.save(&SaveOptions::default()).unwrap()
}

#[test]
fn merge_appends_documents_in_argument_order() {
    let a = open(&[(612.0, 792.0), (500.0, 500.0)]);
    let b = open(&[(300.0, 400.0)]);
    let bytes = saved(PdfDocument::merge(&[a, b]).unwrap());

    assert_eq!(page_count(&bytes), 3);
    assert_eq!(page_sizes(&bytes), vec![(612.0, 792.0), (500.0, 500.0), (300.0, 400.0)]);
    let labels: Vec<_> = (0..3).map(|i| page_strings(&bytes, i)).collect();
    assert_eq!(labels, vec![vec!["Page 1"], vec!["Page 2"], vec!["Page 1"]]);
}

#[test]
fn merge_of_nothing_is_an_empty_but_valid_document() {
    let bytes = saved(PdfDocument::merge(&[]).unwrap());
    assert_eq!(page_count(&bytes), 0);
    assert!(PdfDocument::load(&bytes).is_ok());
}

#[test]
fn extract_keeps_requested_pages_and_their_content() {
    let doc = open(&[(100.0, 100.0), (200.0, 200.0), (300.0, 300.0)]);
    let bytes = saved(doc.extract_pages(&[0, 2]).unwrap());

    assert_eq!(page_sizes(&bytes), vec![(100.0, 100.0), (300.0, 300.0)]);
    assert_eq!(page_strings(&bytes, 1), vec!["Page 3"]);
}

#[test]
fn extract_rejects_a_missing_page() {
    let doc = open(&[(100.0, 100.0)]);
    let err = doc.extract_pages(&[0, 3]).unwrap_err();
    assert!(matches!(err, FieldpressError::PageNotFound { page: 3, page_count: 1 }));
}

#[test]
fn watermark_stamps_every_page_over_the_original_content() {
    let mut doc = open(&[(612.0, 792.0), (300.0, 400.0), (612.0, 792.0)]);
    doc.add_watermark("CONFIDENTIAL", &WatermarkOptions::default()).unwrap();
    let bytes = saved(doc);

    for page in 0..3 {
        let strings = page_strings(&bytes, page);
        assert_eq!(strings.first().map(String::as_str), Some(format!("Page {}", page + 1).as_str()));
        assert_eq!(strings.last().map(String::as_str), Some("CONFIDENTIAL"));
        assert!(page_operators(&bytes, page).contains(&"gs".to_string()), "opacity is set");
    }
}

#[test]
fn certificate_adds_one_letter_page_listing_signers_in_order() {
    let original = fixture_pdf(&[(300.0, 400.0)]);
    let mut doc = PdfDocument::load(&original).unwrap();
    let info = CertificateInfo {
        document_title: "Lease".into(),
        completed_date: "2025-03-07 10:00 UTC".into(),
        document_id: "doc-42".into(),
        signers: vec![
            Signer {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                signed_at: "2025-03-06".into(),
            },
            Signer {
                name: "Grace".into(),
                email: "grace@example.com".into(),
                signed_at: "2025-03-07".into(),
            },
        ],
        fingerprint: Some(hash_bytes(&original)),
    };
    doc.add_certificate(&info).unwrap();
    let bytes = saved(doc);

    assert_eq!(page_sizes(&bytes), vec![(300.0, 400.0), (612.0, 792.0)]);
    let strings = page_strings(&bytes, 1);
    assert!(strings.contains(&"Document: Lease".to_string()));
    assert!(strings.iter().any(|s| s.starts_with("SHA-256: ") && s.len() == "SHA-256: ".len() + 64));
    let ada = strings.iter().position(|s| s.contains("Ada (ada@example.com)")).unwrap();
    let grace = strings.iter().position(|s| s.contains("Grace (grace@example.com)")).unwrap();
    assert!(ada < grace);
}

#[test]
fn rotation_accumulates_and_rejects_odd_angles() {
    let mut doc = open(&[(612.0, 792.0)]);
    doc.rotate_page(0, 90).unwrap();
    doc.rotate_page(0, 270).unwrap();
    doc.rotate_page(0, -90).unwrap();
    assert!(matches!(doc.rotate_page(0, 45), Err(FieldpressError::MalformedField(_))));

    let bytes = saved(doc);
    let reopened = lopdf::Document::load_mem(&bytes).unwrap();
    let page_id = reopened.get_pages()[&1];
    let rotate = reopened.get_dictionary(page_id).unwrap().get(b"Rotate").unwrap();
    assert_eq!(rotate.as_i64().unwrap(), 270);
}

#[test]
fn flatten_without_a_form_changes_nothing() {
    let original = fixture_pdf(&[(612.0, 792.0)]);
    let mut doc = PdfDocument::load(&original).unwrap();
    assert_eq!(doc.flatten().unwrap(), 0);
    let bytes = saved(doc);
    assert_eq!(page_content(&bytes, 0), page_content(&original, 0));
}

#[test]
fn optimized_output_reloads_with_identical_pages() {
    let mut doc = open(&[(612.0, 792.0), (200.0, 300.0)]);
    doc.add_watermark("DRAFT", &WatermarkOptions::default()).unwrap();
    let plain = doc.save(&SaveOptions::default()).unwrap();
    let optimized = doc.optimize().unwrap();

    assert_eq!(page_sizes(&optimized), page_sizes(&plain));
    for page in 0..2 {
        assert_eq!(page_strings(&optimized, page), page_strings(&plain, page));
    }
}
