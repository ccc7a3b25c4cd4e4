// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command implementations. Each reads its inputs from disk, runs one library
// operation, and writes the result; file I/O happens only here.

use std::fs;
use std::path::{Path, PathBuf};

use fieldpress_core::{
    CertificateInfo, EngineConfig, FieldBatch, FieldPlacement, FieldpressError, PageGeometry,
    Result, SaveOptions, ThumbnailOptions, WatermarkOptions,
};
use fieldpress_document::{Composer, PdfDocument, hash_bytes};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A fields file holds either a flat list of tagged placements or a batch
/// grouped by category.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldsFile {
    List(Vec<FieldPlacement>),
    Batch(FieldBatch),
}

impl FieldsFile {
    pub fn into_instructions(self) -> Vec<FieldPlacement> {
        match self {
            Self::List(fields) => fields,
            Self::Batch(batch) => batch.into_instructions(),
        }
    }
}

/// Summary printed by `fieldpress info`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub page_count: usize,
    pub has_form: bool,
    pub sha256: String,
    pub pages: Vec<PageGeometry>,
}

/// Options for `fieldpress render`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderArgs {
    pub page: usize,
    pub scale: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

// -- File edges ---------------------------------------------------------------

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| {
        FieldpressError::Io(std::io::Error::new(
            err.kind(),
            format!("cannot read {}: {err}", path.display()),
        ))
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_file(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

fn open(path: &Path) -> Result<PdfDocument> {
    PdfDocument::load(&read_file(path)?)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|err| {
        FieldpressError::Io(std::io::Error::new(
            err.kind(),
            format!("cannot write {}: {err}", path.display()),
        ))
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "Output written");
    Ok(())
}

fn save_to(config: &EngineConfig, mut doc: PdfDocument, output: &Path) -> Result<()> {
    let bytes = doc.save(&SaveOptions {
        compress: config.compress_output,
    })?;
    write_file(output, &bytes)
}

// -- Commands -----------------------------------------------------------------

#[instrument(skip(config))]
pub fn compose(config: &EngineConfig, input: &Path, fields: &Path, output: &Path) -> Result<()> {
    let pdf = read_file(input)?;
    let instructions = read_json::<FieldsFile>(fields)?.into_instructions();
    debug!(fields = instructions.len(), "Fields file parsed");
    let composed = Composer::new(config.clone()).compose(&pdf, instructions)?;
    write_file(output, &composed)
}

#[instrument(skip(config))]
pub fn merge(config: &EngineConfig, inputs: &[PathBuf], output: &Path) -> Result<()> {
    let documents = inputs
        .iter()
        .map(|path| open(path))
        .collect::<Result<Vec<_>>>()?;
    save_to(config, PdfDocument::merge(&documents)?, output)
}

#[instrument(skip(config))]
pub fn extract(config: &EngineConfig, input: &Path, pages: &[usize], output: &Path) -> Result<()> {
    let extracted = open(input)?.extract_pages(pages)?;
    save_to(config, extracted, output)
}

#[instrument(skip(config))]
pub fn rotate(
    config: &EngineConfig,
    input: &Path,
    page: usize,
    degrees: i64,
    output: &Path,
) -> Result<()> {
    let mut doc = open(input)?;
    doc.rotate_page(page, degrees)?;
    save_to(config, doc, output)
}

#[instrument(skip(config, options))]
pub fn watermark(
    config: &EngineConfig,
    input: &Path,
    text: &str,
    options: &WatermarkOptions,
    output: &Path,
) -> Result<()> {
    let mut doc = open(input)?;
    doc.add_watermark(text, options)?;
    save_to(config, doc, output)
}

/// Append a certificate page. When the info file carries no fingerprint,
/// the SHA-256 of the input bytes is printed instead.
#[instrument(skip(config))]
pub fn certificate(config: &EngineConfig, input: &Path, info_path: &Path, output: &Path) -> Result<()> {
    let pdf = read_file(input)?;
    let mut info: CertificateInfo = read_json(info_path)?;
    if info.fingerprint.is_none() {
        info.fingerprint = Some(hash_bytes(&pdf));
    }
    let mut doc = PdfDocument::load(&pdf)?;
    doc.add_certificate(&info)?;
    save_to(config, doc, output)
}

#[instrument(skip(config))]
pub fn flatten(config: &EngineConfig, input: &Path, output: &Path) -> Result<()> {
    let mut doc = open(input)?;
    let widgets = doc.flatten()?;
    info!(widgets, "Form flattened");
    save_to(config, doc, output)
}

#[instrument]
pub fn optimize(input: &Path, output: &Path) -> Result<()> {
    let original = read_file(input)?;
    let optimized = PdfDocument::load(&original)?.optimize()?;
    info!(before = original.len(), after = optimized.len(), "Size change");
    write_file(output, &optimized)
}

#[instrument(skip(config))]
pub fn render(config: &EngineConfig, input: &Path, args: RenderArgs, output: &Path) -> Result<()> {
    let doc = open(input)?;
    let mut options = config.render_options();
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    options.width = args.width;
    options.height = args.height;
    let png = crate::fonts::rasterizer(config).render_page(&doc, args.page, &options)?;
    write_file(output, &png)
}

#[instrument(skip(config))]
pub fn thumbnail(
    config: &EngineConfig,
    input: &Path,
    max_width: Option<u32>,
    max_height: Option<u32>,
    output: &Path,
) -> Result<()> {
    let doc = open(input)?;
    let defaults = config.thumbnail_options();
    let options = ThumbnailOptions {
        max_width: max_width.unwrap_or(defaults.max_width),
        max_height: max_height.unwrap_or(defaults.max_height),
    };
    let png = crate::fonts::rasterizer(config).thumbnail(&doc, &options)?;
    write_file(output, &png)
}

pub fn info(input: &Path) -> Result<DocumentInfo> {
    let pdf = read_file(input)?;
    let doc = PdfDocument::load(&pdf)?;
    Ok(DocumentInfo {
        page_count: doc.page_count(),
        has_form: doc.has_form(),
        sha256: hash_bytes(&pdf),
        pages: doc.pages(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpress_core::Signer;
    use tempfile::TempDir;

    /// A Letter-sized document with `pages` certificate pages.
    fn write_pdf(dir: &TempDir, name: &str, pages: usize) -> PathBuf {
        let mut doc = PdfDocument::create();
        for n in 0..pages {
            doc.add_certificate(&CertificateInfo {
                document_title: format!("{name} {n}"),
                completed_date: "2025-01-01".into(),
                document_id: name.into(),
                signers: Vec::new(),
                fingerprint: None,
            })
            .unwrap();
        }
        let path = dir.path().join(name);
        fs::write(&path, doc.save(&SaveOptions::default()).unwrap()).unwrap();
        path
    }

    fn strings_on(path: &Path, page_number: u32) -> Vec<String> {
        let doc = lopdf::Document::load(path).unwrap();
        let page_id = doc.get_pages()[&page_number];
        doc.get_and_decode_page_content(page_id)
            .unwrap()
            .operations
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.into_iter().next() {
                Some(lopdf::Object::String(raw, _)) => Some(String::from_utf8_lossy(&raw).into_owned()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn compose_accepts_a_flat_list_and_a_grouped_batch() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, "in.pdf", 1);
        let config = EngineConfig::default();

        let list = dir.path().join("list.json");
        fs::write(&list, r#"[{"type": "text", "page": 0, "x": 72, "y": 100, "text": "from list"}]"#).unwrap();
        let batch = dir.path().join("batch.json");
        fs::write(&batch, r#"{"texts": [{"page": 0, "x": 72, "y": 80, "text": "from batch"}]}"#).unwrap();

        let first = dir.path().join("first.pdf");
        compose(&config, &input, &list, &first).unwrap();
        let second = dir.path().join("second.pdf");
        compose(&config, &first, &batch, &second).unwrap();

        let strings = strings_on(&second, 1);
        assert!(strings.contains(&"from list".to_string()));
        assert!(strings.contains(&"from batch".to_string()));
    }

    #[test]
    fn compose_to_a_missing_page_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, "in.pdf", 1);
        let fields = dir.path().join("fields.json");
        fs::write(&fields, r#"[{"type": "text", "page": 3, "x": 0, "y": 0, "text": "x"}]"#).unwrap();
        let output = dir.path().join("out.pdf");

        let err = compose(&EngineConfig::default(), &input, &fields, &output).unwrap_err();
        assert!(matches!(err, FieldpressError::PageNotFound { page: 3, page_count: 1 }));
        assert!(!output.exists());
    }

    #[test]
    fn merge_then_extract_round_trip() {
        let dir = TempDir::new().unwrap();
        let a = write_pdf(&dir, "a.pdf", 2);
        let b = write_pdf(&dir, "b.pdf", 1);
        let config = EngineConfig::default();

        let merged = dir.path().join("merged.pdf");
        merge(&config, &[a, b], &merged).unwrap();
        assert_eq!(info(&merged).unwrap().page_count, 3);

        let extracted = dir.path().join("extracted.pdf");
        extract(&config, &merged, &[2, 0], &extracted).unwrap();
        assert_eq!(strings_on(&extracted, 1)[1], "Document: b.pdf 0");
        assert_eq!(strings_on(&extracted, 2)[1], "Document: a.pdf 0");
    }

    #[test]
    fn certificate_fills_in_the_input_fingerprint() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, "in.pdf", 1);
        let info_path = dir.path().join("info.json");
        let signer = Signer {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            signed_at: "2025-01-02".into(),
        };
        let body = serde_json::json!({
            "documentTitle": "Lease",
            "completedDate": "2025-01-02",
            "documentId": "lease-1",
            "signers": [signer],
        });
        fs::write(&info_path, body.to_string()).unwrap();
        let output = dir.path().join("out.pdf");

        certificate(&EngineConfig::default(), &input, &info_path, &output).unwrap();
        let expected = format!("SHA-256: {}", hash_bytes(&fs::read(&input).unwrap()));
        assert!(strings_on(&output, 2).contains(&expected));
    }

    #[test]
    fn render_and_thumbnail_write_pngs_of_the_right_size() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, "in.pdf", 1);
        let config = EngineConfig::default();

        let page = dir.path().join("page.png");
        let args = RenderArgs {
            scale: Some(0.5),
            ..RenderArgs::default()
        };
        render(&config, &input, args, &page).unwrap();
        assert_eq!(image::image_dimensions(&page).unwrap(), (306, 396));

        let thumb = dir.path().join("thumb.png");
        thumbnail(&config, &input, Some(100), None, &thumb).unwrap();
        let (width, height) = image::image_dimensions(&thumb).unwrap();
        assert_eq!(width, 100);
        assert!(height <= 300);
    }

    #[test]
    fn info_reports_geometry_and_hash() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, "in.pdf", 2);
        let summary = info(&input).unwrap();
        assert_eq!(summary.page_count, 2);
        assert!(!summary.has_form);
        assert_eq!(summary.sha256.len(), 64);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["pages"][1]["widthPt"], 612.0);
        assert_eq!(json["pageCount"], 2);
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = info(&dir.path().join("nope.pdf")).unwrap_err();
        assert!(matches!(err, FieldpressError::Io(_)));
        assert!(err.to_string().contains("nope.pdf"));
    }
}
