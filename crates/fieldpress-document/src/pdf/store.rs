// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document store — open PDF bytes into an editable handle and serialise it
// back, using the `lopdf` crate.

use std::collections::{HashMap, HashSet};

use fieldpress_core::error::{FieldpressError, Result};
use fieldpress_core::{PageGeometry, SaveOptions};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument};

use crate::layout::StandardFont;
use crate::pdf::objects;

/// An open, editable PDF.
///
/// A handle is owned by exactly one operation at a time: it is loaded (or
/// created), mutated through renderer and page calls, saved, and dropped.
/// Distinct handles share nothing and can be processed on different threads.
pub struct PdfDocument {
    /// The underlying lopdf document.
    pub(crate) document: Document,
    /// Font dictionaries already added for the standard fonts.
    pub(crate) font_ids: HashMap<StandardFont, ObjectId>,
    /// Pages whose original content has been wrapped in `q … Q`.
    pub(crate) isolated_pages: HashSet<ObjectId>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("version", &self.document.version)
            .field("pages", &self.page_count())
            .finish()
    }
}

impl PdfDocument {
    // -- Construction ---------------------------------------------------------

    /// Parse raw PDF bytes.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn load(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            FieldpressError::InvalidDocument(format!("failed to parse PDF: {err}"))
        })?;

        if objects::pages_root_id(&document).is_none() {
            return Err(FieldpressError::InvalidDocument(
                "PDF has no page tree".to_string(),
            ));
        }

        let handle = Self::from_lopdf(document);
        debug!(pages = handle.page_count(), "PDF loaded from bytes");
        Ok(handle)
    }

    /// A new document with an empty page tree.
    pub fn create() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(Vec::new())),
            ("Count", Object::Integer(0)),
        ]));
        let catalog_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));
        Self::from_lopdf(document)
    }

    /// Wrap an existing lopdf document.
    pub fn from_lopdf(document: Document) -> Self {
        Self {
            document,
            font_ids: HashMap::new(),
            isolated_pages: HashSet::new(),
        }
    }

    /// Borrow the underlying lopdf document.
    pub fn as_lopdf(&self) -> &Document {
        &self.document
    }

    // -- Serialisation --------------------------------------------------------

    /// Serialise to bytes. Compression re-encodes streams with Flate and never
    /// changes page count, content, or geometry.
    #[instrument(skip(self), fields(compress = options.compress))]
    pub fn save(&mut self, options: &SaveOptions) -> Result<Vec<u8>> {
        if options.compress {
            self.document.compress();
        }
        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            FieldpressError::Serialization(format!("failed to serialise PDF: {err}"))
        })?;
        debug!(output_bytes = output.len(), "PDF saved");
        Ok(output)
    }

    /// Serialise with unreachable objects removed, every stream
    /// Flate-compressed, and objects renumbered densely. Pages and their
    /// content are unchanged.
    #[instrument(skip(self))]
    pub fn optimize(&mut self) -> Result<Vec<u8>> {
        let pruned = self.document.prune_objects();
        self.document.compress();
        self.document.renumber_objects();
        // Object ids changed; cached ids would now point at the wrong objects.
        self.font_ids.clear();
        self.isolated_pages.clear();

        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            FieldpressError::Serialization(format!("failed to serialise optimised PDF: {err}"))
        })?;
        info!(pruned = pruned.len(), output_bytes = output.len(), "PDF optimised");
        Ok(output)
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Object id of a zero-based page index.
    pub fn page_id(&self, page_index: usize) -> Result<ObjectId> {
        let pages = self.document.get_pages();
        let page_count = pages.len();
        page_index
            .checked_add(1)
            .and_then(|number| u32::try_from(number).ok())
            .and_then(|number| pages.get(&number).copied())
            .ok_or(FieldpressError::PageNotFound {
                page: page_index,
                page_count,
            })
    }

    /// Object ids of all pages, in page order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().into_values().collect()
    }

    /// Size of one page, from its effective media box.
    pub fn page_geometry(&self, page_index: usize) -> Result<PageGeometry> {
        let page_id = self.page_id(page_index)?;
        let [x0, y0, x1, y1] = objects::media_box(&self.document, page_id);
        Ok(PageGeometry {
            page_index,
            width_pt: x1 - x0,
            height_pt: y1 - y0,
        })
    }

    /// Geometry of every page, in page order.
    pub fn pages(&self) -> Vec<PageGeometry> {
        self.page_ids()
            .into_iter()
            .enumerate()
            .map(|(page_index, page_id)| {
                let [x0, y0, x1, y1] = objects::media_box(&self.document, page_id);
                PageGeometry {
                    page_index,
                    width_pt: x1 - x0,
                    height_pt: y1 - y0,
                }
            })
            .collect()
    }

    /// Whether the catalog carries an interactive form.
    pub fn has_form(&self) -> bool {
        objects::catalog_id(&self.document)
            .and_then(|id| self.document.get_dictionary(id).ok())
            .is_some_and(|catalog| catalog.has(b"AcroForm"))
    }
}
