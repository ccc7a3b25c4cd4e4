// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Small helpers over the lopdf object model: reference resolution, numbers,
// inherited page attributes, and page content arrays.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page-tree depth limit when walking `/Parent` links.
const MAX_TREE_DEPTH: usize = 32;

/// Fallback page box (US Letter) for pages without a usable `/MediaBox`.
pub const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Follow a chain of references to the underlying object.
pub fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    let mut current = object;
    for _ in 0..MAX_TREE_DEPTH {
        match current {
            Object::Reference(id) => current = doc.get_object(*id).ok()?,
            other => return Some(other),
        }
    }
    None
}

/// Resolve to a dictionary (a stream's dictionary counts).
pub fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, object)? {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Numeric value of an integer or real object, following references.
pub fn number(doc: &Document, object: &Object) -> Option<f32> {
    match resolve(doc, object)? {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Four numbers from a rectangle array, normalised so that `x0 <= x1` and
/// `y0 <= y1`.
pub fn rect(doc: &Document, object: &Object) -> Option<[f32; 4]> {
    let Object::Array(items) = resolve(doc, object)? else {
        return None;
    };
    if items.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = number(doc, item)?;
    }
    let [a, b, c, d] = values;
    Some([a.min(c), b.min(d), a.max(c), b.max(d)])
}

/// Look up a page attribute, walking up the page tree for inheritable keys
/// (`/MediaBox`, `/CropBox`, `/Resources`, `/Rotate`).
pub fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").ok()?;
        current = resolve_dict(doc, parent)?;
    }
    None
}

/// Effective media box of a page.
pub fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    inherited(doc, page_id, b"MediaBox")
        .and_then(|object| rect(doc, object))
        .filter(|[x0, y0, x1, y1]| x1 > x0 && y1 > y0)
        .unwrap_or(DEFAULT_MEDIA_BOX)
}

/// Effective `/Rotate` of a page, normalised to 0, 90, 180, or 270.
pub fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited(doc, page_id, b"Rotate")
        .and_then(|object| resolve(doc, object))
        .and_then(|object| object.as_i64().ok())
        .map(|deg| deg.rem_euclid(360) / 90 * 90)
        .unwrap_or(0)
}

/// The page's content streams as a flat list of objects (normally
/// references), in painting order.
pub fn content_refs(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            Ok(_) => vec![Object::Reference(*id)],
            Err(_) => Vec::new(),
        },
        Ok(other @ Object::Stream(_)) => vec![other.clone()],
        _ => Vec::new(),
    }
}

/// Name object as a UTF-8 string (lossy).
pub fn name_str(object: &Object) -> Option<String> {
    match object {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Identifier of the trailer's `/Root` catalog.
pub fn catalog_id(doc: &Document) -> Option<ObjectId> {
    match doc.trailer.get(b"Root").ok()? {
        Object::Reference(id) => Some(*id),
        _ => None,
    }
}

/// Identifier of the root `/Pages` node.
pub fn pages_root_id(doc: &Document) -> Option<ObjectId> {
    let catalog = doc.get_dictionary(catalog_id(doc)?).ok()?;
    match catalog.get(b"Pages").ok()? {
        Object::Reference(id) => Some(*id),
        _ => None,
    }
}
