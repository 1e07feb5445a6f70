//! Document structure access using lopdf.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, trace};

use crate::error::PdfError;
use crate::models::Rect;

/// Page-tree depth after which inheritance lookups give up.
const MAX_TREE_DEPTH: usize = 32;

/// Parse PDF bytes into a document, decrypting empty-password files.
pub fn load_document(data: &[u8]) -> Result<Document, PdfError> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    // Handle PDFs with empty password encryption
    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        doc.trailer.remove(b"Encrypt");
        debug!("Decrypted PDF with empty password");
    }

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(PdfError::NoPages);
    }

    debug!("Loaded PDF with {} pages", page_count);
    Ok(doc)
}

/// Page object ids in page-tree order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Look up a page attribute, walking up the page tree for inherited values.
pub fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node_id = page_id;

    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(node_id).ok()?;

        if let Ok(value) = dict.get(key) {
            return doc.dereference(value).ok().map(|(_, obj)| obj);
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => node_id = *parent_id,
            _ => return None,
        }
    }

    trace!("Page tree deeper than {} levels at {:?}", MAX_TREE_DEPTH, page_id);
    None
}

/// Resources dictionary of a page, handling inheritance.
pub fn page_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    match inherited(doc, page_id, b"Resources")? {
        Object::Dictionary(dict) => Some(dict.clone()),
        _ => None,
    }
}

/// Visible page box: the CropBox clipped to the MediaBox, or the MediaBox.
pub fn page_box(doc: &Document, page_id: ObjectId) -> Option<Rect> {
    let media = inherited(doc, page_id, b"MediaBox").and_then(|obj| rect_from_object(doc, obj))?;

    let visible = inherited(doc, page_id, b"CropBox")
        .and_then(|obj| rect_from_object(doc, obj))
        .map(|crop| Rect {
            x0: crop.x0.max(media.x0),
            y0: crop.y0.max(media.y0),
            x1: crop.x1.min(media.x1),
            y1: crop.y1.min(media.y1),
        })
        .filter(|clipped| clipped.width() > 0.0 && clipped.height() > 0.0)
        .unwrap_or(media);

    Some(visible)
}

/// Page rotation normalized to 0, 90, 180 or 270.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    let rotate = inherited(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0);
    let normalized = rotate.rem_euclid(360);
    normalized - normalized % 90
}

/// Concatenated, decoded content of a page.
///
/// Unfiltered streams are taken as stored. A filtered stream that lopdf cannot
/// decode is an error, never passed on as raw bytes.
pub fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, PdfError> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfError::Parse(e.to_string()))?;

    let contents = match page.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };

    let refs: Vec<&Object> = match contents {
        Object::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut data = Vec::new();
    for item in refs {
        let (id, obj) = doc
            .dereference(item)
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        if let Object::Stream(stream) = obj {
            let decoded = if stream.dict.has(b"Filter") {
                stream.decompressed_content().map_err(|e| {
                    PdfError::UndecodableContent(format!("stream {:?}: {}", id, e))
                })?
            } else {
                stream.content.clone()
            };
            if !data.is_empty() {
                data.push(b'\n');
            }
            data.extend_from_slice(&decoded);
        }
    }

    Ok(data)
}

/// The page's content stream as stored, when the page has exactly one.
pub fn single_content_stream(doc: &Document, page_id: ObjectId) -> Option<&Stream> {
    let contents = doc.get_dictionary(page_id).ok()?.get(b"Contents").ok()?;
    let contents = match contents {
        Object::Array(items) if items.len() == 1 => &items[0],
        Object::Array(_) => return None,
        other => other,
    };
    doc.dereference(contents).ok()?.1.as_stream().ok()
}

/// Numeric value of an integer or real object, following references.
pub fn number(doc: &Document, obj: &Object) -> Option<f32> {
    match doc.dereference(obj).ok()?.1 {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

fn rect_from_object(doc: &Document, obj: &Object) -> Option<Rect> {
    let items = obj.as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let mut coords = [0.0_f32; 4];
    for (slot, item) in coords.iter_mut().zip(items) {
        *slot = number(doc, item)?;
    }
    Some(Rect::new(coords[0], coords[1], coords[2], coords[3]))
}
