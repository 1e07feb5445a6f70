//! Lossless structural cleanup, serialization, and linearization.

use std::path::Path;
use std::process::Command;

use lopdf::content::Content;
use lopdf::{Document, Stream};
use tracing::{debug, trace, warn};

use crate::error::CompressionError;
use crate::pdf::content::count_operators;
use crate::pdf::structure;

/// qpdf exit code for "succeeded with warnings".
const QPDF_EXIT_WARNINGS: i32 = 3;

/// Decode and re-encode every page content stream.
///
/// Multiple content streams of a page collapse into one. A page is rewritten
/// only when every operator in its content survives the decode; anything else
/// is left as it is.
pub fn clean_content_streams(doc: &mut Document) -> usize {
    let mut cleaned = 0;

    for page_id in structure::page_ids(doc) {
        let raw = match structure::page_content(doc, page_id) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping content cleanup for {:?}: {}", page_id, e);
                continue;
            }
        };

        let Some(expected) = count_operators(&raw) else {
            debug!("Skipping content cleanup for {:?}: not tokenizable", page_id);
            continue;
        };
        let content = match Content::decode(&raw) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping content cleanup for {:?}: {}", page_id, e);
                continue;
            }
        };
        if content.operations.len() != expected {
            warn!(
                "Skipping content cleanup for {:?}: parsed {} of {} operators",
                page_id,
                content.operations.len(),
                expected
            );
            continue;
        }

        let encoded = match content.encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Skipping content cleanup for {:?}: {}", page_id, e);
                continue;
            }
        };

        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), encoded));
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            page.set("Contents", content_id);
            cleaned += 1;
        }
    }

    trace!("Cleaned {} content streams", cleaned);
    cleaned
}

/// Garbage-collect, renumber, deflate, and serialize.
pub fn save(mut doc: Document) -> Result<Vec<u8>, CompressionError> {
    let pruned = doc.prune_objects();
    doc.renumber_objects();
    doc.compress();

    let mut data = Vec::new();
    doc.save_to(&mut data)
        .map_err(|e| CompressionError::Save(e.to_string()))?;

    debug!("Saved PDF: {} objects pruned, {} bytes", pruned.len(), data.len());
    Ok(data)
}

/// Reorder a serialized PDF for streaming display using qpdf.
pub fn linearize(data: &[u8], qpdf: &Path) -> Result<Vec<u8>, CompressionError> {
    let dir = tempfile::tempdir()
        .map_err(|e| CompressionError::Linearize(format!("failed to create temp dir: {}", e)))?;
    let input = dir.path().join("input.pdf");
    let output = dir.path().join("output.pdf");

    std::fs::write(&input, data)
        .map_err(|e| CompressionError::Linearize(format!("failed to write temp file: {}", e)))?;

    let result = Command::new(qpdf)
        .arg("--linearize")
        .arg(&input)
        .arg(&output)
        .output()
        .map_err(|e| {
            CompressionError::Linearize(format!("failed to execute {}: {}", qpdf.display(), e))
        })?;

    let succeeded = result.status.success() || result.status.code() == Some(QPDF_EXIT_WARNINGS);
    if !succeeded {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(CompressionError::Linearize(format!(
            "qpdf failed (exit code {}): {}",
            result
                .status
                .code()
                .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            stderr.trim()
        )));
    }

    std::fs::read(&output)
        .map_err(|e| CompressionError::Linearize(format!("failed to read qpdf output: {}", e)))
}
