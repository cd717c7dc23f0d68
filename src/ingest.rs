//! Document loading from the local filesystem
//!
//! Glue in front of the retrieval core: walks a directory and yields
//! (identifier, raw text) documents. Extraction problems skip the file
//! with a warning; they never abort the run.

use crate::error::{Error, Result};
use crate::store::Document;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Load every supported document under `dir`.
///
/// Entries are visited in file-name order so the resulting document
/// sequence, and therefore the built index, is reproducible. Document
/// identifiers are paths relative to `dir`.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(text) = read_document(path) else {
            continue;
        };
        if text.trim().is_empty() {
            warn!("{}: no extractable text, skipped", path.display());
            continue;
        }

        let id = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .display()
            .to_string();
        documents.push(Document::new(id, text));
    }

    Ok(documents)
}

/// Extract raw text from a single file, or `None` when the file is
/// unsupported or unreadable.
fn read_document(path: &Path) -> Option<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") | Some("md") | Some("markdown") => match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                None
            }
        },
        #[cfg(feature = "pdf")]
        Some("pdf") => match pdf_extract::extract_text(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                None
            }
        },
        _ => {
            debug!("{}: unsupported extension, skipped", path.display());
            None
        }
    }
}
