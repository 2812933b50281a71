//! Project export: ZIP archives and plain-text bundles

use crate::error::{CoreError, Result};
use crate::types::GeneratedFile;
use chrono::{DateTime, Utc};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Render all files as one text blob, each preceded by a `// path` header.
///
/// This is what the "copy code" action puts on the clipboard.
pub fn bundle_text(files: &[GeneratedFile]) -> String {
    files
        .iter()
        .map(|f| format!("// {}\n{}", f.path, f.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build a deflated ZIP archive with one entry per file.
///
/// Entry names are the normalized file paths. When two files normalize to
/// the same path the later one wins.
pub fn zip_bytes(files: &[GeneratedFile]) -> Result<Vec<u8>> {
    if files.is_empty() {
        return Err(CoreError::EmptyBundle);
    }

    let mut entries: Vec<(String, &str)> = Vec::with_capacity(files.len());
    for file in files {
        let path = file.normalized_path()?;
        match entries.iter_mut().find(|(existing, _)| *existing == path) {
            Some(entry) => entry.1 = &file.content,
            None => entries.push((path, &file.content)),
        }
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, content) in entries {
        writer.start_file(path, options)?;
        writer.write_all(content.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Download name for an exported archive
pub fn zip_file_name(now: DateTime<Utc>) -> String {
    format!("techwiser-project-{}.zip", now.timestamp_millis())
}
