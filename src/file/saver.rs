//! Document saving.
//!
//! This module writes [`Document`] values back to disk in the format they were
//! loaded from, with atomic write operations and optional backup creation.

use super::{json_view, Document, DocumentFormat};
use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes a document in its own format.
///
/// JSON is pretty-printed; JSONL writes one compact line per sequence entry.
/// Both go through [`json_view`], so non-string YAML keys become their labels.
pub fn serialize_document(doc: &Document) -> Result<String> {
    match doc.format {
        DocumentFormat::Yaml => serde_yaml::to_string(&doc.value).context("Failed to serialize YAML"),
        DocumentFormat::Json => {
            let mut out = serde_json::to_string_pretty(&json_view(&doc.value))
                .context("Failed to serialize JSON")?;
            out.push('\n');
            Ok(out)
        }
        DocumentFormat::Jsonl => {
            let serde_yaml::Value::Sequence(lines) = &doc.value else {
                anyhow::bail!("JSONL documents must be a sequence of lines");
            };

            Ok(lines
                .iter()
                .map(|line| format!("{}\n", json_view(line)))
                .collect())
        }
    }
}

/// Saves a document to a file.
///
/// The write is atomic (sibling temp file, then rename). Targets ending in
/// `.gz` are gzip-compressed. When `config.create_backup` is set and the
/// target exists, it is first copied to `<name>.bak`.
///
/// # Examples
///
/// ```no_run
/// use pathwalker::config::Config;
/// use pathwalker::file::loader::load_document;
/// use pathwalker::file::saver::save_document;
///
/// let doc = load_document("data.json").unwrap();
/// save_document("data.json", &doc, &Config::default()).unwrap();
/// ```
pub fn save_document<P: AsRef<Path>>(path: P, doc: &Document, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode(doc, path.to_string_lossy().ends_with(".gz"))?;

    if config.create_backup && path.exists() {
        fs::copy(path, sibling(path, "bak")?).context("Failed to create backup")?;
    }

    let temp_path = sibling(path, "tmp")?;
    fs::write(&temp_path, &bytes).context("Failed to write temp file")?;
    fs::rename(&temp_path, path).context("Failed to rename temp file")?;
    log::debug!("saved {} as {:?}", path.display(), doc.format);

    Ok(())
}

/// Serializes `doc` to the bytes that land on disk.
fn encode(doc: &Document, compress: bool) -> Result<Vec<u8>> {
    let text = serialize_document(doc)?;
    if !compress {
        return Ok(text.into_bytes());
    }

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .context("Failed to compress document")?;
    encoder.finish().context("Failed to compress document")
}

/// `dir/name` becomes `dir/name.<suffix>`.
fn sibling(path: &Path, suffix: &str) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?;
    Ok(path.with_file_name(format!("{}.{}", name, suffix)))
}
