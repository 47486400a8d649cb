//! Document loading.
//!
//! This module reads YAML, JSON and JSONL documents from files or stdin into
//! [`Document`] values that a [`PathWalker`](crate::walker::PathWalker) can walk.
//! Gzip-compressed input is decompressed transparently.

use super::{Document, DocumentFormat};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Loads and parses a document from the filesystem.
///
/// The format is chosen from the file name (see [`DocumentFormat::from_path`]).
/// Gzip content is decompressed first, whether or not the name ends in `.gz`.
///
/// # Examples
///
/// ```no_run
/// use pathwalker::file::loader::load_document;
///
/// let doc = load_document("config.yaml").unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read
/// - The file is gzipped but corrupted
/// - The contents do not parse in the detected format
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let bytes = fs::read(path).context("Failed to read file")?;
    let content = decode_text(bytes)?;

    let format = DocumentFormat::from_path(path);
    log::debug!("loading {} as {:?}", path.display(), format);
    parse_document(&content, format)
}

/// Parses `content` in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Document> {
    let value = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse YAML")?,
        DocumentFormat::Json => serde_json::from_str(content).context("Failed to parse JSON")?,
        DocumentFormat::Jsonl => return parse_jsonl_content(content),
    };
    Ok(Document::new(value, format))
}

/// Parses JSONL content (newline-delimited JSON) into a sequence.
///
/// Each line must be a valid JSON value. Blank lines are skipped, but line
/// numbers in errors count them.
pub fn parse_jsonl_content(content: &str) -> Result<Document> {
    let lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<serde_yaml::Value>(line)
                .with_context(|| format!("Invalid JSON on line {}", idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    if lines.is_empty() {
        anyhow::bail!("No valid JSON found in JSONL content");
    }

    Ok(Document::new(
        serde_yaml::Value::Sequence(lines),
        DocumentFormat::Jsonl,
    ))
}

/// Loads and parses a document from standard input.
///
/// The input is tried as a single JSON document, then as YAML, then as JSONL.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the input is none of the
/// supported formats.
pub fn load_document_from_stdin() -> Result<Document> {
    use std::io::{self, Read};

    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read from stdin")?;

    sniff_document(&decode_text(bytes)?)
}

/// Parses input of unknown format.
pub(crate) fn sniff_document(content: &str) -> Result<Document> {
    if let Ok(doc) = parse_document(content, DocumentFormat::Json) {
        return Ok(doc);
    }
    if let Ok(doc) = parse_document(content, DocumentFormat::Yaml) {
        return Ok(doc);
    }

    parse_jsonl_content(content)
        .context("Failed to parse stdin: input is neither valid JSON, YAML nor JSONL")
}

/// Turns raw input into text, inflating it when it starts with the gzip magic bytes.
fn decode_text(bytes: Vec<u8>) -> Result<String> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return String::from_utf8(bytes).context("Input is not valid UTF-8");
    }

    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut content = String::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_string(&mut content)
        .context("Failed to decompress gzip input - data may be corrupted")?;
    Ok(content)
}
