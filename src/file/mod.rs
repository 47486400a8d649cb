//! File I/O for the documents pathwalker works on.
//!
//! Documents are held as `serde_yaml::Value`, which represents both YAML and
//! JSON. The format a document was read in is remembered so it can be written
//! back the same way.

pub mod loader;
pub mod saver;

use std::path::Path;

/// On-disk representation of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A single YAML document.
    Yaml,
    /// A single JSON document.
    Json,
    /// Newline-delimited JSON, held as a sequence with one entry per line.
    Jsonl,
}

impl DocumentFormat {
    /// Determines the format from a file name, ignoring a trailing `.gz`.
    ///
    /// Examples:
    /// - `data.jsonl` → Jsonl
    /// - `data.json.gz` → Json
    /// - `config.yml` → Yaml
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".jsonl") || base.ends_with(".ndjson") {
            DocumentFormat::Jsonl
        } else if base.ends_with(".json") {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// A loaded document and the format it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub value: serde_yaml::Value,
    pub format: DocumentFormat,
}

impl Document {
    pub fn new(value: serde_yaml::Value, format: DocumentFormat) -> Self {
        Self { value, format }
    }
}

/// Converts a YAML value into JSON for display and JSON output.
///
/// Mapping keys use their path segment form, so `~` becomes `"null"` and
/// `8080` becomes `"8080"`. Composite keys are written as compact JSON text.
/// Floats JSON cannot hold (`.nan`, `.inf`) become strings.
pub fn json_view(value: &serde_yaml::Value) -> serde_json::Value {
    use serde_json::Value as Json;
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or_else(|| Json::String(n.to_string()))
            }
        }
        Yaml::String(s) => Json::String(s.clone()),
        Yaml::Sequence(items) => Json::Array(items.iter().map(json_view).collect()),
        Yaml::Mapping(map) => Json::Object(
            map.iter()
                .map(|(k, v)| {
                    let key = crate::walker::node::yaml_key_label(k)
                        .map(|label| label.into_owned())
                        .unwrap_or_else(|| json_view(k).to_string());
                    (key, json_view(v))
                })
                .collect(),
        ),
        Yaml::Tagged(tagged) => json_view(&tagged.value),
    }
}
