//! Node classification for traversable documents.
//!
//! The walker never probes a value's layout ad hoc. Every node is classified
//! into a [`Shape`] first, and only mappings and sequences are descended into.
//! The [`Node`] trait is the seam between the walker and a concrete document
//! model; it is implemented here for `serde_json::Value` and `serde_yaml::Value`.
//!
//! # Example
//!
//! ```
//! use pathwalker::walker::{Node, Shape};
//! use serde_json::json;
//!
//! let doc = json!({"values": [0, 1]});
//! assert_eq!(doc.shape(), Shape::Mapping);
//! assert_eq!(doc.child("values").map(Node::shape), Some(Shape::Sequence));
//! assert_eq!(doc.child("values").and_then(|v| v.child("1")), Some(&json!(1)));
//! ```

use std::borrow::Cow;

/// The structural class of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Addressed by string keys.
    Mapping,
    /// Addressed by zero-based decimal indices.
    Sequence,
    /// Anything without children (strings, numbers, booleans, null).
    Scalar,
}

impl Shape {
    /// Returns true for mappings and sequences.
    pub fn is_container(self) -> bool {
        !matches!(self, Shape::Scalar)
    }
}

/// Ordered `(key, child)` pairs of a node.
pub type Children<'a, V> = Box<dyn Iterator<Item = (Cow<'a, str>, &'a V)> + 'a>;

/// A value the walker can traverse.
pub trait Node: Sized {
    /// Classifies this node.
    fn shape(&self) -> Shape;

    /// Children in natural enumeration order. Sequence keys are decimal indices.
    /// Scalars yield nothing.
    fn children(&self) -> Children<'_, Self>;

    /// Looks up a direct child. Returns `None` when the key is absent.
    fn child(&self, key: &str) -> Option<&Self>;

    /// Mutable counterpart of [`Node::child`].
    fn child_mut(&mut self, key: &str) -> Option<&mut Self>;

    /// The container written into the document for a missing segment.
    fn empty_mapping() -> Self;

    /// Stores `value` under `key` and returns a reference to it.
    ///
    /// Returns `None` when this node cannot hold `key`: scalars never can,
    /// sequences only accept decimal indices. Storing past the end of a
    /// sequence pads the gap with nulls.
    fn insert_child(&mut self, key: &str, value: Self) -> Option<&mut Self>;
}

/// Parses a canonical sequence index: `"0"`, `"12"`, but not `"012"`, `"+1"` or `"-1"`.
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

fn store_at<V>(items: &mut Vec<V>, index: usize, value: V, filler: fn() -> V) -> &mut V {
    if index < items.len() {
        items[index] = value;
    } else {
        while items.len() < index {
            items.push(filler());
        }
        items.push(value);
    }
    &mut items[index]
}

impl Node for serde_json::Value {
    fn shape(&self) -> Shape {
        use serde_json::Value;

        match self {
            Value::Object(_) => Shape::Mapping,
            Value::Array(_) => Shape::Sequence,
            _ => Shape::Scalar,
        }
    }

    fn children(&self) -> Children<'_, Self> {
        use serde_json::Value;

        match self {
            Value::Object(map) => Box::new(map.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v))),
            Value::Array(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, v)| (Cow::Owned(idx.to_string()), v)),
            ),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn child(&self, key: &str) -> Option<&Self> {
        use serde_json::Value;

        match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => parse_index(key).and_then(|idx| items.get(idx)),
            _ => None,
        }
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut Self> {
        use serde_json::Value;

        match self {
            Value::Object(map) => map.get_mut(key),
            Value::Array(items) => parse_index(key).and_then(move |idx| items.get_mut(idx)),
            _ => None,
        }
    }

    fn empty_mapping() -> Self {
        serde_json::Value::Object(serde_json::Map::new())
    }

    fn insert_child(&mut self, key: &str, value: Self) -> Option<&mut Self> {
        use serde_json::Value;

        match self {
            Value::Object(map) => {
                map.insert(key.to_owned(), value);
                map.get_mut(key)
            }
            Value::Array(items) => {
                let idx = parse_index(key)?;
                Some(store_at(items, idx, value, || Value::Null))
            }
            _ => None,
        }
    }
}

/// Renders a YAML mapping key as a path segment.
///
/// Composite keys (sequences, mappings) have no segment form.
pub(crate) fn yaml_key_label(key: &serde_yaml::Value) -> Option<Cow<'_, str>> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null => Some(Cow::Borrowed("null")),
        Value::Tagged(tagged) => yaml_key_label(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

impl Node for serde_yaml::Value {
    fn shape(&self) -> Shape {
        use serde_yaml::Value;

        match self {
            Value::Mapping(_) => Shape::Mapping,
            Value::Sequence(_) => Shape::Sequence,
            Value::Tagged(tagged) => tagged.value.shape(),
            _ => Shape::Scalar,
        }
    }

    fn children(&self) -> Children<'_, Self> {
        use serde_yaml::Value;

        match self {
            Value::Mapping(map) => Box::new(
                map.iter()
                    .filter_map(|(k, v)| yaml_key_label(k).map(|label| (label, v))),
            ),
            Value::Sequence(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, v)| (Cow::Owned(idx.to_string()), v)),
            ),
            Value::Tagged(tagged) => tagged.value.children(),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn child(&self, key: &str) -> Option<&Self> {
        use serde_yaml::Value;

        match self {
            Value::Mapping(map) => map.get(key).or_else(|| {
                map.iter()
                    .find(|(k, _)| yaml_key_label(k).as_deref() == Some(key))
                    .map(|(_, v)| v)
            }),
            Value::Sequence(items) => parse_index(key).and_then(|idx| items.get(idx)),
            Value::Tagged(tagged) => tagged.value.child(key),
            _ => None,
        }
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut Self> {
        use serde_yaml::Value;

        match self {
            Value::Mapping(map) => {
                if map.contains_key(key) {
                    return map.get_mut(key);
                }
                map.iter_mut()
                    .find(|(k, _)| yaml_key_label(k).as_deref() == Some(key))
                    .map(|(_, v)| v)
            }
            Value::Sequence(items) => parse_index(key).and_then(move |idx| items.get_mut(idx)),
            Value::Tagged(tagged) => tagged.value.child_mut(key),
            _ => None,
        }
    }

    fn empty_mapping() -> Self {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
    }

    fn insert_child(&mut self, key: &str, value: Self) -> Option<&mut Self> {
        use serde_yaml::Value;

        // Numeric, boolean and null keys are matched by label; keep their original key.
        if self.shape() == Shape::Mapping && self.child(key).is_some() {
            let slot = self.child_mut(key)?;
            *slot = value;
            return Some(slot);
        }

        match self {
            Value::Mapping(map) => {
                map.insert(Value::String(key.to_owned()), value);
                map.get_mut(key)
            }
            Value::Sequence(items) => {
                let idx = parse_index(key)?;
                Some(store_at(items, idx, value, || Value::Null))
            }
            Value::Tagged(tagged) => tagged.value.insert_child(key, value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_index_canonical() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("042"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("x"), None);
    }

    #[test]
    fn test_json_shapes() {
        assert_eq!(json!({}).shape(), Shape::Mapping);
        assert_eq!(json!([]).shape(), Shape::Sequence);
        assert_eq!(json!(null).shape(), Shape::Scalar);
        assert_eq!(json!("text").shape(), Shape::Scalar);
        assert!(!Shape::Scalar.is_container());
    }

    #[test]
    fn test_json_children_order() {
        let doc = json!({"b": 1, "a": [true, false]});
        let keys: Vec<String> = doc.children().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["b", "a"]);

        let items = json!(["x", "y"]);
        let keys: Vec<String> = items.children().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["0", "1"]);
    }

    #[test]
    fn test_json_null_is_present() {
        let doc = json!({"gone": null});
        assert_eq!(doc.child("gone"), Some(&json!(null)));
        assert_eq!(doc.child("missing"), None);
    }

    #[test]
    fn test_json_insert_into_sequence_pads_with_null() {
        let mut items = json!([1]);
        let slot = items.insert_child("3", json!({})).unwrap();
        assert_eq!(slot, &json!({}));
        assert_eq!(items, json!([1, null, null, {}]));
    }

    #[test]
    fn test_json_insert_refused() {
        let mut items = json!([1]);
        assert!(items.insert_child("name", json!({})).is_none());

        let mut scalar = json!(5);
        assert!(scalar.insert_child("0", json!({})).is_none());
    }

    #[test]
    fn test_yaml_non_string_keys() {
        let doc: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\nname: x\n").unwrap();
        assert_eq!(
            doc.child("1"),
            Some(&serde_yaml::Value::String("one".to_string()))
        );
        assert!(doc.child("true").is_some());
        let keys: Vec<String> = doc.children().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["1", "true", "name"]);
    }

    #[test]
    fn test_yaml_child_mut_by_label() {
        let mut doc: serde_yaml::Value = serde_yaml::from_str("7: seven\n").unwrap();
        *doc.child_mut("7").unwrap() = serde_yaml::Value::Bool(true);
        assert_eq!(doc.child("7"), Some(&serde_yaml::Value::Bool(true)));
    }

    #[test]
    fn test_yaml_insert_replaces_labelled_key() {
        let mut doc: serde_yaml::Value = serde_yaml::from_str("8443: https\n").unwrap();

        doc.insert_child("8443", serde_yaml::Value::String("tls".to_string()))
            .unwrap();

        assert_eq!(doc, serde_yaml::from_str::<serde_yaml::Value>("8443: tls\n").unwrap());
        assert_eq!(doc.as_mapping().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_yaml_tagged_is_transparent() {
        let doc: serde_yaml::Value = serde_yaml::from_str("!point {x: 1, y: 2}").unwrap();
        assert_eq!(doc.shape(), Shape::Mapping);
        assert!(doc.child("x").is_some());
    }
}
