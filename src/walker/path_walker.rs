//! Traversal, search and bubbling over nested documents.
//!
//! A [`PathWalker`] addresses nodes with delimited location strings such as
//! `nested.values.0`. It holds two settings, the separator used to split and
//! join locations and a base location prefixed to every location it reports.
//!
//! # Example
//!
//! ```
//! use pathwalker::walker::PathWalker;
//! use serde_json::json;
//!
//! let walker = PathWalker::new();
//! let doc = json!({"nested": {"value": 0, "values": [0, 1]}});
//!
//! let found = walker.search(&doc, "nested.values.0").unwrap();
//! assert_eq!(found.key, "0");
//! assert_eq!(found.val, &json!(0));
//! assert_eq!(found.parent, &json!([0, 1]));
//!
//! let mut trail = Vec::new();
//! walker
//!     .bubble(&doc, "nested.values.0", |location, _| {
//!         trail.push(location.to_string());
//!         Ok::<(), std::convert::Infallible>(())
//!     })
//!     .unwrap();
//! assert_eq!(trail, vec!["nested.values.0", "nested.values", "nested"]);
//! ```

use log::{debug, trace};

use super::error::PathError;
use super::found::{Found, FoundMut, Located};
use super::node::{Node, Shape};
use super::steps::{self, Steps};
use crate::config::WalkerOptions;

/// Default separator between location segments.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Walks nested mappings and sequences by location.
///
/// Both settings are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathWalker {
    separator: String,
    location: String,
}

impl Default for PathWalker {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            location: String::new(),
        }
    }
}

impl PathWalker {
    /// Creates a walker with separator `"."` and an empty base location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a walker from options.
    ///
    /// Missing or empty values fall back to the defaults, so an empty
    /// separator can never be configured.
    ///
    /// ```
    /// use pathwalker::config::WalkerOptions;
    /// use pathwalker::walker::PathWalker;
    ///
    /// let walker = PathWalker::with_options(&WalkerOptions {
    ///     separator: Some(":".to_string()),
    ///     location: Some("base:loc".to_string()),
    /// });
    /// assert_eq!(walker.separator(), ":");
    /// assert_eq!(walker.location(), "base:loc");
    /// ```
    pub fn with_options(options: &WalkerOptions) -> Self {
        let separator = options
            .separator
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SEPARATOR);
        let location = options.location.as_deref().unwrap_or_default();

        Self {
            separator: separator.to_string(),
            location: location.to_string(),
        }
    }

    /// The separator used to split queries and join locations.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The base location prefixed to reported locations.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Iterates over the segments of `query`, starting from the base location.
    pub fn steps<'w, 'q>(&'w self, query: &'q str) -> Steps<'w, 'q> {
        Steps::new(query, &self.separator, &self.location)
    }

    /// Visits every node below `subject` depth-first, in pre-order.
    ///
    /// `callback` receives the location of each node and the node itself.
    /// Containers are reported before their children. The first error returned
    /// by `callback` stops the traversal and is returned as is.
    ///
    /// Cyclic structures are not supported.
    pub fn each<V, F, E>(&self, subject: &V, mut callback: F) -> Result<(), E>
    where
        V: Node,
        F: FnMut(&str, &V) -> Result<(), E>,
    {
        self.visit(subject, &self.location, &mut callback)
    }

    /// Like [`PathWalker::each`], but reports locations relative to `location`.
    ///
    /// An empty `location` falls back to the base location.
    pub fn each_at<V, F, E>(&self, subject: &V, location: &str, mut callback: F) -> Result<(), E>
    where
        V: Node,
        F: FnMut(&str, &V) -> Result<(), E>,
    {
        self.visit(subject, location, &mut callback)
    }

    fn visit<V, F, E>(&self, node: &V, location: &str, callback: &mut F) -> Result<(), E>
    where
        V: Node,
        F: FnMut(&str, &V) -> Result<(), E>,
    {
        let location = if location.is_empty() {
            self.location.as_str()
        } else {
            location
        };

        for (key, child) in node.children() {
            let child_location = steps::join(location, &self.separator, &key);
            callback(&child_location, child)?;
            if child.shape().is_container() {
                self.visit(child, &child_location, callback)?;
            }
        }
        Ok(())
    }

    /// Resolves `query` against `subject` without modifying it.
    ///
    /// Returns `None` as soon as a segment is absent.
    pub fn search<'a, V: Node>(&self, subject: &'a V, query: &str) -> Option<Found<'a, V>> {
        let mut cursor = subject;
        let mut found = None;

        for step in self.steps(query) {
            let Some(val) = cursor.child(step.key) else {
                debug!("search for '{}' missed at '{}'", query, step.location);
                return None;
            };
            found = Some(Found {
                key: step.key.to_owned(),
                val,
                parent: cursor,
            });
            cursor = val;
        }

        found
    }

    /// Resolves `query` for writing.
    ///
    /// Without `create` this behaves like [`PathWalker::search`]. With `create`,
    /// every absent segment, the last one included, gets an empty mapping
    /// written into `subject` in place, and the result reports `created` for the
    /// final segment.
    ///
    /// New containers are empty mappings, which accept any key, so a refusal can
    /// only happen at a pre-existing node before anything is written. On error
    /// `subject` is unchanged.
    ///
    /// # Errors
    ///
    /// Fails when a missing segment would have to be created under a scalar,
    /// or in a sequence under a key that is not an index.
    pub fn search_mut<'a, V: Node>(
        &self,
        subject: &'a mut V,
        query: &str,
        create: bool,
    ) -> Result<Option<FoundMut<'a, V>>, PathError> {
        let mut steps: Vec<_> = self.steps(query).collect();
        let Some(last) = steps.pop() else {
            return Ok(None);
        };

        let mut cursor = subject;
        let mut at = self.location.as_str();
        for step in &steps {
            cursor = match descend(cursor, step.key, at, create)? {
                Some(next) => next,
                None => {
                    debug!("search for '{}' missed at '{}'", query, step.location);
                    return Ok(None);
                }
            };
            at = &step.location;
        }

        let created = cursor.child(last.key).is_none();
        if created {
            if !create {
                debug!("search for '{}' missed at '{}'", query, last.location);
                return Ok(None);
            }
            trace!("creating '{}' at '{}'", last.key, at);
            let shape = cursor.shape();
            if cursor.insert_child(last.key, V::empty_mapping()).is_none() {
                return Err(refusal(shape, last.key, at));
            }
        }

        Ok(Some(FoundMut {
            key: last.key.to_owned(),
            created,
            parent: cursor,
        }))
    }

    /// Resolves `query` one segment at a time and returns every resolved prefix,
    /// shallowest first.
    ///
    /// Resolution stops at the first absent segment; prefixes resolved before it
    /// are kept.
    pub fn resolve_chain<'a, V: Node>(&self, subject: &'a V, query: &str) -> Vec<Located<'a, V>> {
        let mut history = Vec::new();
        let mut cursor = subject;

        for step in self.steps(query) {
            match cursor.child(step.key) {
                Some(val) => {
                    trace!("resolved '{}'", step.location);
                    history.push(Located {
                        location: step.location,
                        val,
                    });
                    cursor = val;
                }
                None => {
                    debug!("'{}' stopped at '{}'", query, step.location);
                    break;
                }
            }
        }

        history
    }

    /// Resolves `query` and then reports each resolved node from the deepest
    /// back up to the first segment.
    ///
    /// Nothing is reported when the first segment is absent. The first error
    /// returned by `callback` stops the replay and is returned as is.
    pub fn bubble<V, F, E>(&self, subject: &V, query: &str, mut callback: F) -> Result<(), E>
    where
        V: Node,
        F: FnMut(&str, &V) -> Result<(), E>,
    {
        for entry in self.resolve_chain(subject, query).iter().rev() {
            callback(&entry.location, entry.val)?;
        }
        Ok(())
    }
}

/// Moves `cursor` to its child `key`, creating an empty mapping when allowed.
fn descend<'a, V: Node>(
    cursor: &'a mut V,
    key: &str,
    at: &str,
    create: bool,
) -> Result<Option<&'a mut V>, PathError> {
    if cursor.child(key).is_some() {
        return Ok(cursor.child_mut(key));
    }
    if !create {
        return Ok(None);
    }

    trace!("creating '{}' at '{}'", key, at);
    let shape = cursor.shape();
    cursor
        .insert_child(key, V::empty_mapping())
        .map(Some)
        .ok_or_else(|| refusal(shape, key, at))
}

fn refusal(shape: Shape, key: &str, at: &str) -> PathError {
    match shape {
        Shape::Sequence => PathError::InvalidIndex {
            key: key.to_string(),
            location: at.to_string(),
        },
        Shape::Mapping | Shape::Scalar => PathError::NotAContainer {
            key: key.to_string(),
            location: at.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::convert::Infallible;

    fn sample() -> Value {
        json!({"nested": {"value": 0, "values": [0, 1]}})
    }

    fn collect_each(walker: &PathWalker, doc: &Value) -> Vec<(String, Value)> {
        let mut seen = Vec::new();
        walker
            .each(doc, |location, value| {
                seen.push((location.to_string(), value.clone()));
                Ok::<(), Infallible>(())
            })
            .unwrap();
        seen
    }

    #[test]
    fn test_defaults() {
        let walker = PathWalker::new();
        assert_eq!(walker.separator(), ".");
        assert_eq!(walker.location(), "");
    }

    #[test]
    fn test_empty_options_fall_back() {
        let walker = PathWalker::with_options(&WalkerOptions {
            separator: Some(String::new()),
            location: None,
        });
        assert_eq!(walker, PathWalker::new());
    }

    #[test]
    fn test_each_visits_scalar_subject_without_callbacks() {
        let walker = PathWalker::new();
        assert!(collect_each(&walker, &json!(42)).is_empty());
    }

    #[test]
    fn test_each_at_uses_explicit_location() {
        let walker = PathWalker::new();
        let mut seen = Vec::new();
        walker
            .each_at(&json!({"a": 1}), "x.y", |location, _| {
                seen.push(location.to_string());
                Ok::<(), Infallible>(())
            })
            .unwrap();
        assert_eq!(seen, vec!["x.y.a"]);
    }

    #[test]
    fn test_each_at_empty_location_uses_base() {
        let walker = PathWalker::with_options(&WalkerOptions {
            separator: None,
            location: Some("base".to_string()),
        });
        let mut seen = Vec::new();
        walker
            .each_at(&json!({"a": 1}), "", |location, _| {
                seen.push(location.to_string());
                Ok::<(), Infallible>(())
            })
            .unwrap();
        assert_eq!(seen, vec!["base.a"]);
    }

    #[test]
    fn test_each_stops_on_callback_error() {
        let walker = PathWalker::new();
        let mut calls = 0;
        let result = walker.each(&sample(), |location, _| {
            calls += 1;
            if location == "nested.value" {
                Err(location.to_string())
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("nested.value".to_string()));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_search_scalar_in_middle_misses() {
        let walker = PathWalker::new();
        assert!(walker.search(&sample(), "nested.value.deeper").is_none());
    }

    #[test]
    fn test_search_null_is_found() {
        let walker = PathWalker::new();
        let doc = json!({"a": null});
        let found = walker.search(&doc, "a").unwrap();
        assert_eq!(found.val, &Value::Null);
    }

    #[test]
    fn test_search_empty_query_looks_up_empty_key() {
        let walker = PathWalker::new();
        let doc = json!({"": 7});
        assert_eq!(walker.search(&doc, "").unwrap().val, &json!(7));
        assert!(walker.search(&sample(), "").is_none());
    }

    #[test]
    fn test_search_mut_existing_value() {
        let walker = PathWalker::new();
        let mut doc = sample();
        let mut found = walker.search_mut(&mut doc, "nested.value", true).unwrap().unwrap();
        assert!(!found.created);
        assert_eq!(found.val(), Some(&json!(0)));
        assert!(found.set(json!("changed")));
        assert_eq!(doc["nested"]["value"], json!("changed"));
    }

    #[test]
    fn test_search_mut_without_create_misses() {
        let walker = PathWalker::new();
        let mut doc = json!({"value": 0});
        let found = walker.search_mut(&mut doc, "nested.values.0", false).unwrap();
        assert!(found.is_none());
        assert_eq!(doc, json!({"value": 0}));
    }

    #[test]
    fn test_search_mut_creates_into_sequence() {
        let walker = PathWalker::new();
        let mut doc = json!({"items": [1]});
        let found = walker.search_mut(&mut doc, "items.2.name", true).unwrap().unwrap();
        assert!(found.created);
        assert_eq!(doc, json!({"items": [1, null, {"name": {}}]}));
    }

    #[test]
    fn test_search_mut_rejects_word_key_in_sequence() {
        let walker = PathWalker::new();
        let mut doc = json!({"items": [1]});
        let err = walker.search_mut(&mut doc, "items.name", true).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidIndex {
                key: "name".to_string(),
                location: "items".to_string(),
            }
        );
    }

    #[test]
    fn test_search_mut_rejects_scalar_parent() {
        let walker = PathWalker::new();
        let mut doc = json!({"count": 3});
        let err = walker.search_mut(&mut doc, "count.total.x", true).unwrap_err();
        assert!(matches!(err, PathError::NotAContainer { ref key, .. } if key == "total"));
        assert_eq!(doc, json!({"count": 3}));
    }

    #[test]
    fn test_search_mut_error_after_existing_prefix_leaves_subject_unchanged() {
        let walker = PathWalker::new();
        let mut doc = json!({"a": {"items": [1]}, "b": 2});
        let err = walker.search_mut(&mut doc, "a.items.name.x", true).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidIndex {
                key: "name".to_string(),
                location: "a.items".to_string(),
            }
        );
        assert_eq!(doc, json!({"a": {"items": [1]}, "b": 2}));
    }

    #[test]
    fn test_search_mut_creates_every_missing_level() {
        let walker = PathWalker::new();
        let mut doc = json!({"a": 1});
        let found = walker.search_mut(&mut doc, "b.c.0", true).unwrap().unwrap();
        assert!(found.created);
        assert_eq!(found.key, "0");
        assert_eq!(doc, json!({"a": 1, "b": {"c": {"0": {}}}}));
    }

    #[test]
    fn test_resolve_chain_keeps_partial_history() {
        let walker = PathWalker::new();
        let doc = sample();
        let chain = walker.resolve_chain(&doc, "nested.values.9");
        let locations: Vec<&str> = chain.iter().map(|l| l.location.as_str()).collect();
        assert_eq!(locations, vec!["nested", "nested.values"]);
    }

    #[test]
    fn test_bubble_partial_history_deepest_first() {
        let walker = PathWalker::new();
        let mut seen = Vec::new();
        walker
            .bubble(&sample(), "nested.missing.0", |location, value| {
                seen.push((location.to_string(), value.clone()));
                Ok::<(), Infallible>(())
            })
            .unwrap();
        assert_eq!(seen, vec![("nested".to_string(), sample()["nested"].clone())]);
    }

    #[test]
    fn test_bubble_uses_base_location() {
        let walker = PathWalker::with_options(&WalkerOptions {
            separator: None,
            location: Some("root".to_string()),
        });
        let mut seen = Vec::new();
        walker
            .bubble(&sample(), "nested.value", |location, _| {
                seen.push(location.to_string());
                Ok::<(), Infallible>(())
            })
            .unwrap();
        assert_eq!(seen, vec!["root.nested.value", "root.nested"]);
    }

    #[test]
    fn test_bubble_stops_on_callback_error() {
        let walker = PathWalker::new();
        let mut calls = 0;
        let result = walker.bubble(&sample(), "nested.values.0", |_, _| {
            calls += 1;
            Err("stop")
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(calls, 1);
    }
}
