//! Records produced by path resolution.

use super::node::Node;

/// A resolved path: the final segment, its value and the container holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Found<'a, V> {
    /// The final path segment.
    pub key: String,
    /// The value stored under `key`.
    pub val: &'a V,
    /// The live container in which `key` was found.
    pub parent: &'a V,
}

/// A path resolved for writing.
///
/// `parent` borrows the subject mutably, so changes made through it land in
/// the document that was searched.
#[derive(Debug)]
pub struct FoundMut<'a, V> {
    /// The final path segment.
    pub key: String,
    /// True when the final segment was missing and an empty mapping was written for it.
    pub created: bool,
    /// The live container holding `key`.
    pub parent: &'a mut V,
}

impl<'a, V: Node> FoundMut<'a, V> {
    /// The value that was under `key` before the search, if any.
    pub fn val(&self) -> Option<&V> {
        if self.created {
            None
        } else {
            self.parent.child(&self.key)
        }
    }

    /// Mutable access to whatever is now stored under `key`, including a freshly created mapping.
    pub fn slot_mut(&mut self) -> Option<&mut V> {
        self.parent.child_mut(&self.key)
    }

    /// Replaces the value under `key`, creating the entry if needed.
    ///
    /// Returns `false` when the parent cannot hold `key`.
    pub fn set(&mut self, value: V) -> bool {
        self.parent.insert_child(&self.key, value).is_some()
    }
}

/// One resolved prefix of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<'a, V> {
    /// Base location joined with the segments resolved so far.
    pub location: String,
    /// The value at `location`.
    pub val: &'a V,
}
