//! Error types for path resolution.

use thiserror::Error;

/// Errors raised while materializing missing path segments.
///
/// A plain resolution miss is not an error: `search` and `bubble` report it
/// as `None` or as an empty history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A missing segment had to be created under a value that cannot hold children.
    #[error("cannot create '{key}' under a scalar at '{location}'")]
    NotAContainer { key: String, location: String },

    /// A missing segment had to be created in a sequence but is not an index.
    #[error("'{key}' is not a valid sequence index at '{location}'")]
    InvalidIndex { key: String, location: String },
}
