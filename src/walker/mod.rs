//! Path-addressed traversal of nested documents.
//!
//! This module walks mappings and sequences by delimited locations such as
//! `nested.values.0`, the same way for JSON and YAML values.
//!
//! # Operations
//!
//! - `each` - visit every node depth-first, containers before their children
//! - `search` - resolve a location to `{ key, val, parent }`
//! - `search_mut` - resolve for writing, optionally creating missing segments
//! - `bubble` - resolve a location, then report each resolved node from the
//!   deepest back up to the first segment
//!
//! # Known limitations
//!
//! Segments that contain the separator cannot be addressed; there is no
//! escaping. Cyclic structures are not supported.

pub mod error;
pub mod found;
pub mod node;
pub mod path_walker;
pub mod steps;

pub use error::PathError;
pub use found::{Found, FoundMut, Located};
pub use node::{Children, Node, Shape};
pub use path_walker::{PathWalker, DEFAULT_SEPARATOR};
pub use steps::{Step, Steps};
