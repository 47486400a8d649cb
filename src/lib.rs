//! Pathwalker - traversal, search and bubbling over nested documents.
//!
//! The library half of the `pathwalker` tool. [`walker::PathWalker`] walks
//! `serde_json::Value` and `serde_yaml::Value` trees by delimited locations;
//! [`file`] loads and saves the documents the command line works on.

pub mod config;
pub mod file;
pub mod walker;

pub use walker::{PathError, PathWalker};
