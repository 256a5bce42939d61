// src/assets/mod.rs

//! Asset classes and path resolution.
//!
//! This module turns configuration into concrete file selections:
//! - [`class`] names the asset classes and their fixed build order.
//! - [`resolve`] compiles per-class glob pattern sets and directory mappings
//!   and enumerates matching source files.
//!
//! It does **not** know about transforms or watching; it only answers
//! "which files belong to this class, and where do its outputs go".

pub mod class;
pub mod resolve;

pub use class::AssetClass;
pub use resolve::{ClassPaths, DirMapping, GlobPatternSet, MatchedFile, PathResolver};
