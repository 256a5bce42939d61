// src/config/mod.rs

//! Configuration loading and validation for assetpipe.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate startup invariants like glob and browserslist syntax
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_root_dir, load_and_validate, load_from_path};
pub use model::{
    ImagesSection, PathsSection, PipelineConfig, ScriptsSection, ServerSection, StylesSection,
    VendorSection, WatchSection,
};
pub use validate::validate_config;
