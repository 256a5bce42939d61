// src/tasks/clean.rs

//! Clean task: remove previously generated artifacts from the dist tree.
//!
//! Deletion is forced in the sense that absent targets (or an absent dist
//! root) are fine, and individual deletion failures are logged rather than
//! propagated. Vendor bundles are protected: the configured file itself and
//! its derived minified name survive every clean.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::assets::resolve::relative_str;
use crate::assets::GlobPatternSet;
use crate::config::model::PipelineConfig;

/// Outcome of a clean run.
#[derive(Debug, Clone, Copy)]
pub struct CleanReport {
    pub removed: usize,
}

/// Delete all generated artifacts under the dist root.
pub fn clean_dist(cfg: &PipelineConfig) -> Result<CleanReport> {
    let dist = &cfg.paths.dist_root;
    let mut report = CleanReport { removed: 0 };

    if !dist.is_dir() {
        debug!(dist = ?dist, "dist root absent, nothing to clean");
        return Ok(report);
    }

    let set = GlobPatternSet::compile(&delete_patterns(cfg), &protected_patterns(cfg))?;

    for entry in WalkDir::new(dist)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(rel) = relative_str(dist, entry.path()) else {
            continue;
        };

        if !set.matches(&rel) {
            continue;
        }

        match remove_file_forced(entry.path()) {
            Ok(true) => report.removed += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "failed to delete artifact");
            }
        }
    }

    Ok(report)
}

/// Generated-output patterns per asset class, relative to the dist root.
pub fn delete_patterns(cfg: &PipelineConfig) -> Vec<String> {
    vec![
        format!("{}/**/*.css", cfg.styles.dest),
        format!("{}/**/*.css.map", cfg.styles.dest),
        format!("{}/**/*", cfg.images.dest),
        format!("{}/**/*.js", cfg.scripts.dest),
    ]
}

/// Vendor bundles that must never be deleted: each configured file plus its
/// derived minified name (the historical `*.min.min.js` guard).
pub fn protected_patterns(cfg: &PipelineConfig) -> Vec<String> {
    let mut protected = Vec::new();

    for file in &cfg.vendor.files {
        let Some(name) = Path::new(file).file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        protected.push(format!("{}/{}", cfg.vendor.dest, name));

        let derived = match name.strip_suffix(".js") {
            Some(stem) => format!("{stem}.min.js"),
            None => format!("{name}.min.js"),
        };
        protected.push(format!("{}/**/{}", cfg.vendor.dest, derived));
    }

    protected
}

/// Returns Ok(true) if the file was removed, Ok(false) if it was already
/// gone.
fn remove_file_forced(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
