// src/tasks/vendor.rs

//! Vendor passthrough: copy prebuilt bundles verbatim.
//!
//! Absent files are tolerated silently; a project without the bundle must
//! still build.

use std::fs;

use anyhow::{Context, Result};
use tracing::debug;

use crate::assets::{AssetClass, PathResolver};
use crate::config::model::VendorSection;
use crate::tasks::report::TaskReport;

pub fn copy_vendor(resolver: &PathResolver, cfg: &VendorSection) -> Result<TaskReport> {
    let mut report = TaskReport::new(AssetClass::Vendor);

    let dest_dir = resolver.dist_root().join(&cfg.dest);

    for rel in &cfg.files {
        let source = resolver.source_root().join(rel);
        if !source.is_file() {
            debug!(source = %source.display(), "vendor file absent, skipping");
            continue;
        }

        let Some(name) = source.file_name() else {
            continue;
        };

        fs::create_dir_all(&dest_dir)
            .with_context(|| format!("creating output directory {dest_dir:?}"))?;

        let dest = dest_dir.join(name);
        match fs::copy(&source, &dest) {
            Ok(_) => report.written += 1,
            Err(err) => report.record_failure(&source, err),
        }
    }

    Ok(report)
}
