// src/tasks/scripts.rs

//! Script transform: verbatim copy plus a suffix-tagged minified copy.
//!
//! The plain copy is written before minification runs, so a script with a
//! syntax error still reaches the dist tree; the minify failure is recorded
//! and the rest of the run continues.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use minify_js::{minify, Session, TopLevelMode};

use crate::assets::{AssetClass, PathResolver};
use crate::tasks::report::TaskReport;

pub fn build_scripts(resolver: &PathResolver) -> Result<TaskReport> {
    let mut report = TaskReport::new(AssetClass::Scripts);

    let files = resolver.matched_files(AssetClass::Scripts)?;
    if files.is_empty() {
        return Ok(report);
    }

    let paths = resolver.class(AssetClass::Scripts)?;
    let session = Session::new();

    for file in &files {
        let dest = paths.mapping.dest.join(&file.rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {parent:?}"))?;
        }

        fs::copy(&file.path, &dest)
            .with_context(|| format!("copying {} to {dest:?}", file.path.display()))?;
        report.written += 1;

        match minify_one(&session, &file.path, &dest) {
            Ok(()) => report.written += 1,
            Err(err) => report.record_failure(&file.path, err),
        }
    }

    Ok(report)
}

fn minify_one(session: &Session, source: &Path, dest: &Path) -> Result<()> {
    let code = fs::read(source).with_context(|| format!("reading {}", source.display()))?;

    let mut out = Vec::new();
    minify(session, TopLevelMode::Global, &code, &mut out)
        .map_err(|e| anyhow!("minifying {}: {e:?}", source.display()))?;

    let min_dest = min_js_path(dest);
    fs::write(&min_dest, out).with_context(|| format!("writing {min_dest:?}"))?;
    Ok(())
}

/// `app.js` -> `app.min.js`.
fn min_js_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out.js".to_string());
    let min_name = match name.strip_suffix(".js") {
        Some(stem) => format!("{stem}.min.js"),
        None => format!("{name}.min.js"),
    };
    dest.with_file_name(min_name)
}
