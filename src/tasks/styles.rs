// src/tasks/styles.rs

//! Style transform: Sass compilation plus CSS post-processing.
//!
//! Each stylesheet is compiled with `grass`, lowered/prefixed for the
//! configured browserslist with `lightningcss`, and emitted three ways:
//! `name.css` (expanded, with a sourceMappingURL footer), `name.css.map`,
//! and `name.min.css`.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use tracing::debug;

use crate::assets::{AssetClass, ClassPaths, MatchedFile, PathResolver};
use crate::config::model::StylesSection;
use crate::tasks::report::TaskReport;

pub fn build_styles(resolver: &PathResolver, cfg: &StylesSection) -> Result<TaskReport> {
    let mut report = TaskReport::new(AssetClass::Styles);

    let files = resolver.matched_files(AssetClass::Styles)?;
    if files.is_empty() {
        return Ok(report);
    }

    let paths = resolver.class(AssetClass::Styles)?;
    // Already checked at startup; re-parsed here because Browsers is cheap
    // and the section owns its query strings.
    let browsers = Browsers::from_browserslist(&cfg.browserslist)
        .map_err(|e| anyhow!("invalid browserslist: {e}"))?;

    for file in &files {
        match compile_one(file, paths, &browsers) {
            Ok(written) => report.written += written,
            Err(err) => report.record_failure(&file.path, err),
        }
    }

    Ok(report)
}

fn compile_one(
    file: &MatchedFile,
    paths: &ClassPaths,
    browsers: &Option<Browsers>,
) -> Result<usize> {
    // Sass partials are inputs to other sheets, never standalone outputs.
    if is_partial(&file.path) {
        debug!(source = %file.path.display(), "skipping sass partial");
        return Ok(0);
    }

    let options = grass::Options::default()
        .style(grass::OutputStyle::Expanded)
        .load_path(&paths.mapping.source_base);
    let compiled = grass::from_path(&file.path, &options)
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("compiling {}", file.path.display()))?;

    let rel_css = file.rel.with_extension("css");
    let dest = paths.mapping.dest.join(&rel_css);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {parent:?}"))?;
    }

    let filename = file.path.to_string_lossy().into_owned();
    let mut sheet = StyleSheet::parse(
        &compiled,
        ParserOptions {
            filename: filename.clone(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| anyhow!("post-processing {filename}: {e}"))?;

    sheet
        .minify(MinifyOptions {
            targets: targets_for(browsers.clone()),
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow!("lowering {filename}: {e}"))?;

    let mut source_map = SourceMap::new("/");
    let expanded = sheet
        .to_css(PrinterOptions {
            targets: targets_for(browsers.clone()),
            source_map: Some(&mut source_map),
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("printing {filename}: {e}"))?;

    let minified = sheet
        .to_css(PrinterOptions {
            minify: true,
            targets: targets_for(browsers.clone()),
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("minifying {filename}: {e}"))?;

    let css_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out.css".to_string());
    let map_name = format!("{css_name}.map");

    fs::write(
        &dest,
        format!("{}\n/*# sourceMappingURL={map_name} */\n", expanded.code),
    )
    .with_context(|| format!("writing {dest:?}"))?;

    let map_json = source_map
        .to_json(None)
        .map_err(|e| anyhow!("serializing source map for {filename}: {e:?}"))?;
    let map_dest = dest.with_file_name(&map_name);
    fs::write(&map_dest, map_json).with_context(|| format!("writing {map_dest:?}"))?;

    let min_dest = dest.with_file_name(min_css_name(&css_name));
    fs::write(&min_dest, minified.code).with_context(|| format!("writing {min_dest:?}"))?;

    Ok(3)
}

fn targets_for(browsers: Option<Browsers>) -> Targets {
    Targets {
        browsers,
        ..Targets::default()
    }
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_'))
        .unwrap_or(false)
}

/// `main.css` -> `main.min.css`.
fn min_css_name(css_name: &str) -> String {
    match css_name.strip_suffix(".css") {
        Some(stem) => format!("{stem}.min.css"),
        None => format!("{css_name}.min.css"),
    }
}
