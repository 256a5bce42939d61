// src/tasks/images.rs

//! Image transform: compress in place, convert rasters to WebP.
//!
//! PNGs go through `oxipng`, JPEGs are re-encoded at the configured quality,
//! and both additionally get a lossless WebP sibling. SVG and any other
//! format are copied verbatim; converting those to a raster format would
//! lose information, so they only get the passthrough artifact.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType};

use crate::assets::{AssetClass, MatchedFile, PathResolver};
use crate::config::model::ImagesSection;
use crate::tasks::report::TaskReport;

pub fn build_images(resolver: &PathResolver, cfg: &ImagesSection) -> Result<TaskReport> {
    let mut report = TaskReport::new(AssetClass::Images);

    let files = resolver.matched_files(AssetClass::Images)?;
    if files.is_empty() {
        return Ok(report);
    }

    let paths = resolver.class(AssetClass::Images)?;

    for file in &files {
        let dest = paths.mapping.dest.join(&file.rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {parent:?}"))?;
        }

        match process_one(file, &dest, cfg) {
            Ok(written) => report.written += written,
            Err(err) => report.record_failure(&file.path, err),
        }
    }

    Ok(report)
}

fn process_one(file: &MatchedFile, dest: &Path, cfg: &ImagesSection) -> Result<usize> {
    match extension(&file.path).as_deref() {
        Some("png") => {
            let data =
                fs::read(&file.path).with_context(|| format!("reading {}", file.path.display()))?;
            let optimized = oxipng::optimize_from_memory(&data, &oxipng::Options::from_preset(2))
                .map_err(|e| anyhow!("optimizing {}: {e}", file.path.display()))?;
            fs::write(dest, optimized).with_context(|| format!("writing {dest:?}"))?;

            let img = image::open(&file.path)
                .with_context(|| format!("decoding {}", file.path.display()))?;
            write_webp(&img, dest)?;
            Ok(2)
        }
        Some("jpg") | Some("jpeg") => {
            let img = image::open(&file.path)
                .with_context(|| format!("decoding {}", file.path.display()))?;

            let mut out = Vec::new();
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut out), cfg.jpeg_quality);
            img.write_with_encoder(encoder)
                .with_context(|| format!("re-encoding {}", file.path.display()))?;
            fs::write(dest, out).with_context(|| format!("writing {dest:?}"))?;

            write_webp(&img, dest)?;
            Ok(2)
        }
        _ => {
            // SVG, GIF, existing WebP, fonts dropped into the images tree…
            // copy verbatim, no conversion.
            fs::copy(&file.path, dest).with_context(|| {
                format!("copying {} to {dest:?}", file.path.display())
            })?;
            Ok(1)
        }
    }
}

/// Write `dest`'s WebP sibling (`logo.png` -> `logo.webp`).
fn write_webp(img: &DynamicImage, dest: &Path) -> Result<()> {
    let webp_dest = dest.with_extension("webp");
    let rgba = img.to_rgba8();

    let mut out = Vec::new();
    let encoder = WebPEncoder::new_lossless(Cursor::new(&mut out));
    encoder
        .encode(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("encoding {webp_dest:?}"))?;

    fs::write(&webp_dest, out).with_context(|| format!("writing {webp_dest:?}"))?;
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
