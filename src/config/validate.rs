// src/config/validate.rs

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use lightningcss::targets::Browsers;

use crate::assets::GlobPatternSet;
use crate::config::model::PipelineConfig;

/// Run startup validation against a loaded configuration.
///
/// This checks:
/// - all watch/exclude glob patterns compile
/// - the browserslist queries parse
/// - `images.jpeg_quality` is within 1..=100
/// - `server.addr` parses as a socket address
///
/// Transform-time conditions (missing inputs, unparsable sources) are *not*
/// validated here; those are recoverable and reported per file at run time.
pub fn validate_config(cfg: &PipelineConfig) -> Result<()> {
    validate_patterns(cfg)?;
    validate_browserslist(cfg)?;
    validate_images(cfg)?;
    validate_server(cfg)?;
    Ok(())
}

fn validate_patterns(cfg: &PipelineConfig) -> Result<()> {
    GlobPatternSet::compile(&cfg.styles.watch, &[])
        .context("invalid [styles].watch pattern")?;
    GlobPatternSet::compile(&cfg.images.watch, &[])
        .context("invalid [images].watch pattern")?;
    GlobPatternSet::compile(&cfg.scripts.watch, &cfg.scripts.exclude)
        .context("invalid [scripts] pattern")?;
    GlobPatternSet::compile(&cfg.vendor.files, &[])
        .context("invalid [vendor].files entry")?;
    GlobPatternSet::compile(&cfg.server.html, &[])
        .context("invalid [server].html pattern")?;
    Ok(())
}

fn validate_browserslist(cfg: &PipelineConfig) -> Result<()> {
    Browsers::from_browserslist(&cfg.styles.browserslist)
        .map_err(|e| anyhow!("invalid [styles].browserslist: {e}"))?;
    Ok(())
}

fn validate_images(cfg: &PipelineConfig) -> Result<()> {
    let q = cfg.images.jpeg_quality;
    if q == 0 || q > 100 {
        return Err(anyhow!(
            "[images].jpeg_quality must be within 1..=100 (got {q})"
        ));
    }
    Ok(())
}

fn validate_server(cfg: &PipelineConfig) -> Result<()> {
    cfg.server
        .addr
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid [server].addr: {}", cfg.server.addr))?;
    Ok(())
}
