// src/watch/profiles.rs

use anyhow::{Context, Result};

use crate::assets::{AssetClass, GlobPatternSet};
use crate::config::model::PipelineConfig;

/// Which directory tree a profile's patterns are evaluated against.
///
/// Transform bindings watch the source tree; the HTML binding watches the
/// dist tree, where pages are authored directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchRoot {
    Source,
    Dist,
}

/// Compiled watch patterns for a single binding.
#[derive(Debug, Clone)]
pub struct WatchProfile {
    pub class: AssetClass,
    pub root: WatchRoot,
    pub patterns: GlobPatternSet,
}

impl WatchProfile {
    /// Returns true if this binding is interested in the given path
    /// (relative to the profile's root).
    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns.matches(rel_path)
    }
}

/// Build one profile per binding from validated configuration.
pub fn build_watch_profiles(cfg: &PipelineConfig) -> Result<Vec<WatchProfile>> {
    let mut profiles = Vec::new();

    profiles.push(WatchProfile {
        class: AssetClass::Styles,
        root: WatchRoot::Source,
        patterns: GlobPatternSet::compile(&cfg.styles.watch, &[])
            .context("building styles watch profile")?,
    });

    profiles.push(WatchProfile {
        class: AssetClass::Images,
        root: WatchRoot::Source,
        patterns: GlobPatternSet::compile(&cfg.images.watch, &[])
            .context("building images watch profile")?,
    });

    profiles.push(WatchProfile {
        class: AssetClass::Scripts,
        root: WatchRoot::Source,
        patterns: GlobPatternSet::compile(&cfg.scripts.watch, &cfg.scripts.exclude)
            .context("building scripts watch profile")?,
    });

    profiles.push(WatchProfile {
        class: AssetClass::Vendor,
        root: WatchRoot::Source,
        patterns: GlobPatternSet::compile(&cfg.vendor.files, &[])
            .context("building vendor watch profile")?,
    });

    profiles.push(WatchProfile {
        class: AssetClass::Html,
        root: WatchRoot::Dist,
        patterns: GlobPatternSet::compile(&cfg.server.html, &[])
            .context("building html watch profile")?,
    });

    Ok(profiles)
}
