// src/assets/resolve.rs

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::assets::class::AssetClass;
use crate::config::model::PipelineConfig;

/// Compiled inclusion/exclusion glob patterns for one asset class.
///
/// The patterns are relative to a root directory; `matches` takes relative
/// paths with forward slashes (e.g. `"sass/main.scss"`). Exclusions are
/// evaluated after inclusions.
#[derive(Clone)]
pub struct GlobPatternSet {
    include: GlobSet,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for GlobPatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobPatternSet").finish_non_exhaustive()
    }
}

impl GlobPatternSet {
    /// Compile include/exclude pattern lists into matchers.
    pub fn compile(include: &[String], exclude: &[String]) -> Result<Self> {
        let include_set = build_globset(include).context("compiling include patterns")?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("compiling exclude patterns")?)
        };

        Ok(Self {
            include: include_set,
            exclude: exclude_set,
        })
    }

    /// Returns true if the given root-relative path is selected.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Absolute (source base, destination) directory pair for one asset class.
///
/// Outputs mirror the input tree below `source_base`; `dest` is always a
/// subdirectory of the dist root.
#[derive(Debug, Clone)]
pub struct DirMapping {
    pub source_base: PathBuf,
    pub dest: PathBuf,
}

/// A source file selected for a class.
#[derive(Debug, Clone)]
pub struct MatchedFile {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Path relative to the class's `source_base`; determines the output
    /// location under `dest`.
    pub rel: PathBuf,
}

/// Compiled patterns plus directory mapping for one asset class.
#[derive(Debug, Clone)]
pub struct ClassPaths {
    pub class: AssetClass,
    pub patterns: GlobPatternSet,
    pub mapping: DirMapping,
}

/// Resolves asset classes into glob pattern sets, directory mappings and
/// concrete file lists.
///
/// Built once at startup from validated configuration; pattern compilation
/// errors here abort the pipeline before anything runs.
#[derive(Debug, Clone)]
pub struct PathResolver {
    source_root: PathBuf,
    dist_root: PathBuf,
    classes: HashMap<AssetClass, ClassPaths>,
}

impl PathResolver {
    pub fn from_config(cfg: &PipelineConfig) -> Result<Self> {
        let source_root = cfg.paths.source_root.clone();
        let dist_root = cfg.paths.dist_root.clone();

        let mut classes = HashMap::new();

        classes.insert(
            AssetClass::Styles,
            ClassPaths {
                class: AssetClass::Styles,
                patterns: GlobPatternSet::compile(&cfg.styles.watch, &[])?,
                mapping: DirMapping {
                    source_base: source_root.join(&cfg.styles.base),
                    dest: dist_root.join(&cfg.styles.dest),
                },
            },
        );

        classes.insert(
            AssetClass::Images,
            ClassPaths {
                class: AssetClass::Images,
                patterns: GlobPatternSet::compile(&cfg.images.watch, &[])?,
                mapping: DirMapping {
                    source_base: source_root.join(&cfg.images.base),
                    dest: dist_root.join(&cfg.images.dest),
                },
            },
        );

        classes.insert(
            AssetClass::Scripts,
            ClassPaths {
                class: AssetClass::Scripts,
                patterns: GlobPatternSet::compile(&cfg.scripts.watch, &cfg.scripts.exclude)?,
                mapping: DirMapping {
                    source_base: source_root.join(&cfg.scripts.base),
                    dest: dist_root.join(&cfg.scripts.dest),
                },
            },
        );

        // Vendor files are exact paths; treat them as patterns rooted at the
        // source root so the watcher can share the same matching logic.
        classes.insert(
            AssetClass::Vendor,
            ClassPaths {
                class: AssetClass::Vendor,
                patterns: GlobPatternSet::compile(&cfg.vendor.files, &[])?,
                mapping: DirMapping {
                    source_base: source_root.clone(),
                    dest: dist_root.join(&cfg.vendor.dest),
                },
            },
        );

        Ok(Self {
            source_root,
            dist_root,
            classes,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dist_root(&self) -> &Path {
        &self.dist_root
    }

    /// Pattern set and directory mapping for a transform class.
    pub fn class(&self, class: AssetClass) -> Result<&ClassPaths> {
        self.classes
            .get(&class)
            .ok_or_else(|| anyhow!("no path mapping for asset class '{class}'"))
    }

    /// Enumerate source files currently matching the given class.
    ///
    /// Walks the source root, matches root-relative forward-slash paths
    /// against the class's pattern set and returns matches sorted by path so
    /// build output and notifications are deterministic.
    pub fn matched_files(&self, class: AssetClass) -> Result<Vec<MatchedFile>> {
        let paths = self.class(class)?;
        let mut matched = Vec::new();

        if !self.source_root.is_dir() {
            return Ok(matched);
        }

        for entry in WalkDir::new(&self.source_root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(rel_str) = relative_str(&self.source_root, entry.path()) else {
                continue;
            };

            if !paths.patterns.matches(&rel_str) {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(&paths.mapping.source_base)
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|_| {
                    // Matched outside the class base (unusual but legal
                    // config); fall back to a flat output name.
                    entry
                        .path()
                        .file_name()
                        .map(PathBuf::from)
                        .unwrap_or_default()
                });

            matched.push(MatchedFile {
                path: entry.path().to_path_buf(),
                rel,
            });
        }

        matched.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(matched)
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
