// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// Every section is optional; the defaults reproduce the conventional layout:
///
/// ```toml
/// [paths]
/// source_root = "src"
/// dist_root = "dist"
///
/// [styles]
/// watch = ["sass/**/*.scss"]
/// dest = "css"
///
/// [scripts]
/// watch = ["js/**/*.js"]
/// exclude = ["js/swiper-bundle.min.js", "js/**/swiper-bundle.min.min.js"]
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PipelineConfig {
    /// Source and distribution roots from `[paths]`.
    #[serde(default)]
    pub paths: PathsSection,

    /// Style pipeline settings from `[styles]`.
    #[serde(default)]
    pub styles: StylesSection,

    /// Image pipeline settings from `[images]`.
    #[serde(default)]
    pub images: ImagesSection,

    /// Script pipeline settings from `[scripts]`.
    #[serde(default)]
    pub scripts: ScriptsSection,

    /// Vendor passthrough settings from `[vendor]`.
    #[serde(default)]
    pub vendor: VendorSection,

    /// Dev server settings from `[server]`.
    #[serde(default)]
    pub server: ServerSection,

    /// Watch loop settings from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,
}

impl PipelineConfig {
    /// Make the source/dist roots absolute against the directory containing
    /// the config file (or the cwd when no file was given).
    pub fn resolve_roots(&mut self, base: &Path) {
        if self.paths.source_root.is_relative() {
            self.paths.source_root = base.join(&self.paths.source_root);
        }
        if self.paths.dist_root.is_relative() {
            self.paths.dist_root = base.join(&self.paths.dist_root);
        }
    }
}

/// `[paths]` section: the fixed source/destination root pair.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    #[serde(default = "default_dist_root")]
    pub dist_root: PathBuf,
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_dist_root() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            dist_root: default_dist_root(),
        }
    }
}

/// `[styles]` section.
///
/// `base` is the directory the watch patterns are rooted in; output paths
/// mirror the input tree below it.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesSection {
    #[serde(default = "default_styles_watch")]
    pub watch: Vec<String>,

    #[serde(default = "default_styles_base")]
    pub base: String,

    #[serde(default = "default_styles_dest")]
    pub dest: String,

    /// Browserslist queries handed to the CSS post-processor.
    #[serde(default = "default_browserslist")]
    pub browserslist: Vec<String>,
}

fn default_styles_watch() -> Vec<String> {
    vec!["sass/**/*.scss".to_string()]
}

fn default_styles_base() -> String {
    "sass".to_string()
}

fn default_styles_dest() -> String {
    "css".to_string()
}

fn default_browserslist() -> Vec<String> {
    [
        "last 2 versions",
        "> 5%",
        "ie 11",
        "not ie <= 10",
        "ios >= 8",
        "and_chr >= 5",
        "Android >= 5",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for StylesSection {
    fn default() -> Self {
        Self {
            watch: default_styles_watch(),
            base: default_styles_base(),
            dest: default_styles_dest(),
            browserslist: default_browserslist(),
        }
    }
}

/// `[images]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesSection {
    #[serde(default = "default_images_watch")]
    pub watch: Vec<String>,

    #[serde(default = "default_images_base")]
    pub base: String,

    #[serde(default = "default_images_dest")]
    pub dest: String,

    /// Re-encode quality for JPEG inputs (1..=100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_images_watch() -> Vec<String> {
    vec!["images/**/*".to_string()]
}

fn default_images_base() -> String {
    "images".to_string()
}

fn default_images_dest() -> String {
    "images".to_string()
}

fn default_jpeg_quality() -> u8 {
    80
}

impl Default for ImagesSection {
    fn default() -> Self {
        Self {
            watch: default_images_watch(),
            base: default_images_base(),
            dest: default_images_dest(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// `[scripts]` section.
///
/// `exclude` keeps prebuilt vendor bundles out of the minify pipeline. The
/// `*.min.min.js` entry is a protective pattern only; the pipeline never
/// produces that name.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptsSection {
    #[serde(default = "default_scripts_watch")]
    pub watch: Vec<String>,

    #[serde(default = "default_scripts_exclude")]
    pub exclude: Vec<String>,

    #[serde(default = "default_scripts_base")]
    pub base: String,

    #[serde(default = "default_scripts_dest")]
    pub dest: String,
}

fn default_scripts_watch() -> Vec<String> {
    vec!["js/**/*.js".to_string()]
}

fn default_scripts_exclude() -> Vec<String> {
    vec![
        "js/swiper-bundle.min.js".to_string(),
        "js/**/swiper-bundle.min.min.js".to_string(),
    ]
}

fn default_scripts_base() -> String {
    "js".to_string()
}

fn default_scripts_dest() -> String {
    "js".to_string()
}

impl Default for ScriptsSection {
    fn default() -> Self {
        Self {
            watch: default_scripts_watch(),
            exclude: default_scripts_exclude(),
            base: default_scripts_base(),
            dest: default_scripts_dest(),
        }
    }
}

/// `[vendor]` section: prebuilt files copied verbatim and protected from
/// cleaning.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorSection {
    /// Paths relative to the source root. A missing file is not an error.
    #[serde(default = "default_vendor_files")]
    pub files: Vec<String>,

    #[serde(default = "default_scripts_dest")]
    pub dest: String,
}

fn default_vendor_files() -> Vec<String> {
    vec!["js/swiper-bundle.min.js".to_string()]
}

impl Default for VendorSection {
    fn default() -> Self {
        Self {
            files: default_vendor_files(),
            dest: default_scripts_dest(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Patterns under the dist root that trigger a reload without any
    /// transform (hand-authored HTML).
    #[serde(default = "default_server_html")]
    pub html: Vec<String>,
}

fn default_server_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_server_html() -> Vec<String> {
    vec!["**/*.html".to_string()]
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            html: default_server_html(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Quiet window after a filesystem event before the binding runs; rapid
    /// repeated saves coalesce into one rebuild.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Skip a rebuild when the aggregate content hash of the matched source
    /// files is unchanged since the last run.
    #[serde(default)]
    pub use_hash: bool,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            use_hash: false,
        }
    }
}
