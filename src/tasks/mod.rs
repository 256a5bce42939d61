// src/tasks/mod.rs

//! Transform and clean tasks.
//!
//! Each transform consumes the files its asset class currently matches and
//! writes artifacts under the class's destination directory, collecting
//! per-file failures into a [`TaskReport`] instead of aborting. The clean
//! task removes previously generated artifacts, sparing protected vendor
//! files.
//!
//! Tasks are synchronous; the pipeline executor runs them on blocking
//! threads.

pub mod clean;
pub mod images;
pub mod report;
pub mod scripts;
pub mod styles;
pub mod vendor;

use anyhow::Result;

use crate::assets::{AssetClass, PathResolver};
use crate::config::model::PipelineConfig;

pub use clean::{clean_dist, CleanReport};
pub use report::{TaskFailure, TaskReport};

/// Run the transform for one asset class to completion.
///
/// Returns `Err` only for infrastructure failures (unreadable source root,
/// uncreatable destination directory); per-file transform errors land in the
/// report.
pub fn run_class(
    cfg: &PipelineConfig,
    resolver: &PathResolver,
    class: AssetClass,
) -> Result<TaskReport> {
    match class {
        AssetClass::Styles => styles::build_styles(resolver, &cfg.styles),
        AssetClass::Images => images::build_images(resolver, &cfg.images),
        AssetClass::Scripts => scripts::build_scripts(resolver),
        AssetClass::Vendor => vendor::copy_vendor(resolver, &cfg.vendor),
        // Html bindings reload without transforming; nothing to do here.
        AssetClass::Html => Ok(TaskReport::new(AssetClass::Html)),
    }
}
