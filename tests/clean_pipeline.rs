use std::error::Error;
use std::fs;
use std::path::Path;

use assetpipe::config::PipelineConfig;
use assetpipe::tasks::clean::{clean_dist, delete_patterns, protected_patterns};

type TestResult = Result<(), Box<dyn Error>>;

fn project(root: &Path) -> PipelineConfig {
    let mut cfg = PipelineConfig::default();
    cfg.paths.source_root = root.join("src");
    cfg.paths.dist_root = root.join("dist");
    cfg
}

fn touch(root: &Path, rel: &str) -> TestResult {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent"))?;
    fs::write(path, b"x")?;
    Ok(())
}

#[test]
fn clean_removes_generated_artifacts_but_protects_vendor() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());

    touch(tmp.path(), "dist/css/main.css")?;
    touch(tmp.path(), "dist/css/main.css.map")?;
    touch(tmp.path(), "dist/css/main.min.css")?;
    touch(tmp.path(), "dist/images/logo.png")?;
    touch(tmp.path(), "dist/images/logo.webp")?;
    touch(tmp.path(), "dist/js/app.js")?;
    touch(tmp.path(), "dist/js/app.min.js")?;
    touch(tmp.path(), "dist/js/swiper-bundle.min.js")?;
    touch(tmp.path(), "dist/js/swiper-bundle.min.min.js")?;
    touch(tmp.path(), "dist/index.html")?;

    let report = clean_dist(&cfg)?;
    assert_eq!(report.removed, 7);

    let dist = tmp.path().join("dist");
    assert!(!dist.join("css/main.css").exists());
    assert!(!dist.join("css/main.css.map").exists());
    assert!(!dist.join("css/main.min.css").exists());
    assert!(!dist.join("images/logo.png").exists());
    assert!(!dist.join("images/logo.webp").exists());
    assert!(!dist.join("js/app.js").exists());
    assert!(!dist.join("js/app.min.js").exists());

    // Vendor bundle and its historical double-minified name survive.
    assert!(dist.join("js/swiper-bundle.min.js").is_file());
    assert!(dist.join("js/swiper-bundle.min.min.js").is_file());
    // Hand-authored pages are not generated output.
    assert!(dist.join("index.html").is_file());
    Ok(())
}

#[test]
fn cleaning_an_absent_dist_root_is_fine() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());

    let report = clean_dist(&cfg)?;
    assert_eq!(report.removed, 0);
    Ok(())
}

#[test]
fn cleaning_twice_is_idempotent() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());
    touch(tmp.path(), "dist/js/app.js")?;

    assert_eq!(clean_dist(&cfg)?.removed, 1);
    assert_eq!(clean_dist(&cfg)?.removed, 0);
    Ok(())
}

#[test]
fn protected_names_are_derived_from_vendor_files() -> TestResult {
    let cfg = PipelineConfig::default();

    let protected = protected_patterns(&cfg);
    assert!(protected.contains(&"js/swiper-bundle.min.js".to_string()));
    assert!(protected.contains(&"js/**/swiper-bundle.min.min.js".to_string()));

    let deleted = delete_patterns(&cfg);
    assert!(deleted.contains(&"css/**/*.css".to_string()));
    assert!(deleted.contains(&"css/**/*.css.map".to_string()));
    assert!(deleted.contains(&"images/**/*".to_string()));
    assert!(deleted.contains(&"js/**/*.js".to_string()));
    Ok(())
}
