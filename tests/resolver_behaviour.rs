use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use assetpipe::assets::{AssetClass, GlobPatternSet, PathResolver};
use assetpipe::config::PipelineConfig;

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
fn exclusions_are_applied_after_inclusions() -> TestResult {
    let set = GlobPatternSet::compile(
        &["js/**/*.js".to_string()],
        &["js/swiper-bundle.min.js".to_string()],
    )?;

    assert!(set.matches("js/app.js"));
    assert!(set.matches("js/pages/home.js"));
    assert!(!set.matches("js/swiper-bundle.min.js"));
    assert!(!set.matches("css/app.js.map"));
    Ok(())
}

#[test]
fn script_matches_exclude_vendor_bundles() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());
    touch(tmp.path(), "src/js/app.js")?;
    touch(tmp.path(), "src/js/swiper-bundle.min.js")?;

    let resolver = PathResolver::from_config(&cfg)?;

    let scripts = resolver.matched_files(AssetClass::Scripts)?;
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].rel, PathBuf::from("app.js"));

    let vendor = resolver.matched_files(AssetClass::Vendor)?;
    assert_eq!(vendor.len(), 1);
    assert!(vendor[0].path.ends_with("js/swiper-bundle.min.js"));
    Ok(())
}

#[test]
fn matches_preserve_subdirectory_structure() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());
    touch(tmp.path(), "src/sass/pages/home.scss")?;
    touch(tmp.path(), "src/sass/main.scss")?;

    let resolver = PathResolver::from_config(&cfg)?;
    let styles = resolver.matched_files(AssetClass::Styles)?;

    let rels: Vec<&PathBuf> = styles.iter().map(|m| &m.rel).collect();
    assert_eq!(rels.len(), 2);
    assert!(rels.contains(&&PathBuf::from("main.scss")));
    assert!(rels.contains(&&PathBuf::from("pages/home.scss")));
    Ok(())
}

#[test]
fn files_outside_class_patterns_are_invisible() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());
    touch(tmp.path(), "src/sass/main.scss")?;
    touch(tmp.path(), "src/notes.txt")?;

    let resolver = PathResolver::from_config(&cfg)?;

    assert_eq!(resolver.matched_files(AssetClass::Styles)?.len(), 1);
    assert!(resolver.matched_files(AssetClass::Scripts)?.is_empty());
    assert!(resolver.matched_files(AssetClass::Images)?.is_empty());
    Ok(())
}

#[test]
fn absent_source_root_yields_no_matches() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());

    let resolver = PathResolver::from_config(&cfg)?;
    assert!(resolver.matched_files(AssetClass::Styles)?.is_empty());
    Ok(())
}

#[test]
fn matches_are_sorted_for_deterministic_builds() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());
    touch(tmp.path(), "src/js/zebra.js")?;
    touch(tmp.path(), "src/js/alpha.js")?;
    touch(tmp.path(), "src/js/middle.js")?;

    let resolver = PathResolver::from_config(&cfg)?;
    let scripts = resolver.matched_files(AssetClass::Scripts)?;

    let names: Vec<String> = scripts
        .iter()
        .map(|m| m.rel.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["alpha.js", "middle.js", "zebra.js"]);
    Ok(())
}
