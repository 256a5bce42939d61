use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use assetpipe::assets::{AssetClass, PathResolver};
use assetpipe::config::PipelineConfig;
use assetpipe::tasks::{clean_dist, run_class};
use image::{Rgba, RgbaImage};
use walkdir::WalkDir;

type TestResult = Result<(), Box<dyn Error>>;

fn project(root: &Path) -> PipelineConfig {
    let mut cfg = PipelineConfig::default();
    cfg.paths.source_root = root.join("src");
    cfg.paths.dist_root = root.join("dist");
    cfg
}

fn write_source(root: &Path, rel: &str, contents: &[u8]) -> TestResult {
    let path = root.join("src").join(rel);
    fs::create_dir_all(path.parent().expect("parent"))?;
    fs::write(path, contents)?;
    Ok(())
}

/// Clean, then every transform in the initial-build order.
fn build_once(cfg: &PipelineConfig) -> TestResult {
    let resolver = PathResolver::from_config(cfg)?;
    clean_dist(cfg)?;
    for class in AssetClass::TRANSFORMS {
        let report = run_class(cfg, &resolver, class)?;
        assert!(report.succeeded(), "{class} run failed: {:?}", report.failures);
    }
    Ok(())
}

fn snapshot(dist: &Path) -> Result<BTreeMap<String, Vec<u8>>, Box<dyn Error>> {
    let mut map = BTreeMap::new();
    for entry in WalkDir::new(dist).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            let rel = entry
                .path()
                .strip_prefix(dist)?
                .to_string_lossy()
                .into_owned();
            map.insert(rel, fs::read(entry.path())?);
        }
    }
    Ok(map)
}

#[test]
fn full_sequence_is_idempotent_on_an_unchanged_tree() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());

    write_source(
        tmp.path(),
        "sass/main.scss",
        b"$color: #222;\nbody { color: $color; }\n",
    )?;
    write_source(tmp.path(), "js/app.js", b"console.log(\"app\");\n")?;
    write_source(tmp.path(), "js/swiper-bundle.min.js", b"/* prebuilt */\n")?;

    let mut png = Vec::new();
    RgbaImage::from_pixel(4, 4, Rgba([20, 40, 60, 255]))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
    write_source(tmp.path(), "images/dot.png", &png)?;

    build_once(&cfg)?;
    let first = snapshot(&cfg.paths.dist_root)?;

    // Everything expected by the default layout is present.
    assert!(first.contains_key("css/main.css"));
    assert!(first.contains_key("css/main.css.map"));
    assert!(first.contains_key("css/main.min.css"));
    assert!(first.contains_key("images/dot.png"));
    assert!(first.contains_key("images/dot.webp"));
    assert!(first.contains_key("js/app.js"));
    assert!(first.contains_key("js/app.min.js"));
    assert!(first.contains_key("js/swiper-bundle.min.js"));

    build_once(&cfg)?;
    let second = snapshot(&cfg.paths.dist_root)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn rebuild_after_a_source_edit_replaces_only_that_artifact_set() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = project(tmp.path());

    write_source(tmp.path(), "sass/main.scss", b"body { margin: 0; }\n")?;
    write_source(tmp.path(), "js/app.js", b"console.log(1);\n")?;

    build_once(&cfg)?;
    let before = snapshot(&cfg.paths.dist_root)?;

    write_source(tmp.path(), "sass/main.scss", b"body { margin: 1px; }\n")?;
    build_once(&cfg)?;
    let after = snapshot(&cfg.paths.dist_root)?;

    assert_ne!(before["css/main.css"], after["css/main.css"]);
    assert_eq!(before["js/app.js"], after["js/app.js"]);
    assert_eq!(before["js/app.min.js"], after["js/app.min.js"]);
    Ok(())
}
