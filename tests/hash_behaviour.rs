use std::error::Error;
use std::fs;

use assetpipe::watch::{compute_hash_for_paths, load_class_hash, save_class_hash};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn hash_is_independent_of_path_order() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let a = tmp.path().join("a.scss");
    let b = tmp.path().join("b.scss");
    fs::write(&a, "body { color: red; }")?;
    fs::write(&b, "h1 { color: blue; }")?;

    let forward = compute_hash_for_paths([&a, &b])?;
    let backward = compute_hash_for_paths([&b, &a])?;
    assert_eq!(forward, backward);
    Ok(())
}

#[test]
fn hash_changes_when_content_changes() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let file = tmp.path().join("app.js");
    fs::write(&file, "let x = 1;")?;
    let before = compute_hash_for_paths([&file])?;

    fs::write(&file, "let x = 2;")?;
    let after = compute_hash_for_paths([&file])?;

    assert_ne!(before, after);
    Ok(())
}

#[test]
fn missing_files_are_skipped_not_fatal() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let present = tmp.path().join("present.css");
    fs::write(&present, "p {}")?;

    let with_ghost =
        compute_hash_for_paths([present.clone(), tmp.path().join("deleted.css")])?;
    let without = compute_hash_for_paths([present])?;

    assert_eq!(with_ghost, without);
    Ok(())
}

#[test]
fn stored_hashes_round_trip_per_binding() -> TestResult {
    let tmp = tempfile::tempdir()?;

    assert_eq!(load_class_hash(tmp.path(), "styles")?, None);

    save_class_hash(tmp.path(), "styles", "abc123")?;
    save_class_hash(tmp.path(), "scripts", "def456")?;

    assert_eq!(load_class_hash(tmp.path(), "styles")?.as_deref(), Some("abc123"));
    assert_eq!(load_class_hash(tmp.path(), "scripts")?.as_deref(), Some("def456"));

    // Overwrites replace, and don't disturb other bindings.
    save_class_hash(tmp.path(), "styles", "abc999")?;
    assert_eq!(load_class_hash(tmp.path(), "styles")?.as_deref(), Some("abc999"));
    assert_eq!(load_class_hash(tmp.path(), "scripts")?.as_deref(), Some("def456"));
    Ok(())
}
