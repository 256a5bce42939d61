// src/watch/hash.rs

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::debug;

/// Hash store location, relative to the project root (the directory the
/// config file lives in).
///
/// The file format is a simple line-based mapping:
///
/// ```text
/// styles <whitespace> hex_hash
/// scripts <whitespace> hex_hash
/// ...
/// ```
pub const HASH_FILE: &str = ".assetpipe/hashes";

/// Compute a deterministic hash over the contents of the given files.
///
/// The caller decides which files belong to a binding (all files matching
/// its effective patterns). Order of `paths` does not matter; we sort them
/// before hashing to keep the hash stable.
pub fn compute_hash_for_paths<I, P>(paths: I) -> Result<String>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut hasher = Hasher::new();

    let mut paths_vec: Vec<PathBuf> = paths
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect();
    paths_vec.sort();

    for path in paths_vec {
        if path.is_file() {
            debug!("hashing file {:?}", path);
            let mut file = File::open(&path)
                .with_context(|| format!("opening file for hashing: {path:?}"))?;
            let mut buf = [0u8; 8192];
            loop {
                let n = file.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
        }
    }

    let hash = hasher.finalize().to_hex().to_string();
    debug!(hash = %hash, "computed aggregate hash");
    Ok(hash)
}

/// Load the previously stored hash for a binding, if present.
pub fn load_class_hash(project_root: &Path, class: &str) -> Result<Option<String>> {
    let map = load_all_hashes(project_root)?;
    Ok(map.get(class).cloned())
}

/// Save the hash for a binding, merging with existing entries.
pub fn save_class_hash(project_root: &Path, class: &str, hash: &str) -> Result<()> {
    let mut map = load_all_hashes(project_root)?;
    map.insert(class.to_string(), hash.to_string());
    save_all_hashes(project_root, &map)?;
    debug!(class = %class, hash = %hash, "stored binding hash");
    Ok(())
}

fn load_all_hashes(project_root: &Path) -> Result<HashMap<String, String>> {
    let path = project_root.join(HASH_FILE);

    if !path.exists() {
        return Ok(HashMap::new());
    }

    let file = File::open(&path).with_context(|| format!("opening hash file at {path:?}"))?;
    let reader = BufReader::new(file);

    let mut map = HashMap::new();

    for line_res in reader.lines() {
        let line = line_res?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some((name, hash)) = trimmed.split_once(char::is_whitespace) {
            map.insert(name.to_string(), hash.trim().to_string());
        }
    }

    Ok(map)
}

fn save_all_hashes(project_root: &Path, map: &HashMap<String, String>) -> Result<()> {
    let path = project_root.join(HASH_FILE);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating hash directory at {parent:?}"))?;
    }

    let file = File::create(&path).with_context(|| format!("creating hash file at {path:?}"))?;
    let mut writer = BufWriter::new(file);

    for (name, hash) in map.iter() {
        writeln!(writer, "{name} {hash}")?;
    }

    writer.flush()?;
    Ok(())
}
