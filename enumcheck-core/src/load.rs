//! Snapshot discovery and loading.
//!
//! A snapshot is one JSON document describing a whole [`Program`]. A
//! directory may hold several; each is analyzed on its own since type and
//! object ids are only meaningful inside their snapshot.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{EnumcheckError, EnumcheckResult, IoResultExt};
use crate::syntax::Program;

/// Directories never searched for snapshots.
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Finds every `*.json` snapshot under `root`, sorted by path.
///
/// A file path is returned as-is.
pub fn gather_snapshots(root: &Path) -> EnumcheckResult<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();
    let mut found = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                Some(Err(EnumcheckError::io(path, e.into())))
            }
        })
        .collect::<EnumcheckResult<Vec<_>>>()?;

    found.sort();
    debug!(root = %root.display(), snapshots = found.len(), "gathered snapshots");
    Ok(found)
}

/// Reads, parses and validates one snapshot.
pub fn load_program(path: &Path) -> EnumcheckResult<Program> {
    let text = fs::read_to_string(path).with_path(path)?;
    parse_program(path, &text)
}

/// Parses snapshot text; `path` is only used for error context.
pub fn parse_program(path: &Path, text: &str) -> EnumcheckResult<Program> {
    let program: Program =
        serde_json::from_str(text).map_err(|e| EnumcheckError::json(path, &e))?;
    program.validate()?;
    debug!(
        path = %path.display(),
        units = program.units.len(),
        types = program.types.len(),
        "loaded snapshot"
    );
    Ok(program)
}

/// Loads several snapshots in parallel, keeping their order. Each snapshot
/// keeps its own outcome so one bad file does not hide the others.
pub fn load_programs(paths: &[PathBuf]) -> Vec<(PathBuf, EnumcheckResult<Program>)> {
    paths
        .par_iter()
        .map(|path| (path.clone(), load_program(path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "enumcheck_load_test_{}_{}",
            std::process::id(),
            id
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const MINIMAL: &str = r#"{
        "types": [{"kind": "basic", "name": "int"}],
        "objects": [{"name": "X", "kind": "const", "ty": 0, "unit": "app"}],
        "units": [{"path": "app", "scope": [0]}]
    }"#;

    #[test]
    fn test_gather_prunes_excluded_dirs() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::create_dir_all(dir.join("target")).unwrap();
        fs::write(dir.join("b.json"), MINIMAL).unwrap();
        fs::write(dir.join("nested/a.json"), MINIMAL).unwrap();
        fs::write(dir.join("target/skip.json"), MINIMAL).unwrap();
        fs::write(dir.join("notes.txt"), "not a snapshot").unwrap();

        let found = gather_snapshots(&dir).unwrap();
        assert_eq!(found, vec![dir.join("b.json"), dir.join("nested/a.json")]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_minimal_program() {
        let dir = temp_dir();
        let path = dir.join("app.json");
        fs::write(&path, MINIMAL).unwrap();

        let program = load_program(&path).unwrap();
        assert_eq!(program.units.len(), 1);
        assert!(program.unit("app").is_some());

        let broken = dir.join("broken.json");
        fs::write(&broken, "{ \"units\": 3 }").unwrap();
        let loaded = load_programs(&[path.clone(), broken.clone()]);
        assert_eq!(loaded[0].0, path);
        assert!(loaded[0].1.is_ok());
        assert_eq!(loaded[1].0, broken);
        assert!(loaded[1].1.as_ref().is_err_and(|e| e.is_recoverable()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = parse_program(Path::new("bad.json"), "{ \"units\": [ }").unwrap_err();
        assert!(matches!(err, EnumcheckError::Parse { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_dangling_type_is_rejected() {
        let text = r#"{
            "objects": [{"name": "X", "kind": "const", "ty": 7, "unit": "app"}],
            "units": [{"path": "app", "scope": [0]}]
        }"#;
        let err = parse_program(Path::new("dangling.json"), text).unwrap_err();
        assert!(matches!(err, EnumcheckError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_program(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, EnumcheckError::Io { .. }));
    }
}
