//! core/library.rs
//! Files on disk: discover, load, save.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::types::FileEntry;

const EXTENSIONS: [&str; 4] = ["mp3", "mp2", "aac", "lrc"];

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_dir() {
            walk_dir(&path, out)?;
        } else if is_supported(&path) {
            out.push(path);
        }
    }

    Ok(())
}

/// Expand files and directories into supported file paths.
///
/// - Directories are walked recursively; plain files are taken as given
/// - De-dupes across overlapping roots
/// - Sorted once here
pub fn collect_paths(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for root in roots {
        if root.is_dir() {
            walk_dir(root, &mut found)?;
        } else {
            found.push(root.clone());
        }
    }

    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(found.len());
    found.retain(|p| seen.insert(p.clone()));
    found.sort();
    debug!(roots = roots.len(), files = found.len(), "collected paths");
    Ok(found)
}

pub fn load_file(path: &Path) -> Result<FileEntry> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    FileEntry::from_bytes(name, bytes).with_context(|| format!("loading {}", path.display()))
}

/// Commit the entry and write its bytes back to `path`.
pub fn save_file(path: &Path, entry: &mut FileEntry) -> Result<()> {
    let bytes = entry
        .commit()
        .with_context(|| format!("rendering {}", path.display()))?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    info!(file = %path.display(), bytes = bytes.len(), "saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_keeps_supported_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("sub/a.LRC"), b"").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"").unwrap();

        let root = dir.path().to_path_buf();
        let paths = collect_paths(&[root.clone(), root]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, [PathBuf::from("b.mp3"), PathBuf::from("sub/a.LRC")]);
    }
}
