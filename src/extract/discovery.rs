//! Recursive input discovery

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Files under `root` whose extension equals `extension` (case-insensitive),
/// sorted by path
pub fn discover_inputs(root: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::file_not_found(root.display().to_string()));
    }

    let mut found = Vec::new();
    collect(root, extension, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect(&path, extension, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        {
            out.push(path);
        }
    }
    Ok(())
}
