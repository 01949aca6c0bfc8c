//! Run folder naming and output area reset

use crate::error::{Error, Result};
use crate::types::RunId;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Output folder assigned to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFolder {
    /// Join key, equal to the folder name
    pub run_id: RunId,
    /// Folder path inside the output area
    pub path: PathBuf,
}

/// `<file stem>_<8 hex chars>` where the hex is the SHA-256 of the input's
/// parent directory path.
///
/// Same-named files in different directories get distinct ids; re-running
/// over the same file yields the same id.
pub fn run_id_for(input: &Path) -> RunId {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = input
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(parent.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    RunId::new(format!("{stem}_{}", &digest[..8]))
}

/// Assign and create (if absent) the run folder of `input` under `output_dir`
pub fn create_run_folder(output_dir: &Path, input: &Path) -> Result<RunFolder> {
    let run_id = run_id_for(input);
    let path = output_dir.join(run_id.as_str());
    fs::create_dir_all(&path).map_err(|e| {
        Error::output(format!(
            "Failed to create run folder '{}': {e}",
            path.display()
        ))
    })?;
    Ok(RunFolder { run_id, path })
}

/// Remove every file and directory inside `output_dir`, keeping the
/// directory itself. Returns the number of entries removed.
pub fn clear_output_area(output_dir: &Path) -> Result<usize> {
    if !output_dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }
    Ok(removed)
}
