//! Per-table model file index

use super::extractor::list_run_folders;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One `*.tmdl` file of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFileEntry {
    /// Run folder name
    #[serde(rename = "resultFolder")]
    pub result_folder: String,
    /// Full path of the file
    pub tmdl_path: String,
    /// File name
    pub tmdl_name: String,
}

/// List the `*.tmdl` files in `tables_dir` of every run folder under `root`
pub fn index_table_files(
    root: impl AsRef<Path>,
    tables_dir: impl AsRef<Path>,
) -> Result<Vec<TableFileEntry>> {
    let mut entries = Vec::new();

    for (run_id, folder) in list_run_folders(root)? {
        let dir = folder.join(tables_dir.as_ref());
        if !dir.is_dir() {
            continue;
        }

        let mut files: Vec<_> = fs::read_dir(&dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "tmdl"))
            .collect();
        files.sort();

        for path in files {
            entries.push(TableFileEntry {
                result_folder: run_id.to_string(),
                tmdl_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                tmdl_path: path.display().to_string(),
            });
        }
    }

    Ok(entries)
}
