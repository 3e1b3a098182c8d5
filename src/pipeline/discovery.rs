use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::PipelineError;

/// Resolves the input location to a sorted list of track files. A file is
/// taken as-is; a directory contributes every file whose name ends in `suffix`.
pub fn discover_inputs(path: &Path, suffix: &str) -> Result<Vec<PathBuf>, PipelineError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        return Err(PipelineError::InputNotFound(path.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();

        if !entry_path.is_file() {
            continue;
        }

        let matches = entry_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(suffix))
            .unwrap_or(false);
        if matches {
            files.push(entry_path);
        } else {
            log::debug!("Ignoring {}", entry_path.display());
        }
    }

    if files.is_empty() {
        return Err(PipelineError::NoInput {
            dir: path.display().to_string(),
            suffix: suffix.to_string(),
        });
    }

    files.sort();
    Ok(files)
}
