use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use walkdir::WalkDir;

use super::error::ClassifyError;

pub fn is_directory(path: &Path) -> Result<bool, ClassifyError> {
    fs::metadata(path)
        .map(|meta| meta.is_dir())
        .map_err(|source| ClassifyError::Stat {
            path: path.to_path_buf(),
            source,
        })
}

/// True when the file is named `*.json` and its whole content is valid JSON.
pub fn is_valid_json_file(path: &Path) -> bool {
    if path.extension().map_or(true, |ext| ext != "json") {
        return false;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("reading {}: {}", path.display(), err);
            return false;
        }
    };

    match serde_json::from_slice::<serde::de::IgnoredAny>(&bytes) {
        Ok(_) => true,
        Err(err) => {
            debug!("{} is not valid JSON: {}", path.display(), err);
            false
        }
    }
}

/// Resolves `path` into the list of files to POST.
///
/// Directories are listed one level deep, sorted by file name. A failure to
/// list the directory is returned as an error; everything else only narrows
/// the result.
pub fn collect(path: &Path) -> Result<Vec<PathBuf>, ClassifyError> {
    let directory = match is_directory(path) {
        Ok(directory) => directory,
        Err(err) => {
            warn!("{}", err);
            return Ok(Vec::new());
        }
    };

    if !directory {
        if is_valid_json_file(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        warn!("File {} is not a valid JSON file.", path.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ClassifyError::ListDir {
            path: path.to_path_buf(),
            source,
        })?;

        let candidate = entry.path();
        if !entry.file_type().is_file() && !candidate.is_file() {
            continue;
        }
        if is_valid_json_file(candidate) {
            files.push(candidate.to_path_buf());
        } else {
            debug!("skipping {}", candidate.display());
        }
    }

    debug!("{} file(s) selected from {}", files.len(), path.display());
    Ok(files)
}
