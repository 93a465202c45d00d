//! Input path expansion.
//!
//! An input argument may be:
//!
//! - **a file** -- read as is;
//! - **a directory** -- every regular file directly inside it, skipping
//!   names that start with `.` or `_` (marker and checksum files), in name
//!   order;
//! - **a glob pattern** -- `logs/*.txt`, `data/**/part-*`; matches are files
//!   only, in sorted order.
//!
//! Sorting makes the line order, and therefore the output of
//! order-sensitive reducers, reproducible across runs.

use crate::error::{PipelineError, PipelineResult};
use anyhow::Context;
use glob::glob;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files matching `pattern`, sorted. Directories that match are dropped.
///
/// Zero matches is not an error here; see [`expand_inputs`].
pub fn expand_glob(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob(pattern).with_context(|| format!("invalid glob pattern {pattern:?}"))? {
        let path = entry.with_context(|| format!("cannot read a match of {pattern:?}"))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// List the data files directly inside `dir`, sorted by name.
pub fn list_dir_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn looks_like_pattern(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Resolve every input argument to concrete files, preserving argument
/// order.
///
/// # Errors
///
/// - [`PipelineError::Configuration`] when `inputs` is empty or a pattern is
///   invalid.
/// - [`PipelineError::SourceUnavailable`] when an argument names nothing,
///   a directory cannot be listed, or a pattern matches no files.
pub fn expand_inputs<S: AsRef<str>>(inputs: &[S]) -> PipelineResult<Vec<PathBuf>> {
    if inputs.is_empty() {
        return Err(PipelineError::config("no input paths given"));
    }

    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            let listed = list_dir_files(path).map_err(|source| PipelineError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
            files.extend(listed);
        } else if looks_like_pattern(input) {
            let matched = expand_glob(input).map_err(|e| PipelineError::config(format!("{e:#}")))?;
            if matched.is_empty() {
                return Err(PipelineError::SourceUnavailable {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "pattern matched no files"),
                });
            }
            files.extend(matched);
        } else {
            return Err(PipelineError::SourceUnavailable {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            });
        }
    }
    Ok(files)
}
