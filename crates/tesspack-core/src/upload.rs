//! Upload ordering for built conda packages.
//!
//! Packages are uploaded one platform directory at a time, oldest
//! interpreter first, so `py36` always precedes `py310`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

/// Platform directories visited when none are given.
pub const DEFAULT_SUBDIRS: &[&str] = &["win-32", "win-64"];

/// Interpreter marker in a package file name.
pub const PY_VERSION_PATTERN: &str = r"py([0-9]+)\D";

/// Interpreter version embedded in a package file name as `(major, minor)`.
///
/// `tesserocr-2.5.2-py310_tesseract_4.1.1_0.tar.bz2` -> `(3, 10)`.
/// The first digit is the major version, the rest the minor version.
pub fn interpreter_sort_key(pattern: &Regex, file_name: &str) -> Option<(u32, u32)> {
    let digits = pattern.captures(file_name)?.get(1)?.as_str();
    let (major, minor) = digits.split_at(1);
    let major = major.parse().ok()?;
    let minor = if minor.is_empty() { 0 } else { minor.parse().ok()? };
    Some((major, minor))
}

/// List the packages under `root/<subdir>` for each subdir, in upload order.
///
/// Files without an interpreter marker are skipped with a warning.
///
/// # Errors
///
/// Returns an error if a subdirectory is missing or cannot be read.
pub fn upload_order(root: &Path, subdirs: &[String]) -> Result<Vec<PathBuf>> {
    let pattern = Regex::new(PY_VERSION_PATTERN)?;
    let mut ordered = Vec::new();

    for subdir in subdirs {
        let dir = root.join(subdir);
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read package directory {}", dir.display()))?;

        let mut packages = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            match interpreter_sort_key(&pattern, &name) {
                Some(key) => packages.push((key, name, entry.path())),
                None => tracing::warn!("Skipping {name}: no interpreter version in file name"),
            }
        }

        packages.sort();
        tracing::debug!("{} packages in {subdir}", packages.len());
        ordered.extend(packages.into_iter().map(|(_, _, path)| path));
    }

    Ok(ordered)
}
