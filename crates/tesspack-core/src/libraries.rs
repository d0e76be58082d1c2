//! Runtime library discovery
//!
//! Finds the native libraries a wheel build has to bundle: first the
//! libraries named on the command line, matched by file name, then
//! everything they import, followed through the binaries' import tables.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use goblin::Object;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("No libraries found in {search_paths:?} which match \"{stem}\" stem")]
    NotFound {
        stem: String,
        search_paths: Vec<PathBuf>,
    },

    #[error("Multiple libraries found which match \"{stem}\" stem: {candidates:?}")]
    Ambiguous {
        stem: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Invalid library pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// File name pattern for a library stem.
///
/// Accepts an optional `lib` prefix and a version either dash separated
/// (`tesseract-5.3.dll`) or glued to the stem (`tesseract53.dll`).
///
/// # Errors
///
/// Returns an error if the resulting regex cannot be compiled.
pub fn library_pattern(stem: &str, extension: &str) -> Result<Regex, LibraryError> {
    let pattern = format!(
        r"^(?:lib)?{}(?:-(?:[0-9]+\.)*|[0-9]+\.|\.){}$",
        regex::escape(stem),
        regex::escape(extension)
    );
    Ok(Regex::new(&pattern)?)
}

/// Locate exactly one library per stem across `search_paths`.
///
/// Search paths are scanned without recursion. Missing ones are skipped
/// with a warning. The result follows the order of `stems`.
///
/// # Errors
///
/// Returns [`LibraryError::NotFound`] if a stem matches nothing and
/// [`LibraryError::Ambiguous`] if it matches more than one file.
pub fn find_libraries(
    stems: &[String],
    search_paths: &[PathBuf],
    extension: &str,
) -> Result<Vec<PathBuf>, LibraryError> {
    let mut libraries = Vec::with_capacity(stems.len());

    for stem in stems {
        let pattern = library_pattern(stem, extension)?;
        let mut candidates = Vec::new();

        for search_path in search_paths {
            let Ok(entries) = fs::read_dir(search_path) else {
                tracing::warn!("The path {} does not exist", search_path.display());
                continue;
            };

            let mut matches: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .filter(|entry| pattern.is_match(&entry.file_name().to_string_lossy()))
                .map(|entry| entry.path())
                .collect();
            matches.sort();
            candidates.extend(matches);
        }

        match candidates.len() {
            0 => {
                return Err(LibraryError::NotFound {
                    stem: stem.clone(),
                    search_paths: search_paths.to_vec(),
                });
            }
            1 => {
                let library = candidates.remove(0);
                tracing::debug!("Found {} for '{stem}'", library.display());
                libraries.push(library);
            }
            _ => {
                return Err(LibraryError::Ambiguous {
                    stem: stem.clone(),
                    candidates,
                });
            }
        }
    }

    Ok(libraries)
}

/// Collect every library `binary` depends on, directly or transitively,
/// that can be found in `search_paths`.
///
/// Imported names are resolved against the search paths in order, first
/// hit wins. Names found nowhere are system libraries and are left out.
/// The binary itself is never part of the result.
pub fn find_dependencies(binary: &Path, search_paths: &[PathBuf]) -> BTreeSet<PathBuf> {
    let mut found = BTreeSet::new();
    let mut visited = BTreeSet::from([binary.to_path_buf()]);
    let mut pending = vec![binary.to_path_buf()];

    while let Some(current) = pending.pop() {
        for name in imported_libraries(&current) {
            let Some(resolved) = resolve(&name, search_paths) else {
                tracing::trace!("{name} not found in search paths");
                continue;
            };
            if visited.insert(resolved.clone()) {
                found.insert(resolved.clone());
                pending.push(resolved);
            }
        }
    }

    found
}

fn resolve(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    search_paths
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Library names from the import table of a PE or ELF binary.
fn imported_libraries(path: &Path) -> Vec<String> {
    let buffer = match fs::read(path) {
        Ok(buffer) => buffer,
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}", path.display());
            return Vec::new();
        }
    };

    match Object::parse(&buffer) {
        Ok(Object::PE(pe)) => pe.libraries.iter().map(|s| (*s).to_string()).collect(),
        Ok(Object::Elf(elf)) => elf.libraries.iter().map(|s| (*s).to_string()).collect(),
        Ok(_) => {
            tracing::warn!("Unsupported binary format: {}", path.display());
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Failed to parse {}: {e}", path.display());
            Vec::new()
        }
    }
}
