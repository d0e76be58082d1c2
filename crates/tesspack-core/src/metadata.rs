//! Wheel metadata extraction
//!
//! A wheel keeps its core metadata in `<name>-<version>.dist-info/METADATA`,
//! an RFC 822 style header block followed by the long description. Only
//! three headers matter for the conda `about.json`.

use std::fs;
use std::path::{Path, PathBuf};

use tesspack_schema::{AboutInfo, DIST_INFO_SUFFIX};

use crate::error::{ConvertError, IoResultExt};

/// File name of the core metadata inside a `*.dist-info` directory.
pub const METADATA_FILE: &str = "METADATA";

/// List the top-level `*.dist-info` directories under `site_packages`,
/// sorted by name.
///
/// # Errors
///
/// Returns an error if `site_packages` cannot be read.
pub fn find_dist_info_dirs(site_packages: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(site_packages).at(site_packages)? {
        let entry = entry.at(site_packages)?;
        let is_dir = entry.file_type().at(&entry.path())?.is_dir();
        if is_dir && entry.file_name().to_string_lossy().ends_with(DIST_INFO_SUFFIX) {
            dirs.push(entry.path());
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Read home page, license and summary from the staged wheel metadata.
///
/// If several `*.dist-info` directories exist the first by name is used.
///
/// # Errors
///
/// Returns [`ConvertError::MissingMetadataDirectory`] if no `*.dist-info`
/// directory exists, or an I/O error if its `METADATA` cannot be read.
pub fn extract_metadata_info(site_packages: &Path) -> Result<AboutInfo, ConvertError> {
    let dirs = find_dist_info_dirs(site_packages)?;

    let Some(dist_info) = dirs.first() else {
        return Err(ConvertError::MissingMetadataDirectory {
            path: site_packages.to_path_buf(),
        });
    };

    if dirs.len() > 1 {
        tracing::debug!(
            "Found {} .dist-info directories, using {}",
            dirs.len(),
            dist_info.display()
        );
    }

    let metadata_path = dist_info.join(METADATA_FILE);
    let content = fs::read_to_string(&metadata_path).at(&metadata_path)?;

    Ok(parse_metadata(&content))
}

/// Parse the `Home-page`, `License` and `Summary` headers.
///
/// The value is everything after the first `": "` of the line, trimmed.
/// Parsing stops at the empty line that ends the header block, so the
/// long description can never shadow a header. Indented lines are folded
/// continuations of the previous header and never start a new one.
/// Missing headers stay empty.
pub fn parse_metadata(content: &str) -> AboutInfo {
    let mut about = AboutInfo::default();

    for line in content.lines() {
        if line.trim_end_matches('\r').is_empty() {
            break;
        }

        let value = || {
            line.split_once(": ")
                .map_or("", |(_, v)| v)
                .trim()
                .to_string()
        };

        if line.starts_with("Home-page:") {
            about.home = value();
        } else if line.starts_with("License:") {
            about.license = value();
        } else if line.starts_with("Summary:") {
            about.summary = value();
        }
    }

    about
}
