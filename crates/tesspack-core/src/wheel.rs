//! Wheel archive handling
//!
//! Parses the wheel identity out of its filename and unpacks the zip
//! payload into a staging tree.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tesspack_schema::{AboutInfo, DIST_INFO_SUFFIX, WheelIdentity};
use zip::ZipArchive;

use crate::error::{ConvertError, IoResultExt};
use crate::metadata;

/// Parse a wheel filename of the form
/// `{name}-{version}-{interpreter_tag}-{abi_tag}-{platform_tag}.whl`.
///
/// The interpreter version is the interpreter tag without its first two
/// characters (`cp310` -> `310`). Nothing else is validated.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedFilename`] unless the name splits into
/// exactly five dash-separated segments.
pub fn parse_wheel_filename(filename: &str) -> Result<WheelIdentity, ConvertError> {
    let stem = filename.strip_suffix(".whl").unwrap_or(filename);
    let parts: Vec<&str> = stem.split('-').collect();

    let [package_name, version, python_tag, abi_tag, platform_tag] = parts.as_slice() else {
        return Err(ConvertError::MalformedFilename {
            filename: filename.to_string(),
        });
    };

    Ok(WheelIdentity {
        package_name: (*package_name).to_string(),
        version: (*version).to_string(),
        interpreter_version: python_tag.chars().skip(2).collect(),
        abi_tag: (*abi_tag).to_string(),
        platform_tag: (*platform_tag).to_string(),
    })
}

/// Parse the identity of the wheel at `wheel_path` from its file name.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedFilename`] if the path has no file
/// name or the name is not a valid wheel filename.
pub fn identity_from_path(wheel_path: &Path) -> Result<WheelIdentity, ConvertError> {
    let filename = wheel_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ConvertError::MalformedFilename {
            filename: wheel_path.display().to_string(),
        })?;

    parse_wheel_filename(&filename)
}

fn open_wheel(wheel_path: &Path) -> Result<ZipArchive<File>, ConvertError> {
    let file = File::open(wheel_path).at(wheel_path)?;
    ZipArchive::new(file).map_err(|e| {
        ConvertError::Archive(format!("{}: {e}", wheel_path.display()))
    })
}

/// Extract every entry of a wheel into `dest_dir`.
///
/// Returns the extracted file paths relative to `dest_dir`. Entries whose
/// path would escape `dest_dir` abort the extraction.
///
/// # Errors
///
/// Returns an error if the wheel cannot be opened, is not a valid zip
/// archive, contains an unsafe path, or a file cannot be written.
pub fn extract_wheel(wheel_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut archive = open_wheel(wheel_path)?;

    fs::create_dir_all(dest_dir).at(dest_dir)?;
    let mut extracted_files = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| ConvertError::Archive(e.to_string()))?;

        // Sanitize path to prevent Zip Slip
        let Some(relative_path) = file.enclosed_name() else {
            return Err(ConvertError::Archive(format!(
                "Invalid path in archive: {}",
                file.name()
            )));
        };
        let relative_path = relative_path.to_path_buf();
        let absolute_path = dest_dir.join(&relative_path);

        if file.is_dir() {
            fs::create_dir_all(&absolute_path).at(&absolute_path)?;
            continue;
        }

        if let Some(parent) = absolute_path.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }

        let mut outfile = File::create(&absolute_path).at(&absolute_path)?;
        io::copy(&mut file, &mut outfile).at(&absolute_path)?;

        extracted_files.push(relative_path);
    }

    tracing::debug!(
        "Extracted {} files from {}",
        extracted_files.len(),
        wheel_path.display()
    );

    Ok(extracted_files)
}

/// Read the `METADATA` file straight out of a wheel without extracting it.
///
/// When several `*.dist-info` directories exist, the first by name wins.
///
/// # Errors
///
/// Returns [`ConvertError::MissingMetadataDirectory`] if the wheel has no
/// `*.dist-info/METADATA` entry, or an archive error if it cannot be read.
pub fn read_wheel_metadata(wheel_path: &Path) -> Result<AboutInfo, ConvertError> {
    let mut archive = open_wheel(wheel_path)?;

    let mut candidates: Vec<String> = archive
        .file_names()
        .filter(|name| {
            matches!(
                name.split_once('/'),
                Some((dir, rest)) if dir.ends_with(DIST_INFO_SUFFIX) && rest == metadata::METADATA_FILE
            )
        })
        .map(str::to_string)
        .collect();
    candidates.sort();

    let Some(name) = candidates.first() else {
        return Err(ConvertError::MissingMetadataDirectory {
            path: wheel_path.to_path_buf(),
        });
    };

    let mut content = String::new();
    archive
        .by_name(name)
        .map_err(|e| ConvertError::Archive(e.to_string()))?
        .read_to_string(&mut content)
        .at(wheel_path)?;

    Ok(metadata::parse_metadata(&content))
}
