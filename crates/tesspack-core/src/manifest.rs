//! Synthesis of the conda `info/` documents.

use std::fs;
use std::path::Path;

use tesspack_schema::{AboutInfo, CondaPlatform, FileManifestEntry, PackageManifest, WheelIdentity};

use crate::config::ConvertConfig;
use crate::error::{ConvertError, IoResultExt};

/// Runtime constraint pinning the interpreter minor version,
/// e.g. `310` -> `python >= 3.10,<3.11.0a0`.
///
/// The first digit is the major version, the rest the minor version.
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedInterpreterTag`] unless the version
/// is one digit followed by a numeric minor part.
pub fn python_constraint(interpreter_version: &str) -> Result<String, ConvertError> {
    let unsupported = || ConvertError::UnsupportedInterpreterTag {
        tag: interpreter_version.to_string(),
    };

    let mut chars = interpreter_version.chars();
    let major = chars.next().filter(char::is_ascii_digit).ok_or_else(unsupported)?;
    let minor = chars.as_str();

    if minor.is_empty() || !minor.chars().all(|c| c.is_ascii_digit()) {
        return Err(unsupported());
    }
    let next_minor = minor.parse::<u32>().map_err(|_| unsupported())? + 1;

    Ok(format!("python >= {major}.{minor},<{major}.{next_minor}.0a0"))
}

/// Build the `index.json` manifest for a converted wheel.
///
/// Unknown platform tags do not fail the conversion: the package is
/// described as `noarch` and a warning is logged.
///
/// # Errors
///
/// Returns an error if the interpreter version cannot be expressed as a
/// python version range.
pub fn build_manifest(
    identity: &WheelIdentity,
    dependency_version: &str,
    about: &AboutInfo,
    config: &ConvertConfig,
) -> Result<PackageManifest, ConvertError> {
    let target = CondaPlatform::lookup(&identity.platform_tag).unwrap_or_else(|| {
        tracing::warn!(
            "Unknown platform tag '{}', packaging as noarch",
            identity.platform_tag
        );
        CondaPlatform::noarch()
    });

    Ok(PackageManifest {
        arch: target.arch,
        build: identity.build_string(
            &config.dependency_name,
            dependency_version,
            config.build_number,
        ),
        build_number: config.build_number,
        depends: vec![python_constraint(&identity.interpreter_version)?],
        license: config
            .license
            .clone()
            .unwrap_or_else(|| about.license.clone()),
        name: identity.package_name.clone(),
        platform: target.platform,
        subdir: target.subdir,
        timestamp: chrono::Utc::now().timestamp_millis(),
        version: identity.version.clone(),
    })
}

/// Write `files`, `index.json` and `about.json` into `info_dir`.
///
/// `files` lists one path per line in the order of `entries`.
///
/// # Errors
///
/// Returns an error if the directory or any document cannot be written.
pub fn write_info_files(
    info_dir: &Path,
    entries: &[FileManifestEntry],
    manifest: &PackageManifest,
    about: &AboutInfo,
) -> Result<(), ConvertError> {
    fs::create_dir_all(info_dir).at(info_dir)?;

    let files: String = entries
        .iter()
        .map(|entry| format!("{}\n", entry.path))
        .collect();
    let files_path = info_dir.join("files");
    fs::write(&files_path, files).at(&files_path)?;

    let index_path = info_dir.join("index.json");
    fs::write(&index_path, manifest.to_json()?).at(&index_path)?;

    let about_path = info_dir.join("about.json");
    fs::write(&about_path, about.to_json()?).at(&about_path)?;

    Ok(())
}
