//! Wheel to conda package conversion.
//!
//! A conversion is a straight pipeline over one scoped staging tree:
//!
//! 1. Parse the wheel identity from its filename.
//! 2. Extract the wheel into `Lib/site-packages`.
//! 3. Read `about.json` fields from the `*.dist-info/METADATA`, then drop
//!    the `*.dist-info` directories.
//! 4. Add an empty bytecode marker so uninstall removes the real one.
//! 5. Hash every staged file and write `info/files`, `info/index.json`
//!    and `info/about.json`.
//! 6. Archive the tree as `py<interp>-<platform>.tar.bz2`.
//!
//! Any failure aborts the whole conversion. The staging tree is removed
//! on every exit path and no partial archive is left at the destination.

use std::path::{Path, PathBuf};

use tesspack_schema::{AboutInfo, FileManifestEntry, PackageManifest, WheelIdentity};

use crate::archive::write_archive;
use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::manifest::{build_manifest, write_info_files};
use crate::metadata::extract_metadata_info;
use crate::staging::StagingArea;
use crate::wheel::{extract_wheel, identity_from_path};

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    /// Path of the written `.tar.bz2`.
    pub archive_path: PathBuf,
    /// Identity parsed from the wheel filename.
    pub identity: WheelIdentity,
    /// Contents of `info/index.json`.
    pub manifest: PackageManifest,
    /// Contents of `info/about.json`.
    pub about: AboutInfo,
    /// Every staged payload file, in `info/files` order.
    pub files: Vec<FileManifestEntry>,
}

/// Convert one wheel into a conda package in `output_dir`.
///
/// `dependency_version` is embedded verbatim in the build string.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedFilename`] for a bad wheel name,
/// [`ConvertError::MissingMetadataDirectory`] if the wheel carries no
/// `*.dist-info`, and I/O or archive errors for any filesystem failure.
pub fn convert_wheel(
    wheel_path: &Path,
    dependency_version: &str,
    output_dir: &Path,
    config: &ConvertConfig,
) -> Result<ConvertOutcome, ConvertError> {
    let identity = identity_from_path(wheel_path)?;
    tracing::debug!(
        "Converting {} {} (python {}, {})",
        identity.package_name,
        identity.version,
        identity.interpreter_version,
        identity.platform_tag
    );

    let staging = StagingArea::new(config.staging_root.as_deref())?;
    let site_packages = staging.site_packages();

    extract_wheel(wheel_path, &site_packages)?;

    let about = extract_metadata_info(&site_packages)?;
    let manifest = build_manifest(&identity, dependency_version, &about, config)?;

    staging.remove_dist_info()?;
    staging.create_bytecode_marker(&identity)?;

    let files = staging.collect_entries()?;
    for entry in &files {
        tracing::trace!("{} {} {}", entry.sha256, entry.size_in_bytes, entry.path);
    }

    write_info_files(&staging.info_dir(), &files, &manifest, &about)?;

    let archive_path = write_archive(staging.root(), output_dir, &identity.archive_name())?;
    staging.close()?;

    Ok(ConvertOutcome {
        archive_path,
        identity,
        manifest,
        about,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::WheelBuilder;
    use bzip2::read::BzDecoder;
    use std::collections::{BTreeMap, BTreeSet};
    use std::fs::{self, File};
    use std::io::Read;

    const METADATA: &str = "Metadata-Version: 2.1\nName: tesserocr\nVersion: 2.5.2\nSummary: Tesseract OCR wrapper\nHome-page: https://github.com/sirfz/tesserocr\nLicense: MIT\n";

    fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut archive = tar::Archive::new(BzDecoder::new(File::open(path).unwrap()));
        let mut files = BTreeMap::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            files.insert(name, content);
        }
        files
    }

    fn staging_config(root: &Path) -> ConvertConfig {
        ConvertConfig {
            staging_root: Some(root.to_path_buf()),
            ..ConvertConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_windows_wheel() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = WheelBuilder::new("tesserocr-2.5.2-cp310-cp310-win_amd64.whl")
            .file("tesserocr/__init__.py", b"0123456789")
            .metadata(METADATA)
            .write_to(dir.path());
        let out = dir.path().join("out");

        let outcome = convert_wheel(&wheel, "4.1.1", &out, &ConvertConfig::default()).unwrap();
        assert_eq!(outcome.archive_path, out.join("py310-win_amd64.tar.bz2"));

        let files = read_archive(&outcome.archive_path);

        let index: serde_json::Value = serde_json::from_slice(&files["info/index.json"]).unwrap();
        assert_eq!(index["build"], "py310_tesseract_4.1.1_0");
        assert_eq!(index["arch"], "x86_64");
        assert_eq!(index["subdir"], "win-64");
        assert_eq!(index["platform"], "win");
        assert_eq!(index["name"], "tesserocr");
        assert_eq!(index["version"], "2.5.2");
        assert_eq!(index["depends"][0], "python >= 3.10,<3.11.0a0");

        let about: serde_json::Value = serde_json::from_slice(&files["info/about.json"]).unwrap();
        assert_eq!(about["license"], "MIT");
        assert_eq!(about["home"], "https://github.com/sirfz/tesserocr");

        assert_eq!(
            files["Lib/site-packages/tesserocr/__init__.py"],
            b"0123456789"
        );
        assert!(files.contains_key("Lib/site-packages/tesserocr/__pycache__/__init__.cpython-310.pyc"));
        assert!(!files.keys().any(|name| name.contains(".dist-info")));

        let listed: BTreeSet<&str> = std::str::from_utf8(&files["info/files"])
            .unwrap()
            .lines()
            .collect();
        let expected: BTreeSet<&str> = [
            "Lib/site-packages/tesserocr/__init__.py",
            "Lib/site-packages/tesserocr/__pycache__/__init__.cpython-310.pyc",
        ]
        .into_iter()
        .collect();
        assert_eq!(listed, expected);

        let info_files: BTreeSet<&str> = files
            .keys()
            .filter_map(|name| name.strip_prefix("info/"))
            .collect();
        assert_eq!(
            info_files,
            ["about.json", "files", "index.json"].into_iter().collect()
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = WheelBuilder::new("tesserocr-2.5.2-cp39-cp39-win32.whl")
            .file("tesserocr/__init__.py", b"from ._tesserocr import *\n")
            .file("tesserocr/_tesserocr.pyd", &[0u8, 1, 2, 3, 255])
            .file("tesserocr/.keep", b"")
            .metadata(METADATA)
            .write_to(dir.path());

        let first = convert_wheel(&wheel, "5.3.0", &dir.path().join("a"), &ConvertConfig::default())
            .unwrap();
        let second = convert_wheel(&wheel, "5.3.0", &dir.path().join("b"), &ConvertConfig::default())
            .unwrap();

        let as_set = |files: &[FileManifestEntry]| files.iter().cloned().collect::<BTreeSet<_>>();
        assert_eq!(as_set(&first.files), as_set(&second.files));
        assert_eq!(first.files.len(), 4);

        let listed = |path: &Path| {
            let files = read_archive(path);
            String::from_utf8(files["info/files"].clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
        };
        assert_eq!(listed(&first.archive_path), listed(&second.archive_path));
    }

    #[test]
    fn test_missing_license_yields_empty_string() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = WheelBuilder::new("tesserocr-2.5.2-cp310-cp310-win_amd64.whl")
            .file("tesserocr/__init__.py", b"")
            .metadata("Name: tesserocr\nSummary: OCR\n")
            .write_to(dir.path());

        let outcome =
            convert_wheel(&wheel, "4.1.1", &dir.path().join("out"), &ConvertConfig::default())
                .unwrap();
        assert_eq!(outcome.about.license, "");

        let files = read_archive(&outcome.archive_path);
        let about: serde_json::Value = serde_json::from_slice(&files["info/about.json"]).unwrap();
        assert_eq!(about["license"], "");
    }

    #[test]
    fn test_unknown_platform_still_produces_archive() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = WheelBuilder::new("tesserocr-2.5.2-cp310-cp310-some_exotic_tag.whl")
            .file("tesserocr/__init__.py", b"")
            .metadata(METADATA)
            .write_to(dir.path());
        let out = dir.path().join("out");

        let outcome = convert_wheel(&wheel, "4.1.1", &out, &ConvertConfig::default()).unwrap();
        assert_eq!(
            outcome.archive_path,
            out.join("py310-some_exotic_tag.tar.bz2")
        );

        let files = read_archive(&outcome.archive_path);
        let index: serde_json::Value = serde_json::from_slice(&files["info/index.json"]).unwrap();
        assert_eq!(index["arch"], "noarch");
        assert_eq!(index["subdir"], "noarch");
    }

    #[test]
    fn test_staging_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let staging_root = dir.path().join("staging");
        let wheel = WheelBuilder::new("tesserocr-2.5.2-cp310-cp310-win_amd64.whl")
            .file("tesserocr/__init__.py", b"")
            .metadata(METADATA)
            .write_to(dir.path());

        convert_wheel(&wheel, "4.1.1", &dir.path().join("out"), &staging_config(&staging_root))
            .unwrap();

        assert_eq!(fs::read_dir(&staging_root).unwrap().count(), 0);
    }

    #[test]
    fn test_archive_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let staging_root = dir.path().join("staging");
        let out = dir.path().join("out");
        let wheel = WheelBuilder::new("tesserocr-2.5.2-cp310-cp310-win_amd64.whl")
            .file("tesserocr/__init__.py", b"0123456789")
            .metadata(METADATA)
            .write_to(dir.path());

        // Occupy the destination with a directory so the final rename fails.
        let target = out.join("py310-win_amd64.tar.bz2");
        fs::create_dir_all(target.join("occupied")).unwrap();

        let result = convert_wheel(&wheel, "4.1.1", &out, &staging_config(&staging_root));
        assert!(matches!(result, Err(ConvertError::Io { ref path, .. }) if *path == target));

        assert_eq!(fs::read_dir(&staging_root).unwrap().count(), 0);
        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_metadata_directory_fails_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let staging_root = dir.path().join("staging");
        let out = dir.path().join("out");
        let wheel = WheelBuilder::new("tesserocr-2.5.2-cp310-cp310-win_amd64.whl")
            .file("tesserocr/__init__.py", b"")
            .write_to(dir.path());

        let result = convert_wheel(&wheel, "4.1.1", &out, &staging_config(&staging_root));
        assert!(matches!(
            result,
            Err(ConvertError::MissingMetadataDirectory { .. })
        ));
        assert_eq!(fs::read_dir(&staging_root).unwrap().count(), 0);
        assert!(!out.exists());
    }

    #[test]
    fn test_malformed_filename_fails_before_staging() {
        let dir = tempfile::tempdir().unwrap();
        let staging_root = dir.path().join("staging");
        let wheel = WheelBuilder::new("tesserocr-2.5.2-win_amd64.whl")
            .file("tesserocr/__init__.py", b"")
            .write_to(dir.path());

        let result = convert_wheel(&wheel, "4.1.1", &dir.path().join("out"), &staging_config(&staging_root));
        assert!(matches!(result, Err(ConvertError::MalformedFilename { .. })));
        assert!(!staging_root.exists());
    }

    #[test]
    fn test_missing_wheel_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let wheel = dir.path().join("tesserocr-2.5.2-cp310-cp310-win_amd64.whl");

        let result = convert_wheel(&wheel, "4.1.1", &dir.path().join("out"), &ConvertConfig::default());
        assert!(matches!(result, Err(ConvertError::Io { .. })));
    }
}
