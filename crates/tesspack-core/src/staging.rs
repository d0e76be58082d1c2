//! Disposable staging tree for one conversion
//!
//! The staging root mirrors the top level of the conda archive:
//! the wheel payload goes to `Lib/site-packages`, the synthesized
//! metadata to `info/`. The whole tree lives in a [`tempfile::TempDir`]
//! and disappears when the [`StagingArea`] is dropped, whichever way the
//! conversion ends.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tesspack_schema::{FileManifestEntry, INFO_DIR, SITE_PACKAGES_DIR, Sha256Digest, WheelIdentity};

use crate::error::{ConvertError, IoResultExt};
use crate::metadata;

const STAGING_PREFIX: &str = "tesspack-stage-";

/// A scoped staging directory.
#[derive(Debug)]
pub struct StagingArea {
    temp_dir: tempfile::TempDir,
}

impl StagingArea {
    /// Create a fresh staging tree with an empty `Lib/site-packages`.
    ///
    /// With `parent` set the tree is created inside it (the parent is
    /// created if needed), otherwise in the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new(parent: Option<&Path>) -> Result<Self, ConvertError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);

        let temp_dir = match parent {
            Some(parent) => {
                fs::create_dir_all(parent).at(parent)?;
                builder.tempdir_in(parent).at(parent)?
            }
            None => builder.tempdir().at(&std::env::temp_dir())?,
        };

        let staging = Self { temp_dir };
        let site_packages = staging.site_packages();
        fs::create_dir_all(&site_packages).at(&site_packages)?;

        tracing::debug!("Staging in {}", staging.root().display());
        Ok(staging)
    }

    /// Access the root path
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `<root>/Lib/site-packages`
    pub fn site_packages(&self) -> PathBuf {
        self.root().join(SITE_PACKAGES_DIR)
    }

    /// `<root>/info`
    pub fn info_dir(&self) -> PathBuf {
        self.root().join(INFO_DIR)
    }

    /// Delete every top-level `*.dist-info` directory from the payload.
    ///
    /// Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed or removed.
    pub fn remove_dist_info(&self) -> Result<usize, ConvertError> {
        let dirs = metadata::find_dist_info_dirs(&self.site_packages())?;
        for dir in &dirs {
            fs::remove_dir_all(dir).at(dir)?;
        }
        Ok(dirs.len())
    }

    /// Create the empty `__init__.cpython-<interp>.pyc` marker under
    /// `<name>/__pycache__`.
    ///
    /// The marker gets listed in `info/files`, so conda removes the real
    /// bytecode the interpreter writes there on uninstall.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be created.
    pub fn create_bytecode_marker(&self, identity: &WheelIdentity) -> Result<PathBuf, ConvertError> {
        let pycache = self
            .site_packages()
            .join(&identity.package_name)
            .join("__pycache__");
        fs::create_dir_all(&pycache).at(&pycache)?;

        let marker = pycache.join(format!(
            "__init__.cpython-{}.pyc",
            identity.interpreter_version
        ));
        File::options()
            .create(true)
            .append(true)
            .open(&marker)
            .at(&marker)?;

        Ok(marker)
    }

    /// Walk the payload and describe every regular file.
    ///
    /// Paths are relative to the staging root with `/` separators, in
    /// directory walk order. Nothing is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk fails or a file cannot be hashed.
    pub fn collect_entries(&self) -> Result<Vec<FileManifestEntry>, ConvertError> {
        let root = self.root();
        let mut entries = Vec::new();

        for entry in walkdir::WalkDir::new(self.site_packages()) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };

            entries.push(FileManifestEntry {
                path: to_posix(relative),
                sha256: Sha256Digest::compute_file(path).at(path)?,
                size_in_bytes: entry.metadata()?.len(),
            });
        }

        tracing::debug!("Staged {} files", entries.len());
        Ok(entries)
    }

    /// Remove the staging tree now, reporting failures.
    ///
    /// Dropping the area also removes it, but silently.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be deleted.
    pub fn close(self) -> Result<(), ConvertError> {
        let root = self.root().to_path_buf();
        self.temp_dir.close().at(&root)
    }
}

fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
