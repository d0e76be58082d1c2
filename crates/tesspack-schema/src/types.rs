//! Wheel identity and the conda `info/` documents.

use serde::{Deserialize, Serialize};

use crate::hash::Sha256Digest;

/// Identity of a wheel, parsed from its filename.
///
/// A wheel filename has exactly five dash-separated segments:
/// `{name}-{version}-{interpreter_tag}-{abi_tag}-{platform_tag}.whl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelIdentity {
    /// Distribution name (e.g. "tesserocr")
    pub package_name: String,

    /// Version string (e.g. "2.5.2")
    pub version: String,

    /// Interpreter tag with its two-letter implementation prefix removed
    /// (`cp310` -> `310`)
    pub interpreter_version: String,

    /// ABI tag (e.g. "cp310")
    pub abi_tag: String,

    /// Platform tag (e.g. "`win_amd64`")
    pub platform_tag: String,
}

impl WheelIdentity {
    /// Filename of the conda archive produced for this wheel,
    /// e.g. `py310-win_amd64.tar.bz2`.
    pub fn archive_name(&self) -> String {
        format!(
            "py{}-{}.tar.bz2",
            self.interpreter_version, self.platform_tag
        )
    }

    /// conda build string, e.g. `py310_tesseract_4.1.1_0`.
    pub fn build_string(
        &self,
        dependency_name: &str,
        dependency_version: &str,
        build_number: u32,
    ) -> String {
        format!(
            "py{}_{dependency_name}_{dependency_version}_{build_number}",
            self.interpreter_version
        )
    }
}

/// The `info/index.json` document of a conda package.
///
/// Field order matches the order conda itself writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Target CPU architecture, or `noarch`.
    pub arch: String,
    /// Build string embedding interpreter and dependency versions.
    pub build: String,
    /// Build counter.
    pub build_number: u32,
    /// Runtime dependency constraints.
    pub depends: Vec<String>,
    /// License identifier.
    pub license: String,
    /// Package name.
    pub name: String,
    /// Target operating system; omitted for `noarch` packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Channel subdirectory, or `noarch`.
    pub subdir: String,
    /// Creation time in milliseconds since the UNIX epoch.
    pub timestamp: i64,
    /// Package version.
    pub version: String,
}

impl PackageManifest {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The `info/about.json` document: descriptive fields lifted from the
/// wheel's `METADATA` file. Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AboutInfo {
    /// Project home page URL (`Home-page:`).
    pub home: String,
    /// License identifier (`License:`).
    pub license: String,
    /// One-line summary (`Summary:`).
    pub summary: String,
}

impl AboutInfo {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One staged file: its archive-relative path, digest and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileManifestEntry {
    /// Archive-relative path with `/` separators.
    #[serde(rename = "_path")]
    pub path: String,
    /// SHA-256 of the staged bytes.
    pub sha256: Sha256Digest,
    /// Size of the staged file in bytes.
    pub size_in_bytes: u64,
}
