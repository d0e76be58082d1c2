//! conda-build recipe generation
//!
//! An alternative to [`crate::convert`]: instead of packaging the wheel
//! directly, write a minimal recipe that lets `conda build` install it
//! with pip.

use std::fs;
use std::path::{Path, PathBuf};

use tesspack_schema::{AboutInfo, WheelIdentity};

use crate::config::ConvertConfig;
use crate::error::{ConvertError, IoResultExt};
use crate::wheel::{identity_from_path, read_wheel_metadata};

/// Recipe metadata file name.
pub const META_YAML: &str = "meta.yaml";
/// Windows build script file name.
pub const BUILD_SCRIPT: &str = "bld.bat";

/// Paths of a written recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFiles {
    /// Written `meta.yaml`.
    pub meta_yaml: PathBuf,
    /// Written `bld.bat`.
    pub build_script: PathBuf,
}

/// Write `meta.yaml` and `bld.bat` for `wheel_path` into `output_dir`.
///
/// The `about` section is taken from the wheel's own `METADATA`.
///
/// # Errors
///
/// Returns an error if the wheel name is malformed, the wheel has no
/// metadata, or the files cannot be written.
pub fn write_recipe(
    wheel_path: &Path,
    dependency_version: &str,
    output_dir: &Path,
    config: &ConvertConfig,
) -> Result<RecipeFiles, ConvertError> {
    let identity = identity_from_path(wheel_path)?;
    let about = read_wheel_metadata(wheel_path)?;

    fs::create_dir_all(output_dir).at(output_dir)?;

    let meta_yaml = output_dir.join(META_YAML);
    let content = render_meta_yaml(&identity, dependency_version, &about, config);
    fs::write(&meta_yaml, content).at(&meta_yaml)?;

    let build_script = output_dir.join(BUILD_SCRIPT);
    fs::write(&build_script, render_build_script(wheel_path)).at(&build_script)?;

    tracing::info!("Wrote recipe to {}", output_dir.display());
    Ok(RecipeFiles {
        meta_yaml,
        build_script,
    })
}

/// Render `meta.yaml`.
///
/// Free-form `about` values are emitted as quoted scalars so that colons
/// or leading symbols in a summary cannot break the YAML.
pub fn render_meta_yaml(
    identity: &WheelIdentity,
    dependency_version: &str,
    about: &AboutInfo,
    config: &ConvertConfig,
) -> String {
    let build = identity.build_string(
        &config.dependency_name,
        dependency_version,
        config.build_number,
    );
    let license = config.license.as_deref().unwrap_or(&about.license);

    format!(
        "package:
  name: {name}
  version: {version}
build:
  number: {number}
  string: {build}
requirements:
  build:
    - python
  run:
    - python
about:
  home: {home}
  license: {license}
  summary: {summary}
",
        name = identity.package_name,
        version = identity.version,
        number = config.build_number,
        home = quoted(&about.home),
        license = quoted(license),
        summary = quoted(&about.summary),
    )
}

/// Render `bld.bat`.
pub fn render_build_script(wheel_path: &Path) -> String {
    format!("pip install \"{}\"\n", wheel_path.display())
}

// JSON strings are valid double-quoted YAML scalars.
fn quoted(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
