use std::path::PathBuf;

/// Name of the native dependency embedded in build strings by default.
pub const DEFAULT_DEPENDENCY_NAME: &str = "tesseract";

/// Settings shared by the conversion and recipe commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Native dependency name used in the build string
    /// (`py310_<name>_<version>_0`).
    pub dependency_name: String,
    /// conda build number.
    pub build_number: u32,
    /// License written to `index.json`. `None` takes the wheel's
    /// `License:` metadata.
    pub license: Option<String>,
    /// Parent directory for staging trees. `None` uses the system temp dir.
    pub staging_root: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            dependency_name: DEFAULT_DEPENDENCY_NAME.to_string(),
            build_number: 0,
            license: None,
            staging_root: None,
        }
    }
}
