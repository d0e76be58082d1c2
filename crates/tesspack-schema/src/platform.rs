//! Mapping from wheel platform tags to conda platform fields.
//!
//! conda describes a binary package with three related fields: the CPU
//! architecture (`arch`), the channel subdirectory the package is published
//! under (`subdir`) and the operating system family (`platform`). Wheels
//! carry all of that in a single platform tag such as `win_amd64`.

/// Architecture and subdir used for platform tags missing from the table.
pub const NOARCH: &str = "noarch";

/// Fixed lookup table: `(platform tag, arch, subdir, platform)`.
const PLATFORM_TABLE: &[(&str, &str, &str, &str)] = &[
    ("win_amd64", "x86_64", "win-64", "win"),
    ("win32", "x86", "win-32", "win"),
    ("win_arm64", "arm64", "win-arm64", "win"),
];

/// conda platform fields derived from a wheel platform tag.
///
/// # Example
///
/// ```
/// use tesspack_schema::CondaPlatform;
///
/// let target = CondaPlatform::lookup("win_amd64").unwrap_or_else(CondaPlatform::noarch);
/// assert_eq!(target.arch, "x86_64");
/// assert_eq!(target.subdir, "win-64");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondaPlatform {
    /// CPU architecture (`x86_64`, `x86`, ...).
    pub arch: String,
    /// Channel subdirectory (`win-64`, `win-32`, ...).
    pub subdir: String,
    /// Operating system family, absent for `noarch` packages.
    pub platform: Option<String>,
}

impl CondaPlatform {
    /// Look up the conda fields for a wheel platform tag.
    ///
    /// Only the part before the first `.` is considered, so compressed tag
    /// sets resolve by their leading tag. Returns `None` for unknown tags.
    pub fn lookup(platform_tag: &str) -> Option<Self> {
        let key = platform_tag.split('.').next().unwrap_or(platform_tag);

        PLATFORM_TABLE
            .iter()
            .find(|(tag, ..)| *tag == key)
            .map(|(_, arch, subdir, platform)| Self {
                arch: (*arch).to_string(),
                subdir: (*subdir).to_string(),
                platform: Some((*platform).to_string()),
            })
    }

    /// Sentinel used when the platform tag is not in the table.
    pub fn noarch() -> Self {
        Self {
            arch: NOARCH.to_string(),
            subdir: NOARCH.to_string(),
            platform: None,
        }
    }
}
