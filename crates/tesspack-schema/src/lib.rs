//! Shared types and wire format for tesspack.
//!
//! Everything in this crate is plain data: the identity parsed out of a
//! wheel filename, the conda `info/` documents and the platform lookup
//! table. All filesystem work lives in `tesspack-core`.

pub mod hash;
pub mod platform;
pub mod types;

// Re-exports
pub use hash::*;
pub use platform::*;
pub use types::*;

/// Staging-relative directory that receives the wheel payload.
pub const SITE_PACKAGES_DIR: &str = "Lib/site-packages";

/// Staging-relative directory holding the conda metadata documents.
pub const INFO_DIR: &str = "info";

/// Suffix of the wheel metadata directory (`<name>-<version>.dist-info`).
pub const DIST_INFO_SUFFIX: &str = ".dist-info";
