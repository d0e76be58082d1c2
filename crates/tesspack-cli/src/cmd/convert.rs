//! Convert command

use std::path::Path;

use anyhow::{Context, Result};
use tesspack_core::{ConvertConfig, convert_wheel};

/// Convert a wheel and print the path of the written archive.
pub fn convert(
    wheel: &Path,
    dependency_version: &str,
    output_dir: &Path,
    config: &ConvertConfig,
) -> Result<()> {
    let outcome = convert_wheel(wheel, dependency_version, output_dir, config)
        .with_context(|| format!("Failed to convert {}", wheel.display()))?;

    tracing::debug!(
        "{} {} -> {} ({} files)",
        outcome.manifest.name,
        outcome.manifest.build,
        outcome.manifest.subdir,
        outcome.files.len()
    );
    println!("{}", outcome.archive_path.display());
    Ok(())
}
