//! Recipe command

use std::path::Path;

use anyhow::{Context, Result};
use tesspack_core::ConvertConfig;
use tesspack_core::recipe::write_recipe;

/// Write a conda-build recipe for a wheel.
pub fn recipe(
    wheel: &Path,
    dependency_version: &str,
    output_dir: &Path,
    config: &ConvertConfig,
) -> Result<()> {
    let files = write_recipe(wheel, dependency_version, output_dir, config)
        .with_context(|| format!("Failed to write recipe for {}", wheel.display()))?;

    println!("{}", files.meta_yaml.display());
    println!("{}", files.build_script.display());
    Ok(())
}
