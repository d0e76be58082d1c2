//! Find-libraries command

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use tesspack_core::libraries;

/// Print the located libraries followed by everything they depend on,
/// joined by `;`.
pub fn find_libraries(stems: &[String], search_paths: &[PathBuf], extension: &str) -> Result<()> {
    let found = libraries::find_libraries(stems, search_paths, extension)?;

    let mut dependencies = BTreeSet::new();
    for library in &found {
        dependencies.extend(libraries::find_dependencies(library, search_paths));
    }

    let paths: Vec<String> = found
        .iter()
        .chain(dependencies.iter().filter(|dep| !found.contains(dep)))
        .map(|path| path.display().to_string())
        .collect();

    println!("{}", paths.join(";"));
    Ok(())
}
