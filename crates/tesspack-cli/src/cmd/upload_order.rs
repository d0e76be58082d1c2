//! Upload-order command

use std::path::Path;

use anyhow::Result;
use tesspack_core::upload::{DEFAULT_SUBDIRS, upload_order as plan};

/// Print the packages under `root` in upload order, one per line.
pub fn upload_order(root: &Path, subdirs: &[String]) -> Result<()> {
    let subdirs: Vec<String> = if subdirs.is_empty() {
        DEFAULT_SUBDIRS.iter().map(|s| (*s).to_string()).collect()
    } else {
        subdirs.to_vec()
    };

    for package in plan(root, &subdirs)? {
        println!("{}", package.display());
    }
    Ok(())
}
