//! conda archive writer
//!
//! Packs a staging tree into `.tar.bz2`. The archive is streamed into a
//! temporary file next to its destination and renamed into place only
//! once complete, so readers never observe a partial package.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use bzip2::Compression;
use bzip2::write::BzEncoder;

use crate::error::{ConvertError, IoResultExt};

/// Archive every top-level entry of `staging_root` into
/// `<output_dir>/<archive_name>`.
///
/// `output_dir` is created if it does not exist.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or the
/// archive cannot be written or moved into place. On error nothing is
/// left at the destination path.
pub fn write_archive(
    staging_root: &Path,
    output_dir: &Path,
    archive_name: &str,
) -> Result<PathBuf, ConvertError> {
    fs::create_dir_all(output_dir).at(output_dir)?;
    let final_path = output_dir.join(archive_name);

    let temp = tempfile::Builder::new()
        .prefix(".tesspack-")
        .suffix(".partial")
        .tempfile_in(output_dir)
        .at(output_dir)?;

    bundle_directory(staging_root, temp.as_file()).at(&final_path)?;
    temp.as_file().sync_all().at(&final_path)?;

    // NamedTempFile is created 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .at(&final_path)?;
    }

    temp.persist(&final_path)
        .map_err(|e| ConvertError::io(&final_path, e.error))?;

    tracing::info!("Wrote {}", final_path.display());
    Ok(final_path)
}

/// Stream a tar.bz2 of the staging tree into `file`.
///
/// Bytes are stored verbatim; symlinks are kept as links.
fn bundle_directory(staging_root: &Path, file: &File) -> io::Result<()> {
    let writer = BufWriter::new(file);
    let encoder = BzEncoder::new(writer, Compression::best());
    let mut tar_builder = tar::Builder::new(encoder);
    tar_builder.follow_symlinks(false);

    for entry in fs::read_dir(staging_root)? {
        let entry = entry?;
        let name = entry.file_name();

        if entry.file_type()?.is_dir() {
            tar_builder.append_dir_all(&name, entry.path())?;
        } else {
            tar_builder.append_path_with_name(entry.path(), &name)?;
        }
    }

    let mut writer = tar_builder.into_inner()?.finish()?;
    writer.flush()
}
