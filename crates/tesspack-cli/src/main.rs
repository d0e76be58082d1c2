//! tesspack - conda packaging tools for the tesserocr wheels

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tesspack_cli::cmd;
use tesspack_core::ConvertConfig;
use tesspack_core::config::DEFAULT_DEPENDENCY_NAME;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tesspack")]
#[command(author, version, about = "tesspack - conda packaging for tesserocr wheels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the commands that stamp a conda build string.
#[derive(Args)]
struct BuildArgs {
    /// Native dependency named in the build string
    #[arg(long, env = "TESSPACK_DEPENDENCY_NAME", default_value = DEFAULT_DEPENDENCY_NAME)]
    dependency_name: String,
    /// conda build number
    #[arg(long, env = "TESSPACK_BUILD_NUMBER", default_value_t = 0)]
    build_number: u32,
    /// License to record instead of the wheel's own
    #[arg(long, env = "TESSPACK_LICENSE")]
    license: Option<String>,
}

impl BuildArgs {
    fn into_config(self, staging_root: Option<PathBuf>) -> ConvertConfig {
        ConvertConfig {
            dependency_name: self.dependency_name,
            build_number: self.build_number,
            license: self.license,
            staging_root,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a wheel into a conda .tar.bz2 package
    Convert {
        /// Wheel to convert
        wheel_path: PathBuf,
        /// Version of the native dependency, embedded in the build string
        dependency_version: String,
        /// Directory receiving the archive (created if missing)
        output_directory: PathBuf,
        #[command(flatten)]
        build: BuildArgs,
        /// Parent directory for the temporary staging tree
        #[arg(long, env = "TESSPACK_STAGING_DIR")]
        staging_dir: Option<PathBuf>,
    },
    /// Locate runtime libraries and their dependencies
    FindLibraries {
        /// Library base names to search for (e.g. tesseract)
        #[arg(short, long = "libraries", required = true, num_args = 1..)]
        libraries: Vec<String>,
        /// Directories to search within
        #[arg(short, long = "search-paths", required = true, num_args = 1..)]
        search_paths: Vec<PathBuf>,
        /// File extension to match
        #[arg(short, long, default_value = "dll")]
        extension: String,
    },
    /// Write a conda-build recipe (meta.yaml, bld.bat) for a wheel
    Recipe {
        /// Wheel the recipe installs
        wheel_path: PathBuf,
        /// Version of the native dependency, embedded in the build string
        dependency_version: String,
        /// Directory receiving the recipe (created if missing)
        output_directory: PathBuf,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Print built packages in upload order
    UploadOrder {
        /// Directory holding one subdirectory per conda platform
        packages_root: PathBuf,
        /// Platform subdirectories to visit, in order (default: win-32 win-64)
        #[arg(long = "subdir")]
        subdirs: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Logs on stderr, results on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            wheel_path,
            dependency_version,
            output_directory,
            build,
            staging_dir,
        } => cmd::convert::convert(
            &wheel_path,
            &dependency_version,
            &output_directory,
            &build.into_config(staging_dir),
        ),
        Commands::FindLibraries {
            libraries,
            search_paths,
            extension,
        } => cmd::find_libraries::find_libraries(&libraries, &search_paths, &extension),
        Commands::Recipe {
            wheel_path,
            dependency_version,
            output_directory,
            build,
        } => cmd::recipe::recipe(
            &wheel_path,
            &dependency_version,
            &output_directory,
            &build.into_config(None),
        ),
        Commands::UploadOrder {
            packages_root,
            subdirs,
        } => cmd::upload_order::upload_order(&packages_root, &subdirs),
    }
}
