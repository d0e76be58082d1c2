//! Core library for tesspack.
//!
//! The centerpiece is [`convert::convert_wheel`], which re-packages a
//! built wheel as a conda `.tar.bz2`. The remaining modules cover the
//! other CI steps around the OCR binding: locating the native runtime
//! libraries, writing a conda-build recipe and ordering packages for
//! upload.

pub mod archive;
pub mod config;
pub mod convert;
pub mod error;
pub mod libraries;
pub mod manifest;
pub mod metadata;
pub mod recipe;
pub mod staging;
pub mod upload;
pub mod wheel;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::ConvertConfig;
pub use convert::{ConvertOutcome, convert_wheel};
pub use error::ConvertError;
pub use libraries::LibraryError;
