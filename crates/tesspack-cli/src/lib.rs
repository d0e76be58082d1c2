//! tesspack - conda packaging tools for the tesserocr wheels
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Each subcommand of the `tesspack` binary is a thin wrapper in [`cmd`]
//! around `tesspack-core`: argument plumbing, diagnostics and printing
//! results to stdout. Logs go to stderr so the output can be captured by
//! CI scripts.

pub mod cmd;
