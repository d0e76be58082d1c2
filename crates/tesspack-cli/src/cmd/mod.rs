//! Command modules - one file per CLI command

pub mod convert;
pub mod find_libraries;
pub mod recipe;
pub mod upload_order;
