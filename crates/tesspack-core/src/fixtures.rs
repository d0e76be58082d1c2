//! In-test wheel fixtures.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds a small wheel archive on disk.
pub(crate) struct WheelBuilder {
    filename: String,
    entries: Vec<(String, Vec<u8>)>,
}

impl WheelBuilder {
    pub(crate) fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push((name.to_string(), content.to_vec()));
        self
    }

    /// Add `<name>-<version>.dist-info/METADATA` derived from the filename.
    pub(crate) fn metadata(self, content: &str) -> Self {
        let mut parts = self.filename.split('-');
        let name = parts.next().unwrap_or("pkg").to_string();
        let version = parts.next().unwrap_or("0").to_string();
        self.file(
            &format!("{name}-{version}.dist-info/METADATA"),
            content.as_bytes(),
        )
    }

    pub(crate) fn write_to(self, dir: &Path) -> PathBuf {
        let path = dir.join(&self.filename);
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();

        for (name, content) in &self.entries {
            writer.start_file(name.as_str(), options).unwrap();
            writer.write_all(content).unwrap();
        }

        writer.finish().unwrap();
        path
    }
}
