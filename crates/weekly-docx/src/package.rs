//! Office package: the zip container around `word/document.xml` and friends.
//!
//! Every part is kept in memory in its original order and compression, so parts the
//! generator never touches (media, headers, numbering, settings) are written back as-is.

use crate::error::{DocxError, DocxResult};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Style definitions part.
pub const STYLES_PART: &str = "word/styles.xml";

#[derive(Debug, Clone)]
struct PackagePart {
    name: String,
    compression: CompressionMethod,
    is_dir: bool,
    data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    parts: Vec<PackagePart>,
}

impl DocxPackage {
    /// Read a package from disk. The file is only read, never modified.
    pub fn open(path: &Path) -> DocxResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> DocxResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push(PackagePart {
                name: file.name().to_string(),
                compression: file.compression(),
                is_dir: file.is_dir(),
                data,
            });
        }
        debug!(parts = parts.len(), "package read");
        Ok(Self { parts })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Replace a part's content, or append a new deflated part.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(PackagePart {
                name: name.to_string(),
                compression: CompressionMethod::Deflated,
                is_dir: false,
                data,
            }),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    pub fn to_bytes(&self) -> DocxResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        for part in &self.parts {
            let options = FileOptions::default().compression_method(writable(part.compression));
            if part.is_dir {
                zip.add_directory(part.name.as_str(), options)?;
                continue;
            }
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }
        zip.finish()?;
        drop(zip);
        Ok(buffer)
    }
}

/// Stored parts stay stored; anything else is rewritten deflated.
fn writable(method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    }
}

/// Build a package from `(name, content)` pairs. Used by tests and fixtures.
pub fn package_from_parts<'a>(
    parts: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> DocxResult<DocxPackage> {
    let mut package = DocxPackage::default();
    for (name, data) in parts {
        if name.is_empty() {
            return Err(DocxError::MalformedTemplate("empty part name".to_string()));
        }
        package.set_part(name, data.to_vec());
    }
    Ok(package)
}
