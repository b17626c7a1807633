//! A loaded report template: package, parsed body, and style catalog.

use crate::document::WordDocument;
use crate::error::{DocxError, DocxResult};
use crate::package::{DocxPackage, DOCUMENT_PART};
use crate::styles::StyleCatalog;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ReportTemplate {
    package: DocxPackage,
    document: WordDocument,
    styles: StyleCatalog,
}

impl ReportTemplate {
    /// Load a template from disk. The file itself is never written to.
    pub fn open(path: &Path) -> DocxResult<Self> {
        let template = Self::from_package(DocxPackage::open(path)?)?;
        info!(path = %path.display(), styles = template.styles.len(), "template loaded");
        Ok(template)
    }

    pub fn from_bytes(bytes: &[u8]) -> DocxResult<Self> {
        Self::from_package(DocxPackage::from_bytes(bytes)?)
    }

    pub fn from_package(package: DocxPackage) -> DocxResult<Self> {
        let body = package.part(DOCUMENT_PART).ok_or_else(|| {
            DocxError::MalformedTemplate(format!("package has no {}", DOCUMENT_PART))
        })?;
        let document = WordDocument::from_bytes(body)?;
        let styles = StyleCatalog::from_package(&package)?;
        Ok(Self {
            package,
            document,
            styles,
        })
    }

    pub fn document(&self) -> &WordDocument {
        &self.document
    }

    pub fn styles(&self) -> &StyleCatalog {
        &self.styles
    }

    /// Body and styles borrowed together, as the mutator needs them.
    pub(crate) fn parts_mut(&mut self) -> (&mut WordDocument, &StyleCatalog) {
        (&mut self.document, &self.styles)
    }

    /// Serialized package with the current body.
    pub fn to_bytes(&self) -> DocxResult<Vec<u8>> {
        let mut package = self.package.clone();
        package.set_part(DOCUMENT_PART, self.document.to_xml()?);
        package.to_bytes()
    }

    /// Write to `path`, creating parent directories. The document is written to a
    /// temporary file beside the target and renamed into place, so a failed save
    /// leaves no partial file behind.
    pub fn save(&self, path: &Path) -> DocxResult<()> {
        let bytes = self.to_bytes()?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), bytes = bytes.len(), "document saved");
        Ok(())
    }
}
