//! Paragraph style lookup from `word/styles.xml`.
//!
//! Section layouts name styles the way Word shows them ("List Paragraph", "Body Text");
//! paragraphs reference them by style id. Names compare case-insensitively, since Word
//! stores built-in names in lower case ("heading 3").

use crate::error::{DocxError, DocxResult};
use crate::package::{DocxPackage, STYLES_PART};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StyleEntry {
    id: String,
    is_default: bool,
}

/// How a style name resolves against the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleRef {
    /// The template's default paragraph style; no explicit reference needed.
    Default,
    Id(String),
    /// Not defined in the template.
    Missing,
}

#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    by_name: HashMap<String, StyleEntry>,
    by_id: HashMap<String, StyleEntry>,
}

impl StyleCatalog {
    /// Catalog of the package's styles part; empty when the part is absent.
    pub fn from_package(package: &DocxPackage) -> DocxResult<Self> {
        match package.part(STYLES_PART) {
            Some(bytes) => Self::parse(std::str::from_utf8(bytes).map_err(DocxError::xml)?),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(xml: &str) -> DocxResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut catalog = Self::default();
        let mut current: Option<(StyleEntry, Option<String>)> = None;

        loop {
            match reader.read_event().map_err(DocxError::xml)? {
                Event::Start(e) if e.local_name().as_ref() == b"style" => {
                    current = paragraph_style(&e)?.map(|entry| (entry, None));
                }
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"name" => {
                    if let Some((_, name)) = current.as_mut() {
                        *name = attribute(&e, b"val")?;
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"style" => {
                    if let Some((entry, name)) = current.take() {
                        catalog.insert(entry, name);
                    }
                }
                Event::Empty(e) if e.local_name().as_ref() == b"style" => {
                    if let Some(entry) = paragraph_style(&e)? {
                        catalog.insert(entry, None);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(catalog)
    }

    fn insert(&mut self, entry: StyleEntry, name: Option<String>) {
        if let Some(name) = name {
            self.by_name.insert(name.to_lowercase(), entry.clone());
        }
        self.by_id.insert(entry.id.to_lowercase(), entry);
    }

    /// Resolve a display name (falling back to a style id) to a reference.
    pub fn resolve(&self, name: &str) -> StyleRef {
        let key = name.to_lowercase();
        let entry = self
            .by_name
            .get(&key)
            .or_else(|| self.by_id.get(&key.replace(' ', "")));
        match entry {
            Some(entry) if entry.is_default => StyleRef::Default,
            Some(entry) => StyleRef::Id(entry.id.clone()),
            None => StyleRef::Missing,
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn paragraph_style(e: &BytesStart<'_>) -> DocxResult<Option<StyleEntry>> {
    if attribute(e, b"type")?.as_deref() != Some("paragraph") {
        return Ok(None);
    }
    let Some(id) = attribute(e, b"styleId")? else {
        return Ok(None);
    };
    let is_default = matches!(attribute(e, b"default")?.as_deref(), Some("1") | Some("true"));
    Ok(Some(StyleEntry { id, is_default }))
}

fn attribute(e: &BytesStart<'_>, local: &[u8]) -> DocxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(DocxError::xml)?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value().map_err(DocxError::xml)?.into_owned()));
        }
    }
    Ok(None)
}
