//! Body-level view of `word/document.xml`.
//!
//! The body is split into blocks: one per top-level element (paragraph, table, section
//! properties, ...) plus any loose text between them. Blocks keep their original XML
//! events untouched, so everything the generator does not edit is written back exactly.
//! Paragraph blocks get a [`ParagraphId`] that stays valid across insertions and
//! removals of other paragraphs.

use crate::error::{DocxError, DocxResult};
use crate::paragraph::{run_events, ParagraphSpec};
use quick_xml::events::{BytesEnd, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::ops::Range;

/// WordprocessingML main namespace.
pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Handle to a body-level paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParagraphId(u64);

impl ParagraphId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Paragraph,
    Other,
}

#[derive(Debug, Clone)]
struct Block {
    id: u64,
    kind: BlockKind,
    events: Vec<Event<'static>>,
}

#[derive(Debug, Clone)]
pub struct WordDocument {
    /// Namespace prefix bound to [`WORDML_NS`]; empty for a default namespace.
    prefix: String,
    /// Everything up to and including `<w:body>`.
    head: Vec<Event<'static>>,
    blocks: Vec<Block>,
    /// `</w:body>` and everything after it.
    tail: Vec<Event<'static>>,
    next_id: u64,
}

#[derive(Clone, Copy)]
enum Section {
    Prolog,
    Body,
    Epilog,
}

impl WordDocument {
    pub fn from_bytes(bytes: &[u8]) -> DocxResult<Self> {
        let xml = std::str::from_utf8(bytes).map_err(DocxError::xml)?;
        Self::parse(xml)
    }

    pub fn parse(xml: &str) -> DocxResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut doc = WordDocument {
            prefix: "w".to_string(),
            head: Vec::new(),
            blocks: Vec::new(),
            tail: Vec::new(),
            next_id: 0,
        };
        let mut section = Section::Prolog;
        let mut seen_root = false;
        let mut current: Option<Block> = None;
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(DocxError::xml)?.into_owned();
            if let Event::Eof = event {
                break;
            }
            match section {
                Section::Prolog => {
                    match &event {
                        Event::Start(e) if !seen_root => {
                            seen_root = true;
                            if let Some(prefix) = wordml_prefix(e) {
                                doc.prefix = prefix;
                            }
                        }
                        Event::Start(e) if doc.is_w(e.name(), "body") => section = Section::Body,
                        Event::Empty(e) if seen_root && doc.is_w(e.name(), "body") => {
                            // `<w:body/>`: expand so paragraphs can be inserted.
                            let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                            doc.head.push(Event::Start(e.clone()));
                            doc.tail.push(Event::End(BytesEnd::new(name)));
                            section = Section::Epilog;
                            continue;
                        }
                        _ => {}
                    }
                    doc.head.push(event);
                }
                Section::Body => match current.as_mut() {
                    Some(block) => {
                        match &event {
                            Event::Start(_) => depth += 1,
                            Event::End(_) => depth -= 1,
                            _ => {}
                        }
                        block.events.push(event);
                        if depth == 0 {
                            if let Some(block) = current.take() {
                                doc.blocks.push(block);
                            }
                        }
                    }
                    None => match &event {
                        Event::End(_) => {
                            doc.tail.push(event);
                            section = Section::Epilog;
                        }
                        Event::Start(e) => {
                            let kind = doc.kind_of(e.name());
                            current = Some(doc.new_block(kind, vec![event]));
                            depth = 1;
                        }
                        Event::Empty(e) => {
                            let kind = doc.kind_of(e.name());
                            let block = doc.new_block(kind, vec![event]);
                            doc.blocks.push(block);
                        }
                        _ => {
                            let block = doc.new_block(BlockKind::Other, vec![event]);
                            doc.blocks.push(block);
                        }
                    },
                },
                Section::Epilog => doc.tail.push(event),
            }
        }

        match section {
            Section::Epilog => Ok(doc),
            Section::Prolog => Err(DocxError::MalformedTemplate(
                "document has no body".to_string(),
            )),
            Section::Body => Err(DocxError::MalformedTemplate(
                "document body is not closed".to_string(),
            )),
        }
    }

    pub fn to_xml(&self) -> DocxResult<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        let events = self
            .head
            .iter()
            .chain(self.blocks.iter().flat_map(|b| b.events.iter()))
            .chain(self.tail.iter());
        for event in events {
            writer.write_event(event.clone()).map_err(DocxError::xml)?;
        }
        Ok(writer.into_inner())
    }

    /// Body-level paragraphs in document order.
    pub fn paragraphs(&self) -> Vec<ParagraphId> {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Paragraph)
            .map(|b| ParagraphId(b.id))
            .collect()
    }

    /// Paragraphs strictly after `id`, in document order.
    pub fn paragraphs_after(&self, id: ParagraphId) -> DocxResult<Vec<ParagraphId>> {
        let index = self.index_of(id)?;
        Ok(self.blocks[index + 1..]
            .iter()
            .filter(|b| b.kind == BlockKind::Paragraph)
            .map(|b| ParagraphId(b.id))
            .collect())
    }

    /// Visible text of a paragraph: run text, tabs and breaks, including runs inside
    /// hyperlinks. Field codes, deleted text, and drawings contribute nothing.
    pub fn text(&self, id: ParagraphId) -> DocxResult<String> {
        let index = self.index_of(id)?;
        self.paragraph_text(&self.blocks[index].events)
    }

    /// Text of every body paragraph, in order.
    pub fn texts(&self) -> DocxResult<Vec<String>> {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Paragraph)
            .map(|b| self.paragraph_text(&b.events))
            .collect()
    }

    /// First paragraph whose trimmed text equals `text` trimmed.
    pub fn find_paragraph(&self, text: &str) -> DocxResult<Option<ParagraphId>> {
        self.find_first(|candidate| candidate.trim() == text.trim())
    }

    /// First paragraph whose text satisfies `predicate`.
    pub fn find_first(
        &self,
        mut predicate: impl FnMut(&str) -> bool,
    ) -> DocxResult<Option<ParagraphId>> {
        for block in self.blocks.iter().filter(|b| b.kind == BlockKind::Paragraph) {
            if predicate(&self.paragraph_text(&block.events)?) {
                return Ok(Some(ParagraphId(block.id)));
            }
        }
        Ok(None)
    }

    /// Insert a new paragraph as the next sibling of `anchor`.
    pub fn insert_after(
        &mut self,
        anchor: ParagraphId,
        spec: &ParagraphSpec,
    ) -> DocxResult<ParagraphId> {
        let index = self.index_of(anchor)?;
        let block = self.new_block(BlockKind::Paragraph, spec.to_events(&self.prefix));
        let id = ParagraphId(block.id);
        self.blocks.insert(index + 1, block);
        Ok(id)
    }

    pub fn remove(&mut self, id: ParagraphId) -> DocxResult<()> {
        let index = self.index_of(id)?;
        self.blocks.remove(index);
        Ok(())
    }

    /// Replace a paragraph's content with a single run holding `text`.
    ///
    /// Paragraph properties are kept, and the new run takes the run properties of the
    /// paragraph's first run so the line keeps its template formatting.
    pub fn replace_text(&mut self, id: ParagraphId, text: &str) -> DocxResult<()> {
        let index = self.index_of(id)?;
        let events = &self.blocks[index].events;

        let (start, end) = match events.first() {
            Some(Event::Start(e)) => {
                let end = match events.last() {
                    Some(Event::End(end)) => end.clone(),
                    _ => return Err(DocxError::MalformedTemplate("unclosed paragraph".into())),
                };
                (e.clone(), end)
            }
            Some(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                (e.clone(), BytesEnd::new(name))
            }
            _ => return Err(DocxError::StaleParagraph(id.0)),
        };

        let mut properties: Option<Vec<Event<'static>>> = None;
        let mut run_properties: Option<Vec<Event<'static>>> = None;
        for span in child_elements(events) {
            let child = &events[span];
            let name = match child.first() {
                Some(Event::Start(e)) | Some(Event::Empty(e)) => e.name(),
                _ => continue,
            };
            if self.is_w(name, "pPr") && properties.is_none() {
                properties = Some(child.to_vec());
            } else if self.is_w(name, "r") && run_properties.is_none() {
                run_properties = Some(self.first_child(child, "rPr").unwrap_or_default());
            }
        }

        let mut rebuilt = vec![Event::Start(start)];
        rebuilt.extend(properties.unwrap_or_default());
        if !text.is_empty() {
            rebuilt.extend(run_events(
                &self.prefix,
                text,
                &run_properties.unwrap_or_default(),
            ));
        }
        rebuilt.push(Event::End(end));
        self.blocks[index].events = rebuilt;
        Ok(())
    }

    /// Whether the body still holds a non-paragraph element named `local`
    /// (`tbl`, `sectPr`, ...).
    pub fn contains_element(&self, local: &str) -> bool {
        self.blocks.iter().any(|b| {
            b.kind == BlockKind::Other
                && match b.events.first() {
                    Some(Event::Start(e)) | Some(Event::Empty(e)) => self.is_w(e.name(), local),
                    _ => false,
                }
        })
    }

    fn new_block(&mut self, kind: BlockKind, events: Vec<Event<'static>>) -> Block {
        let id = self.next_id;
        self.next_id += 1;
        Block { id, kind, events }
    }

    fn index_of(&self, id: ParagraphId) -> DocxResult<usize> {
        self.blocks
            .iter()
            .position(|b| b.kind == BlockKind::Paragraph && b.id == id.0)
            .ok_or(DocxError::StaleParagraph(id.0))
    }

    fn kind_of(&self, name: QName<'_>) -> BlockKind {
        if self.is_w(name, "p") {
            BlockKind::Paragraph
        } else {
            BlockKind::Other
        }
    }

    fn in_namespace(&self, name: QName<'_>) -> bool {
        match name.prefix() {
            Some(prefix) => prefix.as_ref() == self.prefix.as_bytes(),
            None => self.prefix.is_empty(),
        }
    }

    fn is_w(&self, name: QName<'_>, local: &str) -> bool {
        self.in_namespace(name) && name.local_name().as_ref() == local.as_bytes()
    }

    /// Events of the first direct child named `local` of the element spanning `events`.
    fn first_child(&self, events: &[Event<'static>], local: &str) -> Option<Vec<Event<'static>>> {
        child_elements(events).into_iter().find_map(|span| {
            let child = &events[span];
            match child.first() {
                Some(Event::Start(e)) | Some(Event::Empty(e)) if self.is_w(e.name(), local) => {
                    Some(child.to_vec())
                }
                _ => None,
            }
        })
    }

    fn tag(&self, name: QName<'_>) -> Tag {
        if !self.in_namespace(name) {
            return Tag::Foreign;
        }
        match name.local_name().as_ref() {
            b"p" => Tag::Paragraph,
            b"hyperlink" => Tag::Hyperlink,
            b"r" => Tag::Run,
            b"t" => Tag::Text,
            b"tab" => Tag::Tab,
            b"br" | b"cr" => Tag::Break,
            _ => Tag::Other,
        }
    }

    fn paragraph_text(&self, events: &[Event<'static>]) -> DocxResult<String> {
        let mut path: Vec<Tag> = Vec::new();
        let mut text = String::new();
        for event in events {
            match event {
                Event::Start(e) => path.push(self.tag(e.name())),
                Event::End(_) => {
                    path.pop();
                }
                Event::Empty(e) if in_run(&path) => match self.tag(e.name()) {
                    Tag::Tab => text.push('\t'),
                    Tag::Break => text.push('\n'),
                    _ => {}
                },
                Event::Text(t) if in_text(&path) => {
                    text.push_str(&t.unescape().map_err(DocxError::xml)?);
                }
                Event::CData(c) if in_text(&path) => {
                    text.push_str(&String::from_utf8_lossy(c));
                }
                _ => {}
            }
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Paragraph,
    Hyperlink,
    Run,
    Text,
    Tab,
    Break,
    Other,
    Foreign,
}

fn in_run(path: &[Tag]) -> bool {
    matches!(
        path,
        [Tag::Paragraph, Tag::Run] | [Tag::Paragraph, Tag::Hyperlink, Tag::Run]
    )
}

fn in_text(path: &[Tag]) -> bool {
    matches!(
        path,
        [Tag::Paragraph, Tag::Run, Tag::Text]
            | [Tag::Paragraph, Tag::Hyperlink, Tag::Run, Tag::Text]
    )
}

/// Spans of the direct child elements of the element whose events are `events`
/// (first event is its start, last its end). Text between children is skipped.
pub(crate) fn child_elements(events: &[Event<'_>]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    if events.len() < 2 {
        return spans;
    }
    let inner_end = events.len() - 1;
    let mut depth = 0usize;
    let mut open = 0usize;
    for (i, event) in events.iter().enumerate().take(inner_end).skip(1) {
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    open = i;
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    spans.push(open..i + 1);
                }
            }
            Event::Empty(_) if depth == 0 => spans.push(i..i + 1),
            _ => {}
        }
    }
    spans
}

/// Prefix bound to the WordprocessingML namespace on `root`, if declared.
fn wordml_prefix(root: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    root.attributes().with_checks(false).flatten().find_map(|attr| {
        if attr.value.as_ref() != WORDML_NS.as_bytes() {
            return None;
        }
        let key = attr.key.as_ref();
        if key == b"xmlns" {
            Some(String::new())
        } else {
            key.strip_prefix(b"xmlns:")
                .map(|p| String::from_utf8_lossy(p).into_owned())
        }
    })
}
