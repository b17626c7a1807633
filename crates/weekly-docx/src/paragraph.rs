//! Builders for synthesized paragraphs.
//!
//! A [`ParagraphSpec`] is rendered into WordprocessingML events using the namespace prefix
//! of the document it is inserted into.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// One text run with an optional explicit bold flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    /// `None` inherits from the paragraph style.
    pub bold: Option<bool>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: Some(false),
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: Some(true),
        }
    }

    /// Run without any run properties.
    pub fn inherit(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: None,
        }
    }
}

/// Paragraph to insert: style id, left indent, and runs.
///
/// Runs with empty text are skipped, so a spec without runs (or with only empty runs)
/// produces a blank spacer paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphSpec {
    /// Resolved style id (not the display name). `None` leaves the document default.
    pub style_id: Option<String>,
    /// Left indent in twentieths of a point.
    pub left_indent_twips: Option<i32>,
    pub runs: Vec<Run>,
}

impl ParagraphSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single run without explicit formatting.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().run(Run::inherit(text))
    }

    pub fn style_id(mut self, style_id: Option<String>) -> Self {
        self.style_id = style_id;
        self
    }

    pub fn left_indent(mut self, twips: Option<i32>) -> Self {
        self.left_indent_twips = twips;
        self
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn runs(mut self, runs: impl IntoIterator<Item = Run>) -> Self {
        self.runs.extend(runs);
        self
    }

    pub(crate) fn to_events(&self, prefix: &str) -> Vec<Event<'static>> {
        let p = qualified(prefix, "p");
        let mut events = vec![Event::Start(BytesStart::new(p.clone()))];

        if self.style_id.is_some() || self.left_indent_twips.is_some() {
            let ppr = qualified(prefix, "pPr");
            events.push(Event::Start(BytesStart::new(ppr.clone())));
            if let Some(style_id) = &self.style_id {
                let mut style = BytesStart::new(qualified(prefix, "pStyle"));
                style.push_attribute((qualified(prefix, "val").as_str(), style_id.as_str()));
                events.push(Event::Empty(style));
            }
            if let Some(twips) = self.left_indent_twips {
                let mut ind = BytesStart::new(qualified(prefix, "ind"));
                ind.push_attribute((qualified(prefix, "left").as_str(), twips.to_string().as_str()));
                events.push(Event::Empty(ind));
            }
            events.push(Event::End(BytesEnd::new(ppr)));
        }

        for run in self.runs.iter().filter(|r| !r.text.is_empty()) {
            events.extend(run_events(prefix, &run.text, &bold_properties(prefix, run.bold)));
        }

        events.push(Event::End(BytesEnd::new(p)));
        events
    }
}

/// `prefix:local`, or bare `local` for a default-namespace document.
pub(crate) fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

fn bold_properties(prefix: &str, bold: Option<bool>) -> Vec<Event<'static>> {
    let Some(bold) = bold else {
        return Vec::new();
    };
    let rpr = qualified(prefix, "rPr");
    let mut b = BytesStart::new(qualified(prefix, "b"));
    if !bold {
        b.push_attribute((qualified(prefix, "val").as_str(), "0"));
    }
    vec![
        Event::Start(BytesStart::new(rpr.clone())),
        Event::Empty(b),
        Event::End(BytesEnd::new(rpr)),
    ]
}

/// A `w:r` carrying `properties` (an `rPr` element, possibly empty) and `text`.
/// Tabs and line breaks become `w:tab` and `w:br`.
pub(crate) fn run_events(
    prefix: &str,
    text: &str,
    properties: &[Event<'static>],
) -> Vec<Event<'static>> {
    let r = qualified(prefix, "r");
    let mut events = vec![Event::Start(BytesStart::new(r.clone()))];
    events.extend(properties.iter().cloned());

    let mut segment = String::new();
    for ch in text.chars() {
        let control = match ch {
            '\t' => "tab",
            '\n' => "br",
            _ => {
                segment.push(ch);
                continue;
            }
        };
        push_text(prefix, &mut segment, &mut events);
        events.push(Event::Empty(BytesStart::new(qualified(prefix, control))));
    }
    push_text(prefix, &mut segment, &mut events);

    events.push(Event::End(BytesEnd::new(r)));
    events
}

fn push_text(prefix: &str, segment: &mut String, events: &mut Vec<Event<'static>>) {
    if segment.is_empty() {
        return;
    }
    let t = qualified(prefix, "t");
    let mut start = BytesStart::new(t.clone());
    start.push_attribute(("xml:space", "preserve"));
    events.push(Event::Start(start));
    events.push(Event::Text(BytesText::new(segment.as_str()).into_owned()));
    events.push(Event::End(BytesEnd::new(t)));
    segment.clear();
}
