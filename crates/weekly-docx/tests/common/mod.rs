//! Shared fixture: a minimal report template built in memory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use weekly_docx::package::package_from_parts;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"</Types>"#
);

const RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="BodyText"><w:name w:val="Body Text"/></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="FirstParagraph"><w:name w:val="First Paragraph"/></w:style>"#,
    r#"</w:styles>"#
);

/// Sample lines the template ships with under each heading.
pub const SAMPLE_LINES: &[&str] = &[
    "Sample objective sentence.",
    "Sample execution item",
    "• sample bullet",
    "Task 1: sample task",
    "Item: sample SOP",
    "Friction 1: sample friction",
    "Focus 1: sample focus",
    "Trailing template note",
];

pub fn heading(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading3"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        escape(text)
    )
}

pub fn line(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape(text)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

/// Body paragraphs of the standard template, headings spelled as Word saves them.
pub fn standard_body() -> Vec<String> {
    vec![
        line("Name: "),
        line("Role: "),
        line("Week: "),
        heading("Weekly Objective (One Sentence)"),
        line(SAMPLE_LINES[0]),
        heading("Execution & Output"),
        line(SAMPLE_LINES[1]),
        line(SAMPLE_LINES[2]),
        heading("The \u{201c}2X\u{201d} Transformation Log"),
        heading("AI Acceleration"),
        line(SAMPLE_LINES[3]),
        heading("SOP & Process Solidification"),
        line(SAMPLE_LINES[4]),
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>table cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#
            .to_string(),
        heading("Friction, Blockers & Ask"),
        line(SAMPLE_LINES[5]),
        heading("Next Week\u{2019}s Focus (Preview Only)"),
        line(SAMPLE_LINES[6]),
        line(SAMPLE_LINES[7]),
    ]
}

pub fn document_xml(body: &[String]) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#
        ),
        body.concat()
    )
}

pub fn template_bytes(body: &[String]) -> Vec<u8> {
    let document = document_xml(body);
    package_from_parts([
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", RELS.as_bytes()),
        ("word/document.xml", document.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
    ])
    .expect("fixture parts")
    .to_bytes()
    .expect("fixture zip")
}

/// Write the template into `dir` and return its path.
pub fn write_template(dir: &Path, body: &[String]) -> PathBuf {
    let path = dir.join("Weekly_Report_Template.docx");
    std::fs::write(&path, template_bytes(body)).expect("write template");
    path
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
