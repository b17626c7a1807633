//! Integration test: record + template on disk → generated report.

mod common;

use chrono::NaiveDate;
use common::{heading, line, standard_body, write_template, SAMPLE_LINES};
use weekly_core::{AiTask, ExecutionItem, FrictionItem, ReportRecord, SopItem};
use weekly_docx::{generate_report, render_with, DocxError, RenderOptions, ReportTemplate};

fn options() -> RenderOptions {
    RenderOptions {
        today: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        left_indent_inches: 0.25,
    }
}

fn basic_record() -> ReportRecord {
    ReportRecord {
        name: "A".to_string(),
        role: "B".to_string(),
        week: "2024-01-01 → 2024-01-05".to_string(),
        weekly_objective: "Shipped X".to_string(),
        execution_output: vec![ExecutionItem {
            summary: "S1".to_string(),
            content: "- b1\n- b2".to_string(),
        }],
        sop_items: vec![SopItem::default()],
        friction_blockers_ask: vec![FrictionItem::default()],
        ..Default::default()
    }
}

fn render_texts(record: &ReportRecord) -> Vec<String> {
    let dir = tempfile::tempdir().unwrap();
    let template = ReportTemplate::open(&write_template(dir.path(), &standard_body())).unwrap();
    let rendered = render_with(&template, record, &options()).unwrap();
    rendered.document().texts().unwrap()
}

/// Paragraph texts strictly between two headings.
fn region<'a>(texts: &'a [String], start: &str, stop: &str) -> &'a [String] {
    let from = texts.iter().position(|t| t == start).unwrap() + 1;
    let to = texts.iter().position(|t| t == stop).unwrap();
    &texts[from..to]
}

#[test]
fn end_to_end_report_matches_expected_layout() {
    common::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let template_path = write_template(dir.path(), &standard_body());
    let output_path = dir.path().join("out").join("report.docx");

    generate_report(&template_path, &basic_record(), &output_path, &options()).unwrap();

    let generated = ReportTemplate::open(&output_path).unwrap();
    let texts = generated.document().texts().unwrap();
    assert_eq!(
        texts,
        vec![
            "Name: A",
            "Role: B",
            "Week: 2024-01-01 → 2024-01-05",
            "Weekly Objective (One Sentence)",
            "Shipped X",
            "",
            "Execution & Output",
            "S1",
            "• b1",
            "• b2",
            "",
            "The \u{201c}2X\u{201d} Transformation Log",
            "AI Acceleration",
            "",
            "SOP & Process Solidification",
            "Item: None",
            "Impact: N/A",
            "",
            "Friction, Blockers & Ask",
            "",
            "Next Week\u{2019}s Focus (Preview Only)",
        ]
    );

    let xml = String::from_utf8(generated.document().to_xml().unwrap()).unwrap();
    assert!(xml.contains(
        r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">S1</w:t></w:r></w:p>"#
    ));
    assert!(generated.document().contains_element("tbl"));
    assert!(generated.document().contains_element("sectPr"));
    assert_eq!(generated.styles().len(), 5);
}

#[test]
fn three_execution_items_replace_all_samples() {
    let mut record = basic_record();
    record.execution_output = (1..=3)
        .map(|i| ExecutionItem {
            summary: format!("Summary {}", i),
            content: format!("Detail {}", i),
        })
        .collect();

    let texts = render_texts(&record);
    let execution = region(
        &texts,
        "Execution & Output",
        "The \u{201c}2X\u{201d} Transformation Log",
    );
    assert_eq!(
        execution,
        &[
            "Summary 1", "Detail 1", "", "Summary 2", "Detail 2", "", "Summary 3", "Detail 3", "",
        ]
    );
    for sample in SAMPLE_LINES {
        assert!(!texts.iter().any(|t| t == sample), "sample left behind: {}", sample);
    }
}

#[test]
fn empty_sop_renders_default_item() {
    let mut record = basic_record();
    record.sop_items = Vec::new();
    let texts = render_texts(&record);
    assert_eq!(
        region(&texts, "SOP & Process Solidification", "Friction, Blockers & Ask"),
        &["Item: None", "Impact: N/A", ""]
    );
}

#[test]
fn renamed_heading_fails_without_writing_output() {
    let dir = tempfile::tempdir().unwrap();
    let body: Vec<String> = standard_body()
        .into_iter()
        .map(|p| {
            if p == heading("Execution & Output") {
                heading("Execution")
            } else {
                p
            }
        })
        .collect();
    let template_path = write_template(dir.path(), &body);
    let output_path = dir.path().join("report.docx");

    let err =
        generate_report(&template_path, &basic_record(), &output_path, &options()).unwrap_err();
    assert!(matches!(err, DocxError::AnchorNotFound(ref h) if h == "Execution & Output"));
    assert!(!output_path.exists());
}

#[test]
fn missing_header_line_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let body: Vec<String> = standard_body()
        .into_iter()
        .filter(|p| *p != line("Role: "))
        .collect();
    let template = ReportTemplate::open(&write_template(dir.path(), &body)).unwrap();
    let err = render_with(&template, &basic_record(), &options()).unwrap_err();
    assert!(matches!(err, DocxError::AnchorNotFound(ref h) if h == "Role:"));
}

#[test]
fn empty_week_uses_the_monday_to_friday_range() {
    let mut record = basic_record();
    record.week = "  ".to_string();
    let texts = render_texts(&record);
    assert_eq!(texts[2], "Week: 2024-01-01 → 2024-01-05");
}

#[test]
fn ai_tasks_are_numbered_indented_and_styled() {
    let mut record = basic_record();
    record.ai_acceleration_tasks = vec![
        AiTask {
            task: "Generated tests".to_string(),
            tool_agent: "Cursor".to_string(),
            time_saved: "2h".to_string(),
            insight_failure: "Good coverage.\n- flaky on CI".to_string(),
        },
        AiTask {
            task: "Drafted SOP".to_string(),
            ..Default::default()
        },
    ];

    let dir = tempfile::tempdir().unwrap();
    let template = ReportTemplate::open(&write_template(dir.path(), &standard_body())).unwrap();
    let rendered = render_with(&template, &record, &options()).unwrap();
    let texts = rendered.document().texts().unwrap();

    assert_eq!(
        region(&texts, "AI Acceleration", "SOP & Process Solidification"),
        &[
            "Task 1: Generated tests",
            "Tool / Agent: Cursor",
            "Time Saved (Est.): 2h",
            "Insight / Limitation:",
            "Good coverage.",
            "• flaky on CI",
            "",
            "Task 2: Drafted SOP",
            "Tool / Agent: ",
            "Time Saved (Est.): ",
            "Insight / Limitation:",
            "N/A",
            "",
        ]
    );

    let xml = String::from_utf8(rendered.document().to_xml().unwrap()).unwrap();
    assert!(xml.contains(r#"<w:pStyle w:val="FirstParagraph"/><w:ind w:left="360"/>"#));
    assert!(xml.contains(r#"<w:pStyle w:val="BodyText"/><w:ind w:left="360"/>"#));
}

#[test]
fn friction_numbering_skips_blank_entries() {
    let mut record = basic_record();
    record.friction_blockers_ask = vec![
        FrictionItem::default(),
        FrictionItem {
            friction: "Staging quota".to_string(),
            ..Default::default()
        },
        FrictionItem {
            action_mitigation: "- asked infra\n- waiting".to_string(),
            ..Default::default()
        },
    ];

    let texts = render_texts(&record);
    assert_eq!(
        region(
            &texts,
            "Friction, Blockers & Ask",
            "Next Week\u{2019}s Focus (Preview Only)"
        ),
        &[
            "Friction 1: Staging quota",
            "Action/Mitigation: N/A",
            "Ask/Attention needed: N/A",
            "",
            "Friction 2: N/A",
            "Action/Mitigation:",
            "• asked infra",
            "• waiting",
            "Ask/Attention needed: N/A",
            "",
        ]
    );
}

#[test]
fn focus_replaces_everything_after_its_heading() {
    let mut record = basic_record();
    record.next_week_focus = vec!["Search rollout".to_string(), "Hiring loop".to_string()];
    let texts = render_texts(&record);
    let focus_at = texts
        .iter()
        .position(|t| t == "Next Week\u{2019}s Focus (Preview Only)")
        .unwrap();
    assert_eq!(
        &texts[focus_at + 1..],
        &["Focus 1: Search rollout", "Focus 2: Hiring loop"]
    );
}

#[test]
fn rendering_leaves_the_loaded_template_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let template = ReportTemplate::open(&write_template(dir.path(), &standard_body())).unwrap();
    let before = template.document().texts().unwrap();

    let first = render_with(&template, &basic_record(), &options()).unwrap();
    let second = render_with(&template, &basic_record(), &options()).unwrap();

    assert_eq!(template.document().texts().unwrap(), before);
    assert_eq!(
        first.document().to_xml().unwrap(),
        second.document().to_xml().unwrap()
    );
}

#[test]
fn straight_apostrophe_focus_heading_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let body: Vec<String> = standard_body()
        .into_iter()
        .map(|p| {
            if p == heading("Next Week\u{2019}s Focus (Preview Only)") {
                heading("Next Week's Focus (Preview Only) ")
            } else {
                p
            }
        })
        .collect();
    let template = ReportTemplate::open(&write_template(dir.path(), &body)).unwrap();
    let rendered = render_with(&template, &basic_record(), &options()).unwrap();
    let texts = rendered.document().texts().unwrap();
    assert_eq!(texts.last().unwrap(), "Next Week's Focus (Preview Only) ");
}

#[test]
fn summary_named_like_a_heading_does_not_move_the_section() {
    let mut record = basic_record();
    record.execution_output = vec![ExecutionItem {
        summary: "AI Acceleration".to_string(),
        content: "- rolled out copilots".to_string(),
    }];
    record.ai_acceleration_tasks = vec![AiTask {
        task: "Drafted tests".to_string(),
        ..Default::default()
    }];

    let texts = render_texts(&record);
    assert_eq!(
        region(
            &texts,
            "Execution & Output",
            "The \u{201c}2X\u{201d} Transformation Log"
        ),
        &["AI Acceleration", "• rolled out copilots", ""]
    );
    let log = texts
        .iter()
        .position(|t| t == "The \u{201c}2X\u{201d} Transformation Log")
        .unwrap();
    assert_eq!(texts[log + 1], "AI Acceleration");
    assert_eq!(texts[log + 2], "Task 1: Drafted tests");
}
