//! Integration tests for PDF export.

use lopdf::content::Content;
use lopdf::{Document, Object};
use wsjf_core::{
    Backlog, BacklogEvent, ExportError, InitiativeDraft, ReportExporter, ReportLayout,
    ReportOptions, ScoreSet, WeightField, WeightSet,
};

fn backlog_with(count: usize) -> Backlog {
    let mut backlog = Backlog::new(WeightSet::default());
    for i in 0..count {
        let score = (i % 10 + 1) as f64;
        backlog
            .add(InitiativeDraft::new(
                format!("Initiative {i}"),
                ScoreSet::new(score, 5.0, 5.0, 5.0),
                ((i % 20) + 1) as f64,
            ))
            .unwrap();
    }
    backlog
}

/// Every string drawn with `Tj`, page by page.
fn drawn_strings(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let raw = doc.get_page_content(*page_id).unwrap();
            let content = Content::decode(&raw).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_export_writes_ranked_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    let mut backlog = backlog_with(2);
    let exporter = ReportExporter::default();

    let outcome = backlog.export(&exporter, &path).unwrap();
    assert_eq!(outcome.layout, ReportLayout::Table);
    assert_eq!(outcome.initiatives, 2);
    assert_eq!(outcome.pages, 1);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), outcome.bytes);
    let pages = drawn_strings(&bytes);
    let first = &pages[0];
    assert!(first.iter().any(|s| s == "Weighted Shortest Job First (WSJF) Prioritization Report"));
    assert!(first.iter().any(|s| s.starts_with("Generated: ")));
    assert!(first.iter().any(|s| s.contains("(CR/SLA) Weight: 1")));
    assert!(first.iter().any(|s| s == "Page 1 of 1"));

    let events = backlog.drain_events();
    assert!(matches!(events.last(), Some(BacklogEvent::ReportExported { initiatives: 2, .. })));
}

#[test]
fn test_export_rows_follow_rank_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    let mut backlog = Backlog::new(WeightSet::default());
    backlog
        .add(InitiativeDraft::new("Slow", ScoreSet::new(5.0, 5.0, 5.0, 5.0), 5.0))
        .unwrap();
    backlog
        .add(InitiativeDraft::new("Quick win", ScoreSet::new(10.0, 10.0, 10.0, 10.0), 1.0))
        .unwrap();

    backlog.export(&ReportExporter::default(), &path).unwrap();
    let strings: Vec<String> = drawn_strings(&std::fs::read(&path).unwrap()).concat();
    let quick = strings.iter().position(|s| s == "Quick win").unwrap();
    let slow = strings.iter().position(|s| s == "Slow").unwrap();
    assert!(quick < slow);
    assert!(strings.iter().any(|s| s == "80.00"));
    assert!(strings.iter().any(|s| s == "8.00"));
}

#[test]
fn test_large_backlog_spans_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    let mut backlog = backlog_with(150);

    let outcome = backlog.export(&ReportExporter::default(), &path).unwrap();
    assert!(outcome.pages > 1);

    let pages = drawn_strings(&std::fs::read(&path).unwrap());
    assert_eq!(pages.len(), outcome.pages);
    for (index, page) in pages.iter().enumerate() {
        assert!(page.iter().any(|s| s == "Rank"), "page {} lacks table header", index + 1);
        let footer = format!("Page {} of {}", index + 1, outcome.pages);
        assert!(page.contains(&footer));
    }
}

#[test]
fn test_export_falls_back_to_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    let mut backlog = backlog_with(3);
    let exporter = ReportExporter::new(ReportOptions {
        font_size: 18.0,
        ..ReportOptions::default()
    });

    let outcome = backlog.export(&exporter, &path).unwrap();
    assert_eq!(outcome.layout, ReportLayout::PlainText);
    let strings = drawn_strings(&std::fs::read(&path).unwrap()).concat();
    assert!(strings.iter().any(|s| s.starts_with("1. ")));
}

#[test]
fn test_export_to_missing_directory_reports_destination() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("report.pdf");
    let mut backlog = backlog_with(1);
    let exporter = ReportExporter::default();

    let err = backlog.export(&exporter, &path).unwrap_err();
    assert!(matches!(err, ExportError::Destination { .. }));
    assert!(err.to_string().contains("no-such-dir"));
    assert!(!exporter.is_exporting());
    assert!(backlog.drain_events().iter().all(|e| !matches!(e, BacklogEvent::ReportExported { .. })));
}

#[test]
fn test_snapshot_ignores_later_changes() {
    let mut backlog = backlog_with(1);
    let snapshot = backlog.snapshot();
    backlog.set_weight(WeightField::UserValue, "0");
    backlog
        .add(InitiativeDraft::new("Late", ScoreSet::new(9.0, 9.0, 9.0, 9.0), 1.0))
        .unwrap();

    let report = ReportExporter::default().render(&snapshot).unwrap();
    let strings = drawn_strings(&report.bytes).concat();
    assert!(!strings.iter().any(|s| s == "Late"));
    assert!(strings.iter().any(|s| s.contains("(UV/TRI) Weight: 3")));
}
