use frontdesk_export::error::ExportError;
use frontdesk_export::styles::ExportStyles;
use frontdesk_export::table::ReportTable;
use frontdesk_export::text::{PAGE_BREAK, render_text};
use frontdesk_export::{ExportFormat, export};
use frontdesk_report::row::{CellValue, ProjectedRow};

fn fields(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

fn row(name: &str, amount: f64) -> ProjectedRow {
    [
        ("name".to_string(), CellValue::text(name)),
        ("amount".to_string(), CellValue::Number(amount)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn table_headers_are_uppercased_labels() {
    let table = ReportTable::from_rows(&fields(&["name", "amount"]), &[row("Jane", 25.0)]);
    assert_eq!(table.headers, vec!["NAME", "AMOUNT"]);
    assert_eq!(table.rows, vec![vec!["Jane".to_string(), "25".to_string()]]);
}

#[test]
fn table_leaves_missing_cells_blank() {
    let table = ReportTable::from_rows(&fields(&["name", "mc"]), &[row("Jane", 25.0)]);
    assert_eq!(table.rows[0], vec!["Jane".to_string(), String::new()]);
}

#[test]
fn empty_report_is_refused() {
    let table = ReportTable::from_rows(&fields(&["name"]), &[]);
    let err = export(&table, ExportFormat::Text, &ExportStyles::default()).unwrap_err();
    assert!(matches!(err, ExportError::NoRows));
}

#[test]
fn text_export_lists_header_and_rows() {
    let table = ReportTable::from_rows(
        &fields(&["name", "amount"]),
        &[row("Jane", 25.0), row("Ali", 12.5)],
    );
    let text = render_text(&table, &ExportStyles::default()).unwrap();

    assert!(text.starts_with("Report\n"));
    assert!(text.contains("NAME | AMOUNT\n"));
    assert!(text.contains("Jane | 25\n"));
    assert!(text.contains("Ali | 12.5\n"));
    assert!(text.contains("Page 1 of 1"));
    assert!(!text.contains(PAGE_BREAK));
}

#[test]
fn text_export_paginates() {
    let rows: Vec<ProjectedRow> = (0..5).map(|i| row(&format!("P{i}"), i as f64)).collect();
    let table = ReportTable::from_rows(&fields(&["name", "amount"]), &rows);
    let styles = ExportStyles {
        rows_per_page: 2,
        ..ExportStyles::default()
    };

    let text = render_text(&table, &styles).unwrap();
    let pages: Vec<&str> = text.split(PAGE_BREAK).collect();

    assert_eq!(pages.len(), 3);
    assert!(pages[0].contains("P0 | 0") && pages[0].contains("P1 | 1"));
    assert!(pages[0].contains("Page 1 of 3"));
    assert!(pages[2].contains("P4 | 4"));
    assert!(pages[2].contains("Page 3 of 3"));
    for page in &pages {
        assert!(page.contains("NAME | AMOUNT"));
    }
}

#[test]
fn text_is_not_html_escaped() {
    let table = ReportTable::from_rows(&fields(&["name"]), &[
        [("name".to_string(), CellValue::text("Tan & Sons <HR>"))].into_iter().collect(),
    ]);
    let text = render_text(&table, &ExportStyles::default()).unwrap();
    assert!(text.contains("Tan & Sons <HR>"));
}

#[test]
fn docx_export_is_a_zip_package() {
    let table = ReportTable::from_rows(&fields(&["name", "amount"]), &[row("Jane", 25.0)]);
    let bytes = export(&table, ExportFormat::Docx, &ExportStyles::default()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn format_metadata() {
    assert_eq!(ExportFormat::Text.file_name(), "report.txt");
    assert!(ExportFormat::Docx.content_type().contains("wordprocessingml"));
    let parsed: ExportFormat = serde_json::from_str("\"docx\"").unwrap();
    assert_eq!(parsed, ExportFormat::Docx);
}
