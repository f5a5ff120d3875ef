//! Plain-text rendering of a normalized report.

use crate::report::normalize::{NormalizedReport, OverallResult, RowStatus, StatusRow};

fn icon(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Success => "✓",
        RowStatus::Warning => "!",
        RowStatus::Error => "✗",
    }
}

fn overall_label(overall: OverallResult) -> &'static str {
    match overall {
        OverallResult::Success => "✓ SUCCESS",
        OverallResult::Partial => "! PARTIAL",
        OverallResult::Failed => "✗ FAILED",
    }
}

/// Render every section of the report. Empty sections are skipped.
pub fn render(report: &NormalizedReport) -> String {
    let width = report
        .rows()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(10);

    let mut out = String::new();
    section(&mut out, "connection", &report.connection_results, width);
    section(&mut out, "permissions", &report.permissions_results, width);
    section(&mut out, "operations", &report.operations_results, width);

    if !report.errors.is_empty() {
        out.push_str("\nerrors\n");
        for (i, error) in report.errors.iter().enumerate() {
            out.push_str(&format!("  {}. {error}\n", i + 1));
        }
    }

    if let Some(overall) = report.overall_result {
        out.push_str(&format!(
            "\nresult  {}\n        {}\n",
            overall_label(overall),
            report.result_message
        ));
    }

    if !report.recommended_domain.is_empty() {
        out.push_str(&format!(
            "\nrecommended domain  {}\n",
            report.recommended_domain
        ));
    }

    out
}

fn section(out: &mut String, title: &str, rows: &[StatusRow], width: usize) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}\n"));
    for row in rows {
        out.push_str(&format!(
            "  {} {:<width$}  {}\n",
            icon(row.status),
            row.name,
            row.message
        ));
    }
}
