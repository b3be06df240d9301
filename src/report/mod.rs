//! Report export: pagination plus PDF serialization.

pub mod layout;
pub mod pdf;

use std::path::Path;

use anyhow::Context;

use crate::session::Exchange;
use layout::PageMetrics;

pub use layout::REPORT_TITLE;

/// Default output filename for the exported report.
pub const REPORT_FILENAME: &str = "insightpulse_report.pdf";
pub const REPORT_CONTENT_TYPE: &str = "application/pdf";
/// Stands in for the summary when the insight call failed.
pub const SUMMARY_PLACEHOLDER: &str = "(insight summary unavailable)";

/// Builds the report PDF in memory.
pub fn build_report(summary: Option<&str>, history: &[Exchange], responder_label: &str) -> Vec<u8> {
    let summary = match summary {
        Some(s) if !s.trim().is_empty() => s,
        _ => SUMMARY_PLACEHOLDER,
    };
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let metrics = PageMetrics::default();
    let pages = layout::paginate_report(summary, history, responder_label, Some(&generated), metrics);
    pdf::render_pdf(&pages, metrics.page_width, metrics.page_height)
}

/// Writes the report to `path`.
pub fn export_report(
    path: &Path,
    summary: Option<&str>,
    history: &[Exchange],
    responder_label: &str,
) -> anyhow::Result<()> {
    let bytes = build_report(summary, history, responder_label);
    tracing::debug!(
        path = %path.display(),
        content_type = REPORT_CONTENT_TYPE,
        size = bytes.len(),
        "writing report"
    );
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}
