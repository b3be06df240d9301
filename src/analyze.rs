//! The analysis flow: dataset overview, model insights, follow-up chat,
//! and report export.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use comfy_table::Table as DisplayTable;
use comfy_table::presets::UTF8_FULL_CONDENSED;

use crate::charts;
use crate::config::Config;
use crate::dataset::Table;
use crate::prompt;
use crate::providers::Summarizer;
use crate::report;
use crate::session::{ChatSession, QuestionCheck};
use crate::stats;

/// Rows shown in the terminal preview.
const PREVIEW_ROWS: usize = 5;
/// Ends the chat loop.
const QUIT_COMMAND: &str = ":q";

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub report_path: PathBuf,
    pub write_report: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from(report::REPORT_FILENAME),
            write_report: true,
        }
    }
}

fn preview_table(table: &Table) -> DisplayTable {
    let mut preview = DisplayTable::new();
    preview.load_preset(UTF8_FULL_CONDENSED);
    preview.set_header(table.headers());
    for row in table.rows().iter().take(PREVIEW_ROWS) {
        preview.add_row(row);
    }
    preview
}

/// Prints the dataset overview: shape, preview, summary statistics, and
/// suggested charts.
pub fn print_overview<W: Write>(out: &mut W, table: &Table) -> anyhow::Result<()> {
    writeln!(
        out,
        "Dataset: {} ({} rows, {} columns)\n",
        table.name,
        table.row_count(),
        table.column_count()
    )?;
    writeln!(out, "Preview:\n{}\n", preview_table(table))?;

    let summary = stats::describe(table);
    if let Some(numeric) = summary.numeric_table() {
        writeln!(out, "Numeric columns:\n{numeric}\n")?;
    }
    for (name, counts) in summary.categorical_tables() {
        writeln!(out, "Top values in {name}:\n{counts}\n")?;
    }

    for chart in charts::suggest_charts(table) {
        writeln!(out, "{}\n{}\n", chart.title(), chart.render())?;
    }
    Ok(())
}

/// Runs the full analysis against an already-ingested table: overview,
/// insight summary, interactive chat until `:q` or end of input, then the
/// report export.
///
/// Provider failures are reported inline and never abort the flow; the
/// session stays active and the report falls back to a placeholder summary.
pub async fn run_analysis<R, W, S>(
    mut input: R,
    out: &mut W,
    summarizer: &S,
    table: &Table,
    config: &Config,
    options: &AnalysisOptions,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    S: Summarizer,
{
    print_overview(out, table)?;

    let summary = request_insights(out, summarizer, table, config).await?;

    let mut session = ChatSession::new();
    writeln!(
        out,
        "Ask follow-up questions about the data. Type {QUIT_COMMAND} to end the chat."
    )?;
    let chat_sample = table.sample_csv(config.chat_sample_rows);
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            session.end();
            break;
        }
        let question = line.trim();
        if question == QUIT_COMMAND {
            session.end();
            break;
        }
        match session.check_question(question) {
            QuestionCheck::Ignore => {}
            QuestionCheck::Reject => break,
            QuestionCheck::Accept => {
                tracing::debug!(table = %table.id, question, "chat turn");
                match summarizer
                    .generate(&prompt::chat_prompt(&chat_sample, question))
                    .await
                {
                    Ok(answer) => {
                        writeln!(out, "{}: {answer}\n", config.responder_label)?;
                        session
                            .record(question, answer)
                            .context("failed to record chat exchange")?;
                    }
                    Err(e) => {
                        writeln!(out, "Could not get an answer: {e}")?;
                    }
                }
            }
        }
    }
    writeln!(out, "Chat ended.")?;

    let should_export =
        options.write_report && (!config.export_requires_chat || !session.history().is_empty());
    if should_export {
        report::export_report(
            &options.report_path,
            summary.as_deref(),
            session.history(),
            &config.responder_label,
        )?;
        writeln!(out, "Report saved to {}", options.report_path.display())?;
    }
    Ok(())
}

async fn request_insights<W: Write, S: Summarizer>(
    out: &mut W,
    summarizer: &S,
    table: &Table,
    config: &Config,
) -> anyhow::Result<Option<String>> {
    let sample = table.sample_csv(config.summary_sample_rows);
    let stats_text = stats::describe(table).to_plain_text();
    tracing::debug!(table = %table.id, "requesting insight summary");
    match summarizer
        .generate(&prompt::insight_prompt(&sample, &stats_text))
        .await
    {
        Ok(summary) => {
            writeln!(out, "Insights:\n{summary}\n")?;
            Ok(Some(summary))
        }
        Err(e) => {
            writeln!(out, "Could not generate insights: {e}\n")?;
            Ok(None)
        }
    }
}
