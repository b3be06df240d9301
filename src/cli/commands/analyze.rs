//! Analyze command handler.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::analyze::{AnalysisOptions, run_analysis};
use crate::config::Config;
use crate::dataset::Table;
use crate::providers::gemini::{GeminiClient, GeminiConfig};
use crate::report;

pub async fn run(
    file: &Path,
    config: &Config,
    model_override: Option<&str>,
    report_path: Option<PathBuf>,
    no_report: bool,
) -> Result<()> {
    let table = Table::from_path(file)
        .with_context(|| format!("failed to load dataset from {}", file.display()))?;

    // Apply overrides if provided
    let config = {
        let mut c = config.clone();
        if let Some(model) = model_override {
            c.model = model.to_string();
        }
        c
    };

    let gemini_config = GeminiConfig::from_env(
        config.model.clone(),
        config.max_output_tokens,
        config.effective_gemini_base_url(),
    )?;
    let client = GeminiClient::new(gemini_config);

    let options = AnalysisOptions {
        report_path: report_path.unwrap_or_else(|| PathBuf::from(report::REPORT_FILENAME)),
        write_report: !no_report,
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_analysis(
        stdin.lock(),
        &mut stdout,
        &client,
        &table,
        &config,
        &options,
    )
    .await
}
