//! Chart suggestions derived from column types.
//!
//! Mirrors the tool's visualization step without rendering images: leading
//! numeric columns get a binned distribution, leading categorical columns a
//! top-categories bar, and the correlation matrix appears once two or more
//! numeric columns exist. Output is textual; image fidelity is someone
//! else's problem.

use comfy_table::Table as DisplayTable;
use comfy_table::presets::UTF8_FULL_CONDENSED;

use crate::dataset::Table;
use crate::stats;

/// Numeric columns charted, in header order.
const MAX_NUMERIC_CHARTS: usize = 3;
/// Categorical columns charted, in header order.
const MAX_CATEGORICAL_CHARTS: usize = 2;
/// Equal-width bins per distribution chart.
const HISTOGRAM_BINS: usize = 10;
/// Top categories kept per bar chart.
const BAR_CATEGORIES: usize = 10;
/// Widest ASCII bar emitted.
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub enum ChartSpec {
    /// Binned distribution of a numeric column.
    Histogram {
        column: String,
        bins: Vec<(String, usize)>,
    },
    /// Top value counts of a categorical column.
    Bar {
        column: String,
        counts: Vec<(String, usize)>,
    },
    /// Pearson correlation matrix over numeric columns.
    Heatmap {
        labels: Vec<String>,
        values: Vec<Vec<f64>>,
    },
}

impl ChartSpec {
    pub fn title(&self) -> String {
        match self {
            ChartSpec::Histogram { column, .. } => format!("Distribution of {column}"),
            ChartSpec::Bar { column, .. } => format!("Top categories in {column}"),
            ChartSpec::Heatmap { .. } => "Correlation matrix".to_string(),
        }
    }

    /// Renders the chart as terminal text.
    pub fn render(&self) -> String {
        match self {
            ChartSpec::Histogram { bins, .. } => render_bars(bins),
            ChartSpec::Bar { counts, .. } => render_bars(counts),
            ChartSpec::Heatmap { labels, values } => render_heatmap(labels, values),
        }
    }
}

/// Builds the chart suggestions for a table.
pub fn suggest_charts(table: &Table) -> Vec<ChartSpec> {
    let mut specs = Vec::new();

    for idx in table.numeric_columns().into_iter().take(MAX_NUMERIC_CHARTS) {
        let values = table.numeric_values(idx);
        if let Some(bins) = histogram_bins(&values) {
            specs.push(ChartSpec::Histogram {
                column: table.headers()[idx].clone(),
                bins,
            });
        }
    }

    let summary = stats::describe(table);
    for idx in table
        .categorical_columns()
        .into_iter()
        .take(MAX_CATEGORICAL_CHARTS)
    {
        let counts = summary
            .categorical
            .iter()
            .find(|c| c.name == table.headers()[idx])
            .map(|c| {
                c.top
                    .iter()
                    .take(BAR_CATEGORIES)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if !counts.is_empty() {
            specs.push(ChartSpec::Bar {
                column: table.headers()[idx].clone(),
                counts,
            });
        }
    }

    if let Some((labels, values)) = stats::correlation_matrix(table) {
        specs.push(ChartSpec::Heatmap { labels, values });
    }

    specs
}

fn histogram_bins(values: &[f64]) -> Option<Vec<(String, usize)>> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return Some(vec![(format!("{min:.2}"), values.len())]);
    }

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut counts = vec![0usize; HISTOGRAM_BINS];
    for &v in values {
        let mut bin = ((v - min) / width) as usize;
        if bin >= HISTOGRAM_BINS {
            bin = HISTOGRAM_BINS - 1; // max lands in the last bin
        }
        counts[bin] += 1;
    }

    Some(
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let lo = min + width * i as f64;
                let hi = lo + width;
                (format!("[{lo:.2}, {hi:.2})"), count)
            })
            .collect(),
    )
}

fn render_bars(entries: &[(String, usize)]) -> String {
    let max_count = entries.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    let label_width = entries.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, count) in entries {
        let bar_len = (count * BAR_WIDTH).div_ceil(max_count);
        out.push_str(&format!(
            "{label:>label_width$} | {} {count}\n",
            "#".repeat(if *count == 0 { 0 } else { bar_len })
        ));
    }
    out
}

fn render_heatmap(labels: &[String], values: &[Vec<f64>]) -> String {
    let mut table = DisplayTable::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![String::new()];
    header.extend(labels.iter().cloned());
    table.set_header(header);

    for (label, row) in labels.iter().zip(values.iter()) {
        let mut cells = vec![label.clone()];
        cells.extend(row.iter().map(|v| {
            if v.is_nan() {
                "NaN".to_string()
            } else {
                format!("{v:.2}")
            }
        }));
        table.add_row(cells);
    }
    table.to_string()
}
