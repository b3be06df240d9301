//! Summary statistics over an ingested table.
//!
//! Mirrors the describe/aggregate surface the tool needs: per numeric column
//! count, mean, sample std, min, quartiles and max; per categorical column
//! distinct counts and the top value counts; and a Pearson correlation
//! matrix over numeric columns.

use comfy_table::Table as DisplayTable;
use comfy_table::presets::UTF8_FULL_CONDENSED;

use crate::dataset::Table;

/// Top value counts kept per categorical column.
const TOP_CATEGORIES: usize = 10;

#[derive(Debug, Clone)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct CategoricalSummary {
    pub name: String,
    pub unique: usize,
    /// Most frequent values with counts, descending, capped at
    /// [`TOP_CATEGORIES`]. Ties break on value for determinism.
    pub top: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetSummary {
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
}

/// Computes the dataset summary (describe-equivalent).
pub fn describe(table: &Table) -> DatasetSummary {
    let numeric = table
        .numeric_columns()
        .into_iter()
        .filter_map(|idx| summarize_numeric(&table.headers()[idx], &table.numeric_values(idx)))
        .collect();

    let categorical = table
        .categorical_columns()
        .into_iter()
        .map(|idx| summarize_categorical(&table.headers()[idx], table.column_values(idx)))
        .collect();

    DatasetSummary {
        numeric,
        categorical,
    }
}

fn summarize_numeric(name: &str, values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(NumericSummary {
        name: name.to_string(),
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

fn summarize_categorical<'a>(
    name: &str,
    values: impl Iterator<Item = &'a str>,
) -> CategoricalSummary {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let unique = counts.len();
    let mut top: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(v, c)| (v.to_string(), c))
        .collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(TOP_CATEGORIES);

    CategoricalSummary {
        name: name.to_string(),
        unique,
        top,
    }
}

/// Linear-interpolation quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Pearson correlation matrix over the table's numeric columns.
///
/// Pairs are computed over rows where both values are present. Returns `None`
/// when fewer than two numeric columns exist. Entries with fewer than two
/// shared points, or a constant series, are `NaN`.
pub fn correlation_matrix(table: &Table) -> Option<(Vec<String>, Vec<Vec<f64>>)> {
    let columns = table.numeric_columns();
    if columns.len() < 2 {
        return None;
    }

    let labels: Vec<String> = columns
        .iter()
        .map(|&idx| table.headers()[idx].clone())
        .collect();
    let series: Vec<Vec<Option<f64>>> = columns.iter().map(|&idx| table.numeric_cells(idx)).collect();

    let n = columns.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Some((labels, matrix))
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some((((*x)?), ((*y)?))))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.4}")
    }
}

impl DatasetSummary {
    /// Terminal table of numeric statistics, one row per stat, one column
    /// per numeric dataset column.
    pub fn numeric_table(&self) -> Option<DisplayTable> {
        if self.numeric.is_empty() {
            return None;
        }

        let mut table = DisplayTable::new();
        table.load_preset(UTF8_FULL_CONDENSED);

        let mut header = vec!["stat".to_string()];
        header.extend(self.numeric.iter().map(|s| s.name.clone()));
        table.set_header(header);

        for (label, pick) in stat_rows() {
            let mut row = vec![label.to_string()];
            row.extend(self.numeric.iter().map(|s| format_stat(pick(s))));
            table.add_row(row);
        }
        Some(table)
    }

    /// Terminal tables of top categories, one per categorical column.
    pub fn categorical_tables(&self) -> Vec<(String, DisplayTable)> {
        self.categorical
            .iter()
            .map(|summary| {
                let mut table = DisplayTable::new();
                table.load_preset(UTF8_FULL_CONDENSED);
                table.set_header(vec!["value", "count"]);
                for (value, count) in &summary.top {
                    table.add_row(vec![value.clone(), count.to_string()]);
                }
                let title = format!("{} ({} distinct)", summary.name, summary.unique);
                (title, table)
            })
            .collect()
    }

    /// Plain-text rendering for prompt embedding: stat rows by column
    /// headers.
    pub fn to_plain_text(&self) -> String {
        if self.numeric.is_empty() {
            return "(no numeric columns)".to_string();
        }

        let width = 14;
        let mut out = String::new();
        out.push_str(&format!("{:>8}", ""));
        for summary in &self.numeric {
            out.push_str(&format!("{:>width$}", summary.name));
        }
        out.push('\n');

        for (label, pick) in stat_rows() {
            out.push_str(&format!("{label:>8}"));
            for summary in &self.numeric {
                out.push_str(&format!("{:>width$}", format_stat(pick(summary))));
            }
            out.push('\n');
        }
        out
    }
}

type StatPick = fn(&NumericSummary) -> f64;

fn stat_rows() -> [(&'static str, StatPick); 8] {
    [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ]
}
