//! Describe command handler.

use std::path::Path;

use anyhow::{Context, Result};

use crate::analyze::print_overview;
use crate::dataset::Table;

pub fn run(file: &Path) -> Result<()> {
    let table = Table::from_path(file)
        .with_context(|| format!("failed to load dataset from {}", file.display()))?;
    let mut stdout = std::io::stdout();
    print_overview(&mut stdout, &table)
}
