//! The generate command

use anyhow::{Context, Result};
use apigen_core::RunReport;
use std::path::Path;
use tracing::warn;

/// Run the generator and print what it did
pub fn run(config: &Path, root: &Path) -> Result<()> {
    if !root.is_dir() {
        anyhow::bail!("Project root is not a directory: {}", root.display());
    }

    let report = apigen_core::run_config_file(config, root)
        .with_context(|| format!("Generation failed for {}", config.display()))?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("Processed {} API entries", report.entries);

    for path in &report.created {
        println!("  Created {}", path.display());
    }
    for path in &report.updated {
        println!("  Updated {}", path.display());
    }
    for path in &report.outputs {
        println!("  Wrote {}", path.display());
    }

    if report.files_written() == 0 {
        println!("Everything up to date ({} files unchanged)", report.unchanged.len());
    } else {
        println!(
            "{} created, {} updated, {} outputs written, {} unchanged",
            report.created.len(),
            report.updated.len(),
            report.outputs.len(),
            report.unchanged.len()
        );
    }

    if !report.warnings.is_empty() {
        warn!("{} handler(s) without an API doc block", report.warnings.len());
    }
}
