//! Run every combination of a project file.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use combiner_core::{Project, run_project};
use owo_colors::OwoColorize;

pub fn run(
    file: &Path,
    output_dir: &Path,
    condense: bool,
    no_coerce: bool,
    no_track_names: bool,
) -> Result<()> {
    let mut project = Project::load(file)?;
    if condense {
        project.options.condense = true;
    }
    if no_coerce {
        project.options.coerce_phrases = false;
    }
    if no_track_names {
        project.options.add_track_names_to_lyrics = false;
    }

    fs::create_dir_all(output_dir)?;
    let reports = run_project(&project, output_dir);
    if reports.is_empty() {
        bail!("Nothing to combine in {}", file.display());
    }

    let mut failed = 0;
    for report in &reports {
        match &report.outcome {
            Ok(warnings) => {
                eprintln!("{}: {}", report.kind.green(), report.output.display());
                for warning in warnings {
                    eprintln!("  {} {}", "Warning:".yellow(), warning);
                }
            }
            Err(e) => {
                eprintln!("{}: {} {}", report.kind, "failed:".red(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} combinations failed", failed, reports.len());
    }
    eprintln!("Arrangements combined.");
    Ok(())
}
