//! Classic mode: combine instrumental files given on the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use combiner_core::{InstrumentalArrangement, InstrumentalCombiner, validate_single_level};
use owo_colors::OwoColorize;
use tracing::info;

pub fn run(
    files: &[PathBuf],
    trim: f64,
    condense: bool,
    coerce: bool,
    title: Option<&str>,
    output: Option<PathBuf>,
) -> Result<()> {
    let trim_ms = (trim * 1000.0).round() as i32;
    if trim_ms != 0 {
        info!("Trimming each subsequent file by {:.3}s", trim);
    }

    let segments = if condense {
        files
            .iter()
            .map(|f| {
                InstrumentalArrangement::load(f).with_context(|| format!("loading {}", f.display()))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        validate_single_level(files)?
    };

    let output = output.unwrap_or_else(|| default_output(&segments));

    let mut combiner = InstrumentalCombiner::new();
    let count = segments.len();
    for (i, arr) in segments.into_iter().enumerate() {
        let trim = if i == 0 { 0 } else { trim_ms };
        let length = arr.song_length;
        combiner.add_next(arr, length, trim, condense, i + 1 == count);
    }

    if let Some(title) = title {
        combiner.set_title(title);
    }

    for warning in combiner.warnings() {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    combiner.save(&output, coerce)?;
    eprintln!("Saved combined file as {}", output.display());
    Ok(())
}

fn default_output(segments: &[InstrumentalArrangement]) -> PathBuf {
    let name = segments
        .first()
        .map(|a| a.arrangement.as_str())
        .filter(|a| !a.is_empty())
        .unwrap_or("Lead");
    PathBuf::from(format!("Combined_{}_RS2.xml", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_uses_arrangement_name() {
        let arr = InstrumentalArrangement {
            arrangement: "Bass".into(),
            ..Default::default()
        };
        assert_eq!(default_output(&[arr]), PathBuf::from("Combined_Bass_RS2.xml"));
        assert_eq!(default_output(&[]), PathBuf::from("Combined_Lead_RS2.xml"));
    }
}
