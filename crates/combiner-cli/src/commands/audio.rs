//! Join the audio files of a project.

use std::path::Path;

use anyhow::Result;
use combiner_core::{AudioJoin, Project};

pub fn run(project: &Path, output: &Path, sox: &Path) -> Result<()> {
    let project = Project::load(project)?;
    let segments = AudioJoin::segments_of(&project)?;

    AudioJoin::new(sox).run(&segments, output)?;
    eprintln!("Audio files combined as {}", output.display());
    Ok(())
}
