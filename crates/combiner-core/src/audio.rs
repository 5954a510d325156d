//! Joining of track audio through the external `sox` tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::chart::xml::secs;
use crate::error::{Error, Result};
use crate::project::Project;

const DEFAULT_TOOL: &str = "sox";

/// One input file and the milliseconds trimmed from its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    pub file: PathBuf,
    pub trim: i32,
}

#[derive(Debug, Clone)]
pub struct AudioJoin {
    tool: PathBuf,
}

impl Default for AudioJoin {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl AudioJoin {
    pub fn new<P: Into<PathBuf>>(tool: P) -> Self {
        Self { tool: tool.into() }
    }

    /// Audio segments of every track of `project`, in order.
    pub fn segments_of(project: &Project) -> Result<Vec<AudioSegment>> {
        project
            .tracks
            .iter()
            .map(|track| {
                let file = track.audio_file.clone().ok_or_else(|| {
                    Error::InvalidProject(format!("track '{}' has no audio file", track.title))
                })?;
                Ok(AudioSegment {
                    file,
                    trim: track.trim_ms(),
                })
            })
            .collect()
    }

    /// Arguments concatenating `segments` into `target`.
    ///
    /// Every segment after the first is piped through its own `sox` process
    /// that trims its start.
    pub fn arguments(&self, segments: &[AudioSegment], target: &Path) -> Vec<String> {
        let mut args: Vec<String> = ["--multi-threaded", "--buffer", "131072", "-S"]
            .into_iter()
            .map(String::from)
            .collect();

        let mut segments = segments.iter();
        if let Some(first) = segments.next() {
            args.push(first.file.display().to_string());
        }
        for segment in segments {
            args.push(format!(
                "|sox \"{}\" -p trim {}",
                segment.file.display(),
                secs::to_string(segment.trim)
            ));
        }

        args.push(target.display().to_string());
        args
    }

    pub fn run(&self, segments: &[AudioSegment], target: &Path) -> Result<()> {
        let args = self.arguments(segments, target);
        debug!("Running {} {}", self.tool.display(), args.join(" "));

        let status = Command::new(&self.tool).args(&args).status()?;
        if !status.success() {
            return Err(Error::AudioToolFailed {
                code: status.code().unwrap_or(-1),
            });
        }

        info!("Audio files combined as {}", target.display());
        Ok(())
    }
}
