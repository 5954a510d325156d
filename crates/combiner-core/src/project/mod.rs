//! Combination project: the ordered tracks, their chart files and the
//! options of one combination session.
//!
//! Stored as pretty-printed camelCase JSON. Times are in seconds.

mod kind;
mod run;
mod tones;

pub use kind::ArrangementType;
pub use run::{RunReport, run_project, validate_single_level};
pub use tones::{COMMON_TONE_COUNT, ToneContext};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CombineOptions;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub combined_title: String,
    #[serde(default)]
    pub options: CombineOptions,
    #[serde(default)]
    pub common_tones: ToneContext,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    /// Seconds cut from the start of this track by overlapping it with the
    /// previous one.
    #[serde(default)]
    pub trim_amount: f64,
    /// Seconds.
    pub song_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<PathBuf>,
    #[serde(default)]
    pub arrangements: Vec<ArrangementEntry>,
}

/// One chart file of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ArrangementEntry {
    Instrumental {
        kind: ArrangementType,
        file: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_tone: Option<String>,
        /// Tone names found in the file; present when the tones are renamed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tone_names: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        tone_replacements: BTreeMap<String, String>,
    },
    Vocals {
        file: PathBuf,
        #[serde(default)]
        japanese: bool,
    },
    ShowLights {
        file: PathBuf,
    },
}

impl ArrangementEntry {
    pub fn kind(&self) -> ArrangementType {
        match self {
            Self::Instrumental { kind, .. } => *kind,
            Self::Vocals { japanese: true, .. } => ArrangementType::JVocals,
            Self::Vocals { .. } => ArrangementType::Vocals,
            Self::ShowLights { .. } => ArrangementType::ShowLights,
        }
    }

    pub fn file(&self) -> &Path {
        match self {
            Self::Instrumental { file, .. }
            | Self::Vocals { file, .. }
            | Self::ShowLights { file } => file,
        }
    }

    fn file_mut(&mut self) -> &mut PathBuf {
        match self {
            Self::Instrumental { file, .. }
            | Self::Vocals { file, .. }
            | Self::ShowLights { file } => file,
        }
    }
}

impl Track {
    pub fn arrangement(&self, kind: ArrangementType) -> Option<&ArrangementEntry> {
        self.arrangements.iter().find(|a| a.kind() == kind)
    }

    pub fn trim_ms(&self) -> i32 {
        secs_to_ms(self.trim_amount)
    }

    pub fn song_length_ms(&self) -> i32 {
        secs_to_ms(self.song_length)
    }
}

pub(crate) fn secs_to_ms(secs: f64) -> i32 {
    (secs * 1000.0).round() as i32
}

impl Project {
    /// Load a project; relative file paths are resolved against the
    /// project file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut project: Project = serde_json::from_str(&content)?;

        if let Some(dir) = path.parent() {
            project.resolve_paths(dir);
        }
        project.validate()?;

        debug!("Loaded project {} ({} tracks)", path.display(), project.tracks.len());
        Ok(project)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(Error::InvalidProject("the project has no tracks".to_string()));
        }
        for track in &self.tracks {
            if track.song_length < 0.0 {
                return Err(Error::InvalidProject(format!(
                    "track '{}' has a negative length",
                    track.title
                )));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, dir: &Path) {
        for track in &mut self.tracks {
            if let Some(audio) = track.audio_file.as_mut()
                && audio.is_relative()
            {
                *audio = dir.join(&*audio);
            }
            for entry in &mut track.arrangements {
                let file = entry.file_mut();
                if file.is_relative() {
                    *file = dir.join(&*file);
                }
            }
        }
    }

    /// Kinds present in the first track, in the order they appear there.
    pub fn kinds(&self) -> Vec<ArrangementType> {
        self.tracks
            .first()
            .map(|t| t.arrangements.iter().map(ArrangementEntry::kind).collect())
            .unwrap_or_default()
    }
}
