//! Execution of every combination a project describes.

use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, error, info};

use super::{ArrangementEntry, ArrangementType, Project};
use crate::chart::{InstrumentalArrangement, ShowLights, Vocals};
use crate::combine::tones::{replace_tone_names, set_base_tone};
use crate::combine::{
    CombineWarning, InstrumentalCombiner, ShowLightsCombiner, VocalsCombiner, add_title_to_lyrics,
};
use crate::error::{Error, Result};

/// Outcome of one combination run.
#[derive(Debug)]
pub struct RunReport {
    pub kind: ArrangementType,
    pub output: PathBuf,
    pub outcome: Result<Vec<CombineWarning>>,
}

impl RunReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Load instrumental segments, rejecting any with more than one level.
///
/// Every file is checked before anything is combined.
pub fn validate_single_level<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<InstrumentalArrangement>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let arr = InstrumentalArrangement::load(path)?;
            if arr.has_multiple_levels() {
                return Err(Error::UnsupportedDifficulty {
                    file: path.to_path_buf(),
                    levels: arr.levels.len(),
                });
            }
            Ok(arr)
        })
        .collect()
}

/// Run every combination of `project`, writing results into `target_dir`.
///
/// Runs execute in parallel and fail independently; one report is returned
/// per run that the project's tracks allow.
pub fn run_project(project: &Project, target_dir: &Path) -> Vec<RunReport> {
    let kinds = runnable_kinds(project);
    debug!("Running {} combinations", kinds.len());

    thread::scope(|scope| {
        let handles: Vec<_> = kinds
            .into_iter()
            .map(|kind| {
                let output = target_dir.join(kind.output_file_name());
                let handle = scope.spawn({
                    let output = output.clone();
                    move || run_one(project, kind, &output)
                });
                (kind, output, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(kind, output, handle)| {
                let outcome = handle.join().unwrap_or_else(|_| {
                    Err(Error::RunPanicked {
                        kind: kind.to_string(),
                    })
                });
                match &outcome {
                    Ok(_) => info!("{} combined into {}", kind, output.display()),
                    Err(e) => error!("{} combination failed: {}", kind, e),
                }
                RunReport {
                    kind,
                    output,
                    outcome,
                }
            })
            .collect()
    })
}

/// Kinds that can be combined across all tracks.
///
/// Instrumental and show light runs follow the first track's layout and
/// need the kind in every track. A vocals run happens when any track has
/// lyrics of that kind; tracks without them add silence.
fn runnable_kinds(project: &Project) -> Vec<ArrangementType> {
    let mut kinds: Vec<ArrangementType> = Vec::new();
    for kind in project.kinds() {
        if kind.is_vocals() || kinds.contains(&kind) {
            continue;
        }
        if project.tracks.iter().all(|t| t.arrangement(kind).is_some()) {
            kinds.push(kind);
        }
    }

    let vocal_kinds = project
        .tracks
        .iter()
        .flat_map(|t| t.arrangements.iter().map(ArrangementEntry::kind))
        .filter(|kind| kind.is_vocals());
    for kind in vocal_kinds {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

fn run_one(project: &Project, kind: ArrangementType, output: &Path) -> Result<Vec<CombineWarning>> {
    if kind.is_instrumental() {
        run_instrumental(project, kind, output)
    } else if kind.is_vocals() {
        run_vocals(project, kind, output).map(|_| Vec::new())
    } else {
        run_show_lights(project, output).map(|_| Vec::new())
    }
}

fn run_instrumental(
    project: &Project,
    kind: ArrangementType,
    output: &Path,
) -> Result<Vec<CombineWarning>> {
    let options = &project.options;
    let common_base = project.common_tones.base_tone(kind);

    // Load everything up front so a bad file aborts before any merging.
    let mut segments = Vec::with_capacity(project.tracks.len());
    for (i, track) in project.tracks.iter().enumerate() {
        let Some(ArrangementEntry::Instrumental {
            file,
            base_tone,
            tone_names,
            tone_replacements,
            ..
        }) = track.arrangement(kind)
        else {
            return Err(Error::InvalidProject(format!(
                "track '{}' has no {} arrangement",
                track.title, kind
            )));
        };

        let mut arr = InstrumentalArrangement::load(file)?;
        if tone_names.is_some() {
            replace_tone_names(&mut arr, tone_replacements);
        } else if let Some(base) = common_base.filter(|_| i == 0).or(base_tone.as_deref()) {
            set_base_tone(&mut arr, base);
        }
        segments.push((arr, track));
    }

    let mut combiner = InstrumentalCombiner::new();
    let count = segments.len();
    for (i, (arr, track)) in segments.into_iter().enumerate() {
        combiner.add_next(
            arr,
            track.song_length_ms(),
            track.trim_ms(),
            options.condense,
            i + 1 == count,
        );
    }

    if !project.combined_title.is_empty() {
        combiner.set_title(&project.combined_title);
    }

    let warnings = combiner.warnings().to_vec();
    combiner.save(output, options.coerce_phrases)?;
    Ok(warnings)
}

fn run_vocals(project: &Project, kind: ArrangementType, output: &Path) -> Result<()> {
    let mut segments = Vec::with_capacity(project.tracks.len());
    for (i, track) in project.tracks.iter().enumerate() {
        let vocals = match track.arrangement(kind) {
            Some(entry) => Some(Vocals::load(entry.file())?),
            None => None,
        };
        let vocals = if project.options.add_track_names_to_lyrics {
            let mut vocals = vocals.unwrap_or_default();
            let title = format!("{}. {}+", i + 1, track.title);
            add_title_to_lyrics(&mut vocals, &title, track.trim_ms().abs());
            Some(vocals)
        } else {
            vocals
        };
        segments.push((vocals, track));
    }

    let mut combiner = VocalsCombiner::new();
    for (vocals, track) in segments {
        combiner.add_next(vocals, track.song_length_ms(), track.trim_ms());
    }
    combiner.save(output)
}

fn run_show_lights(project: &Project, output: &Path) -> Result<()> {
    let mut segments = Vec::with_capacity(project.tracks.len());
    for track in &project.tracks {
        let Some(entry) = track.arrangement(ArrangementType::ShowLights) else {
            return Err(Error::InvalidProject(format!(
                "track '{}' has no show lights",
                track.title
            )));
        };
        segments.push((ShowLights::load(entry.file())?, track));
    }

    let mut combiner = ShowLightsCombiner::new();
    for (lights, track) in segments {
        combiner.add_next(lights, track.song_length_ms(), track.trim_ms());
    }
    combiner.save(output)
}
