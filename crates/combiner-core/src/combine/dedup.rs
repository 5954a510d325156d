//! Post-merge passes that collapse duplicate phrases, chord templates and
//! adjacent silence sections while keeping every reference valid.

use tracing::{debug, warn};

use crate::chart::{ChordId, InstrumentalArrangement, NOGUITAR, PhraseId};

/// Merge phrases with identical names into the lowest index.
///
/// Returns the number of phrases removed.
pub fn combine_phrases(arr: &mut InstrumentalArrangement) -> usize {
    let mut removed = 0;

    for id1 in (0..arr.phrases.len()).rev() {
        let Some(id2) = (0..id1).find(|&id2| arr.phrases[id2].name == arr.phrases[id1].name) else {
            continue;
        };

        // Phrase names are made unique per segment when there are DD levels.
        if arr.has_multiple_levels() && arr.phrases[id2].name != NOGUITAR {
            warn!(
                "Duplicate phrase name '{}' in an arrangement with difficulty levels",
                arr.phrases[id2].name
            );
        }

        arr.phrases.remove(id1);
        let (dup, keep) = (PhraseId(id1), PhraseId(id2));
        arr.remap_phrase_ids(|id| id.remap_removed(dup, keep));
        removed += 1;
    }

    if removed > 0 {
        debug!("Combined {} duplicate phrases", removed);
    }
    removed
}

/// Merge structurally equal chord templates into the lowest index.
///
/// Returns the number of templates removed.
pub fn combine_chords(arr: &mut InstrumentalArrangement) -> usize {
    let mut removed = 0;

    for id1 in (0..arr.chord_templates.len()).rev() {
        let Some(id2) = (0..id1).find(|&id2| arr.chord_templates[id2] == arr.chord_templates[id1])
        else {
            continue;
        };

        arr.chord_templates.remove(id1);
        let (dup, keep) = (ChordId(id1), ChordId(id2));
        arr.remap_chord_ids(|id| id.remap_removed(dup, keep));
        removed += 1;
    }

    if removed > 0 {
        debug!("Combined {} duplicate chord templates", removed);
    }
    removed
}

/// Collapse runs of adjacent `noguitar` sections into the first of each run,
/// dropping the phrase iterations placed at the removed sections.
pub fn merge_noguitar_sections(arr: &mut InstrumentalArrangement) -> usize {
    let mut removed = 0;
    let mut i = 0;

    while i + 1 < arr.sections.len() {
        if arr.sections[i].name == NOGUITAR && arr.sections[i + 1].name == NOGUITAR {
            let time = arr.sections.remove(i + 1).time;
            arr.phrase_iterations.retain(|pi| pi.time != time);
            removed += 1;
        } else {
            i += 1;
        }
    }

    if removed > 0 {
        arr.renumber_sections();
    }
    removed
}
