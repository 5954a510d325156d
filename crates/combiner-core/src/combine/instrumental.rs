//! Combination of guitar and bass arrangements.

use std::path::Path;

use tracing::{debug, info};

use super::condense::{SegmentPosition, condense_into_one_phrase};
use super::rebase::Rebase;
use super::tones::{cleanup_tone_changes, merge_tone_timeline};
use super::{CombineWarning, coerce, dedup};
use crate::chart::{COUNT_PHRASE, END_PHRASE, InstrumentalArrangement, Level, NOGUITAR};
use crate::error::{Error, Result};

/// Accumulates instrumental segments into one arrangement.
#[derive(Debug, Default)]
pub struct InstrumentalCombiner {
    combined: Option<InstrumentalArrangement>,
    arrangement_number: usize,
    tempo_sum: f32,
    warnings: Vec<CombineWarning>,
}

impl InstrumentalCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combined(&self) -> Option<&InstrumentalArrangement> {
        self.combined.as_ref()
    }

    pub fn warnings(&self) -> &[CombineWarning] {
        &self.warnings
    }

    /// Append the next segment in performance order.
    ///
    /// `song_length` and `trim_amount` are in milliseconds. The trim amount
    /// of the first segment is ignored.
    pub fn add_next(
        &mut self,
        mut next: InstrumentalArrangement,
        song_length: i32,
        trim_amount: i32,
        condense: bool,
        is_last: bool,
    ) {
        let is_first = self.combined.is_none();
        self.arrangement_number += 1;
        self.tempo_sum += next.average_tempo;

        if condense {
            let position = SegmentPosition {
                is_first,
                is_last,
                number: self.arrangement_number,
            };
            condense_into_one_phrase(&mut next, song_length, position);
        }

        remove_extra_beats(&mut next);

        if !is_last && !condense {
            replace_end_with_noguitar(&mut next);
        }

        let Some(combined) = self.combined.as_mut() else {
            next.song_length = song_length;
            next.transcription_track = Some(Level::new(-1));
            debug!("Segment 1 becomes the base of the combined arrangement");
            self.combined = Some(next);
            return;
        };

        if !condense {
            remove_count_phrase(&mut next);
        }

        let start_time = combined.song_length - trim_amount;
        let rebase = Rebase::for_combined(combined, start_time);

        if !condense && (combined.has_multiple_levels() || next.has_multiple_levels()) {
            prefix_phrase_names(&mut next, self.arrangement_number);
        }

        rebase.apply(&mut next);
        append_segment(combined, &mut next);
        combined.renumber_sections();

        merge_tone_timeline(combined, &mut next, start_time, &mut self.warnings);

        combined.song_length += song_length - trim_amount;
        combined
            .arrangement_properties
            .merge(&next.arrangement_properties);

        debug!(
            "Added segment {} at {} ms, combined length {} ms",
            self.arrangement_number, start_time, combined.song_length
        );
    }

    /// Set the title of the combined arrangement, if there is one.
    pub fn set_title(&mut self, title: &str) {
        if let Some(combined) = self.combined.as_mut() {
            combined.title = title.to_string();
            combined.song_name_sort = title.to_string();
        }
    }

    /// Run the cleanup passes and return the finished arrangement.
    pub fn finalize(self, coerce_phrases: bool) -> Result<InstrumentalArrangement> {
        let mut combined = self.combined.ok_or(Error::EmptyArrangement)?;

        combined.average_tempo = self.tempo_sum / self.arrangement_number as f32;

        cleanup_tone_changes(&mut combined);
        dedup::combine_phrases(&mut combined);
        dedup::merge_noguitar_sections(&mut combined);
        dedup::combine_chords(&mut combined);

        if coerce_phrases && combined.levels.len() == 1 {
            coerce::coerce_phrases_and_sections(&mut combined);
        }

        Ok(combined)
    }

    /// Finalize and write the combined arrangement to `path`.
    pub fn save<P: AsRef<Path>>(self, path: P, coerce_phrases: bool) -> Result<()> {
        let path = path.as_ref();
        let combined = self.finalize(coerce_phrases)?;
        combined.save(path)?;
        info!("Saved combined file as {}", path.display());
        Ok(())
    }
}

/// Drop beats at or past the segment's own declared length.
fn remove_extra_beats(arr: &mut InstrumentalArrangement) {
    let length = arr.song_length;
    while arr.ebeats.last().is_some_and(|b| b.time >= length) {
        arr.ebeats.pop();
    }
}

/// Turn the END phrase into a noguitar phrase, reusing an existing one.
fn replace_end_with_noguitar(arr: &mut InstrumentalArrangement) {
    let Some(end) = arr.find_phrase(END_PHRASE) else {
        return;
    };

    let Some(noguitar) = arr.find_phrase(NOGUITAR) else {
        arr.phrases[end.index()].name = NOGUITAR.to_string();
        return;
    };

    arr.phrases.remove(end.index());
    let noguitar = noguitar.shift_down_past(end);
    arr.remap_phrase_ids(|id| {
        if id == end {
            noguitar
        } else {
            id.shift_down_past(end)
        }
    });
}

/// Remove the COUNT phrase leading a later segment.
fn remove_count_phrase(arr: &mut InstrumentalArrangement) {
    let Some(first) = arr.phrase_iterations.first() else {
        return;
    };
    let count = first.phrase_id;
    if !arr
        .phrases
        .get(count.index())
        .is_some_and(|p| p.is_named(COUNT_PHRASE))
    {
        return;
    }

    arr.phrase_iterations.remove(0);
    arr.phrases.remove(count.index());
    arr.forget_phrase(count);
    arr.remap_phrase_ids(|id| id.shift_down_past(count));
}

/// Make phrase names unique to the segment, except END and noguitar.
fn prefix_phrase_names(arr: &mut InstrumentalArrangement, number: usize) {
    for phrase in &mut arr.phrases {
        if !phrase.is_named(END_PHRASE) && !phrase.is_named(NOGUITAR) {
            phrase.name = format!("arr{}{}", number, phrase.name);
        }
    }
}

/// Move every sequence of an already rebased segment into `combined`.
fn append_segment(combined: &mut InstrumentalArrangement, next: &mut InstrumentalArrangement) {
    combined.phrase_iterations.append(&mut next.phrase_iterations);
    combined.phrases.append(&mut next.phrases);
    combined.new_linked_diffs.append(&mut next.new_linked_diffs);
    combined.linked_diffs.append(&mut next.linked_diffs);
    combined.phrase_properties.append(&mut next.phrase_properties);
    combined.chord_templates.append(&mut next.chord_templates);
    combined.ebeats.append(&mut next.ebeats);
    combined.events.append(&mut next.events);
    combined.sections.append(&mut next.sections);

    for (i, level) in next.levels.iter_mut().enumerate() {
        if combined.levels.len() <= i {
            combined.levels.push(Level::new(i as i8));
        }
        combined.levels[i].append(level);
    }
}
