//! Time and id shifting applied to a segment before it is appended.
//!
//! Every function mutates the segment in place. Offsets are computed by the
//! caller from the combined document built so far.

use crate::chart::InstrumentalArrangement;

/// Offsets applied to one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rebase {
    /// Combined time at which the segment's local time zero lands.
    pub time: i32,
    /// Last measure number of the combined beat grid.
    pub last_measure: i16,
    /// Number of chord templates already in the combined document.
    pub chord_offset: usize,
    /// Number of phrases already in the combined document.
    pub phrase_offset: usize,
}

impl Rebase {
    pub fn for_combined(combined: &InstrumentalArrangement, time: i32) -> Self {
        Self {
            time,
            last_measure: combined.last_measure(),
            chord_offset: combined.chord_templates.len(),
            phrase_offset: combined.phrases.len(),
        }
    }

    pub fn apply(&self, arr: &mut InstrumentalArrangement) {
        phrase_iterations(arr, self.time, self.phrase_offset);
        linked_diffs(arr, self.phrase_offset);
        beats(arr, self.time, self.last_measure);
        sections(arr, self.time);
        events(arr, self.time);
        levels(arr, self.time, self.chord_offset);
    }
}

pub fn phrase_iterations(arr: &mut InstrumentalArrangement, time: i32, phrase_offset: usize) {
    for pi in &mut arr.phrase_iterations {
        pi.time += time;
        pi.phrase_id = pi.phrase_id.offset(phrase_offset);
    }
}

/// Offset every phrase id held by linked difficulty data.
pub fn linked_diffs(arr: &mut InstrumentalArrangement, phrase_offset: usize) {
    for nld in &mut arr.new_linked_diffs {
        for id in &mut nld.phrase_ids {
            *id = id.offset(phrase_offset);
        }
    }
    for ld in &mut arr.linked_diffs {
        ld.child_id = ld.child_id.offset(phrase_offset);
        ld.parent_id = ld.parent_id.offset(phrase_offset);
    }
    for pp in &mut arr.phrase_properties {
        pp.phrase_id = pp.phrase_id.offset(phrase_offset);
    }
}

/// Shift beats and continue measure numbering after `last_measure`.
pub fn beats(arr: &mut InstrumentalArrangement, time: i32, last_measure: i16) {
    let mut measure = last_measure;
    for beat in &mut arr.ebeats {
        if beat.measure >= 0 {
            measure += 1;
            beat.measure = measure;
        }
        beat.time += time;
    }
}

pub fn sections(arr: &mut InstrumentalArrangement, time: i32) {
    for section in &mut arr.sections {
        section.time += time;
    }
}

pub fn events(arr: &mut InstrumentalArrangement, time: i32) {
    for event in &mut arr.events {
        event.time += time;
    }
}

/// Shift notes, chords, anchors and hand shapes of every level.
pub fn levels(arr: &mut InstrumentalArrangement, time: i32, chord_offset: usize) {
    for level in &mut arr.levels {
        for note in &mut level.notes {
            note.shift(time);
        }
        for chord in &mut level.chords {
            chord.shift(time, chord_offset);
        }
        for anchor in &mut level.anchors {
            anchor.time += time;
        }
        for hs in &mut level.hand_shapes {
            hs.shift(time, chord_offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{
        Anchor, BendValue, Chord, ChordId, Ebeat, HandShape, Level, LinkedDiff, NewLinkedDiff, Note,
        PhraseId, PhraseIteration, PhraseProperty, Section,
    };

    fn segment() -> InstrumentalArrangement {
        let mut level = Level::new(0);
        level.notes.push(Note {
            time: 1000,
            bend_values: vec![BendValue {
                time: 1100,
                step: 0.5,
            }],
            ..Default::default()
        });
        level.chords.push(Chord {
            time: 2000,
            chord_id: ChordId(0),
            ..Default::default()
        });
        level.anchors.push(Anchor {
            time: 1000,
            fret: 5,
            width: 4.0,
        });
        level.hand_shapes.push(HandShape {
            chord_id: ChordId(0),
            start_time: 2000,
            end_time: 2500,
        });

        InstrumentalArrangement {
            phrase_iterations: vec![PhraseIteration::new(1000, PhraseId(0))],
            new_linked_diffs: vec![NewLinkedDiff {
                level_break: -1,
                ratio: "1.000".into(),
                phrase_ids: vec![PhraseId(0), PhraseId(1)],
            }],
            linked_diffs: vec![LinkedDiff {
                child_id: PhraseId(1),
                parent_id: PhraseId(0),
            }],
            phrase_properties: vec![PhraseProperty {
                phrase_id: PhraseId(1),
                redundant: 0,
                level_jump: 0,
                empty: 0,
                difficulty: 2,
            }],
            ebeats: vec![
                Ebeat {
                    time: 0,
                    measure: 1,
                },
                Ebeat {
                    time: 500,
                    measure: -1,
                },
                Ebeat {
                    time: 1000,
                    measure: 2,
                },
            ],
            sections: vec![Section::new("riff", 1000, 1)],
            levels: vec![level],
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_shifts_everything() {
        let mut arr = segment();
        let rebase = Rebase {
            time: 95_000,
            last_measure: 40,
            chord_offset: 3,
            phrase_offset: 4,
        };
        rebase.apply(&mut arr);

        assert_eq!(arr.phrase_iterations[0].time, 96_000);
        assert_eq!(arr.phrase_iterations[0].phrase_id, PhraseId(4));
        assert_eq!(
            arr.new_linked_diffs[0].phrase_ids,
            vec![PhraseId(4), PhraseId(5)]
        );
        assert_eq!(arr.linked_diffs[0].child_id, PhraseId(5));
        assert_eq!(arr.linked_diffs[0].parent_id, PhraseId(4));
        assert_eq!(arr.phrase_properties[0].phrase_id, PhraseId(5));
        assert_eq!(arr.sections[0].time, 96_000);

        let level = &arr.levels[0];
        assert_eq!(level.notes[0].time, 96_000);
        assert_eq!(level.notes[0].bend_values[0].time, 96_100);
        assert_eq!(level.chords[0].chord_id, ChordId(3));
        assert_eq!(level.anchors[0].time, 96_000);
        assert_eq!(level.hand_shapes[0].start_time, 97_000);
        assert_eq!(level.hand_shapes[0].end_time, 97_500);
        assert_eq!(level.hand_shapes[0].chord_id, ChordId(3));
    }

    #[test]
    fn test_beats_continue_measure_numbering() {
        let mut arr = segment();
        beats(&mut arr, 10_000, 40);
        let measures: Vec<i16> = arr.ebeats.iter().map(|b| b.measure).collect();
        assert_eq!(measures, vec![41, -1, 42]);
        assert_eq!(arr.ebeats[1].time, 10_500);
    }

    #[test]
    fn test_negative_time_offset() {
        let mut arr = segment();
        sections(&mut arr, -500);
        assert_eq!(arr.sections[0].time, 500);
    }
}
