use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::ids::{ChordId, PhraseId};
use crate::chart::level::Level;
use crate::chart::properties::ArrangementProperties;
use crate::chart::tones::ToneChange;
use crate::chart::xml::{self, counted_list, flag, secs};
use crate::error::Result;

pub const COUNT_PHRASE: &str = "COUNT";
pub const END_PHRASE: &str = "END";
pub const NOGUITAR: &str = "noguitar";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Phrase {
    #[serde(rename = "@disparity", with = "flag", default)]
    pub disparity: bool,
    #[serde(rename = "@ignore", with = "flag", default)]
    pub ignore: bool,
    #[serde(rename = "@maxDifficulty", default)]
    pub max_difficulty: u8,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@solo", with = "flag", default)]
    pub solo: bool,
}

impl Phrase {
    pub fn new(name: impl Into<String>, max_difficulty: u8) -> Self {
        Self {
            name: name.into(),
            max_difficulty,
            ..Default::default()
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroLevel {
    #[serde(rename = "@hero")]
    pub hero: u8,
    #[serde(rename = "@difficulty")]
    pub difficulty: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhraseIteration {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@phraseId")]
    pub phrase_id: PhraseId,
    #[serde(rename = "@variation", default)]
    pub variation: String,
    #[serde(
        rename = "heroLevels",
        with = "hero_levels",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub hero_levels: Vec<HeroLevel>,
}

counted_list!(hero_levels, HeroLevel, "heroLevel");

impl PhraseIteration {
    pub fn new(time: i32, phrase_id: PhraseId) -> Self {
        Self {
            time,
            phrase_id,
            ..Default::default()
        }
    }
}

/// Phrases treated as one unit across difficulty levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NewLinkedDiffXml", into = "NewLinkedDiffXml")]
pub struct NewLinkedDiff {
    pub level_break: i8,
    pub ratio: String,
    pub phrase_ids: Vec<PhraseId>,
}

#[derive(Serialize, Deserialize)]
struct NewLinkedDiffXml {
    #[serde(rename = "@levelBreak", default = "no_level_break")]
    level_break: i8,
    #[serde(rename = "@ratio", default = "unit_ratio")]
    ratio: String,
    #[serde(rename = "@phraseCount", default)]
    phrase_count: usize,
    #[serde(rename = "nld_phrase", default)]
    phrases: Vec<LinkedPhrase>,
}

#[derive(Serialize, Deserialize)]
struct LinkedPhrase {
    #[serde(rename = "@id")]
    id: PhraseId,
}

fn no_level_break() -> i8 {
    -1
}

fn unit_ratio() -> String {
    "1.000".to_string()
}

impl From<NewLinkedDiffXml> for NewLinkedDiff {
    fn from(x: NewLinkedDiffXml) -> Self {
        Self {
            level_break: x.level_break,
            ratio: x.ratio,
            phrase_ids: x.phrases.into_iter().map(|p| p.id).collect(),
        }
    }
}

impl From<NewLinkedDiff> for NewLinkedDiffXml {
    fn from(nld: NewLinkedDiff) -> Self {
        Self {
            level_break: nld.level_break,
            ratio: nld.ratio,
            phrase_count: nld.phrase_ids.len(),
            phrases: nld
                .phrase_ids
                .into_iter()
                .map(|id| LinkedPhrase { id })
                .collect(),
        }
    }
}

/// Legacy parent/child phrase link between difficulty trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedDiff {
    #[serde(rename = "@childId")]
    pub child_id: PhraseId,
    #[serde(rename = "@parentId")]
    pub parent_id: PhraseId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseProperty {
    #[serde(rename = "@phraseId")]
    pub phrase_id: PhraseId,
    #[serde(rename = "@redundant", default)]
    pub redundant: i8,
    #[serde(rename = "@levelJump", default)]
    pub level_jump: i8,
    #[serde(rename = "@empty", default)]
    pub empty: i8,
    #[serde(rename = "@difficulty", default)]
    pub difficulty: i8,
}

/// Fret-hand mute shape. Only the element count is kept across load/save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FretHandMuteTemplate {}

/// Reusable fret/finger shape. Equality is structural over every field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ChordTemplateXml", into = "ChordTemplateXml")]
pub struct ChordTemplate {
    pub name: String,
    pub display_name: String,
    pub fingers: [i8; 6],
    pub frets: [i8; 6],
}

#[derive(Serialize, Deserialize)]
struct ChordTemplateXml {
    #[serde(rename = "@chordName", default)]
    chord_name: String,
    #[serde(rename = "@displayName", default)]
    display_name: String,
    #[serde(rename = "@finger0", default = "unused")]
    finger0: i8,
    #[serde(rename = "@finger1", default = "unused")]
    finger1: i8,
    #[serde(rename = "@finger2", default = "unused")]
    finger2: i8,
    #[serde(rename = "@finger3", default = "unused")]
    finger3: i8,
    #[serde(rename = "@finger4", default = "unused")]
    finger4: i8,
    #[serde(rename = "@finger5", default = "unused")]
    finger5: i8,
    #[serde(rename = "@fret0", default = "unused")]
    fret0: i8,
    #[serde(rename = "@fret1", default = "unused")]
    fret1: i8,
    #[serde(rename = "@fret2", default = "unused")]
    fret2: i8,
    #[serde(rename = "@fret3", default = "unused")]
    fret3: i8,
    #[serde(rename = "@fret4", default = "unused")]
    fret4: i8,
    #[serde(rename = "@fret5", default = "unused")]
    fret5: i8,
}

fn unused() -> i8 {
    -1
}

impl From<ChordTemplateXml> for ChordTemplate {
    fn from(x: ChordTemplateXml) -> Self {
        Self {
            name: x.chord_name,
            display_name: x.display_name,
            fingers: [
                x.finger0, x.finger1, x.finger2, x.finger3, x.finger4, x.finger5,
            ],
            frets: [x.fret0, x.fret1, x.fret2, x.fret3, x.fret4, x.fret5],
        }
    }
}

impl From<ChordTemplate> for ChordTemplateXml {
    fn from(ct: ChordTemplate) -> Self {
        let [finger0, finger1, finger2, finger3, finger4, finger5] = ct.fingers;
        let [fret0, fret1, fret2, fret3, fret4, fret5] = ct.frets;
        Self {
            chord_name: ct.name,
            display_name: ct.display_name,
            finger0,
            finger1,
            finger2,
            finger3,
            finger4,
            finger5,
            fret0,
            fret1,
            fret2,
            fret3,
            fret4,
            fret5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ebeat {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    /// Measure number, or -1 for a beat inside a measure.
    #[serde(rename = "@measure", default = "sub_beat")]
    pub measure: i16,
}

fn sub_beat() -> i16 {
    -1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@number", default)]
    pub number: i16,
    #[serde(rename = "@startTime", with = "secs")]
    pub time: i32,
}

impl Section {
    pub fn new(name: impl Into<String>, time: i32, number: i16) -> Self {
        Self {
            name: name.into(),
            number,
            time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@code")]
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(rename = "@string0", default)]
    pub string0: i16,
    #[serde(rename = "@string1", default)]
    pub string1: i16,
    #[serde(rename = "@string2", default)]
    pub string2: i16,
    #[serde(rename = "@string3", default)]
    pub string3: i16,
    #[serde(rename = "@string4", default)]
    pub string4: i16,
    #[serde(rename = "@string5", default)]
    pub string5: i16,
}

/// A guitar or bass chart document (`<song>`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "song", rename_all = "camelCase")]
pub struct InstrumentalArrangement {
    #[serde(rename = "@version", default)]
    pub version: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub arrangement: String,
    #[serde(default)]
    pub part: i16,
    #[serde(with = "secs", default)]
    pub offset: i32,
    #[serde(default)]
    pub cent_offset: f32,
    #[serde(with = "secs", default)]
    pub song_length: i32,
    #[serde(default)]
    pub internal_name: String,
    #[serde(default)]
    pub song_name_sort: String,
    #[serde(with = "secs", default)]
    pub start_beat: i32,
    #[serde(default)]
    pub average_tempo: f32,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub capo: i8,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub artist_name_sort: String,
    #[serde(default)]
    pub album_name: String,
    #[serde(default)]
    pub album_name_sort: String,
    #[serde(default)]
    pub album_year: String,
    #[serde(default)]
    pub album_art: String,
    #[serde(default)]
    pub crowd_speed: i8,
    #[serde(default)]
    pub arrangement_properties: ArrangementProperties,
    #[serde(default)]
    pub last_conversion_date_time: String,
    #[serde(rename = "tonebase", default, skip_serializing_if = "Option::is_none")]
    pub tone_base: Option<String>,
    #[serde(rename = "tonea", default, skip_serializing_if = "Option::is_none")]
    pub tone_a: Option<String>,
    #[serde(rename = "toneb", default, skip_serializing_if = "Option::is_none")]
    pub tone_b: Option<String>,
    #[serde(rename = "tonec", default, skip_serializing_if = "Option::is_none")]
    pub tone_c: Option<String>,
    #[serde(rename = "toned", default, skip_serializing_if = "Option::is_none")]
    pub tone_d: Option<String>,
    #[serde(rename = "tones", with = "tone_changes", default)]
    pub tone_changes: Vec<ToneChange>,
    #[serde(with = "phrases", default)]
    pub phrases: Vec<Phrase>,
    #[serde(with = "phrase_iterations", default)]
    pub phrase_iterations: Vec<PhraseIteration>,
    #[serde(with = "new_linked_diffs", default)]
    pub new_linked_diffs: Vec<NewLinkedDiff>,
    #[serde(with = "linked_diffs", default)]
    pub linked_diffs: Vec<LinkedDiff>,
    #[serde(with = "phrase_properties", default)]
    pub phrase_properties: Vec<PhraseProperty>,
    #[serde(with = "chord_templates", default)]
    pub chord_templates: Vec<ChordTemplate>,
    #[serde(with = "fret_hand_mute_templates", default)]
    pub fret_hand_mute_templates: Vec<FretHandMuteTemplate>,
    #[serde(with = "ebeats", default)]
    pub ebeats: Vec<Ebeat>,
    #[serde(with = "sections", default)]
    pub sections: Vec<Section>,
    #[serde(with = "events", default)]
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription_track: Option<Level>,
    #[serde(with = "levels", default)]
    pub levels: Vec<Level>,
}

counted_list!(tone_changes, ToneChange, "tone");
counted_list!(phrases, Phrase, "phrase");
counted_list!(phrase_iterations, PhraseIteration, "phraseIteration");
counted_list!(new_linked_diffs, NewLinkedDiff, "newLinkedDiff");
counted_list!(linked_diffs, LinkedDiff, "linkedDiff");
counted_list!(phrase_properties, PhraseProperty, "phraseProperty");
counted_list!(chord_templates, ChordTemplate, "chordTemplate");
counted_list!(fret_hand_mute_templates, FretHandMuteTemplate, "fretHandMuteTemplate");
counted_list!(ebeats, Ebeat, "ebeat");
counted_list!(sections, Section, "section");
counted_list!(events, Event, "event");
counted_list!(levels, Level, "level");

impl InstrumentalArrangement {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        xml::load(path.as_ref())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        xml::save(path.as_ref(), self)
    }

    pub fn find_phrase(&self, name: &str) -> Option<PhraseId> {
        self.phrases
            .iter()
            .position(|p| p.is_named(name))
            .map(PhraseId)
    }

    /// Number of the last counted measure, 0 when there is none.
    pub fn last_measure(&self) -> i16 {
        self.ebeats
            .iter()
            .rev()
            .map(|b| b.measure)
            .find(|&m| m > 0)
            .unwrap_or(0)
    }

    /// Time of the first beat, falling back to the declared start beat.
    pub fn first_beat_time(&self) -> i32 {
        self.ebeats
            .first()
            .map(|b| b.time)
            .unwrap_or(self.start_beat)
    }

    pub fn has_multiple_levels(&self) -> bool {
        self.levels.len() > 1
    }

    /// Apply `f` to every phrase id held by phrase iterations, linked
    /// difficulty groups, legacy links and phrase properties.
    pub fn remap_phrase_ids(&mut self, f: impl Fn(PhraseId) -> PhraseId) {
        for pi in &mut self.phrase_iterations {
            pi.phrase_id = f(pi.phrase_id);
        }
        for nld in &mut self.new_linked_diffs {
            for id in &mut nld.phrase_ids {
                *id = f(*id);
            }
        }
        for ld in &mut self.linked_diffs {
            ld.child_id = f(ld.child_id);
            ld.parent_id = f(ld.parent_id);
        }
        for pp in &mut self.phrase_properties {
            pp.phrase_id = f(pp.phrase_id);
        }
    }

    /// Drop every phrase reference to `id` other than phrase iterations.
    pub(crate) fn forget_phrase(&mut self, id: PhraseId) {
        for nld in &mut self.new_linked_diffs {
            nld.phrase_ids.retain(|&p| p != id);
        }
        self.linked_diffs.retain(|ld| ld.child_id != id && ld.parent_id != id);
        self.phrase_properties.retain(|pp| pp.phrase_id != id);
    }

    /// Apply `f` to every chord template id held by chords and hand shapes.
    pub fn remap_chord_ids(&mut self, f: impl Fn(ChordId) -> ChordId) {
        for level in &mut self.levels {
            for chord in &mut level.chords {
                chord.chord_id = f(chord.chord_id);
            }
            for hs in &mut level.hand_shapes {
                hs.chord_id = f(hs.chord_id);
            }
        }
    }

    /// Renumber sections 1..k within each distinct name, in list order.
    pub fn renumber_sections(&mut self) {
        let mut counters: std::collections::HashMap<String, i16> =
            std::collections::HashMap::new();
        for section in &mut self.sections {
            let counter = counters.entry(section.name.clone()).or_insert(0);
            *counter += 1;
            section.number = *counter;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat(time: i32, measure: i16) -> Ebeat {
        Ebeat { time, measure }
    }

    #[test]
    fn test_last_measure_skips_sub_beats() {
        let arr = InstrumentalArrangement {
            ebeats: vec![beat(0, 1), beat(500, -1), beat(1000, 2), beat(1500, -1)],
            ..Default::default()
        };
        assert_eq!(arr.last_measure(), 2);
        assert_eq!(InstrumentalArrangement::default().last_measure(), 0);
    }

    #[test]
    fn test_renumber_sections_per_name() {
        let mut arr = InstrumentalArrangement {
            sections: vec![
                Section::new("riff", 0, 7),
                Section::new("chorus", 10, 1),
                Section::new("riff", 20, 1),
                Section::new("noguitar", 30, 4),
                Section::new("riff", 40, 1),
            ],
            ..Default::default()
        };
        arr.renumber_sections();
        let numbers: Vec<i16> = arr.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 1, 2, 1, 3]);
    }

    #[test]
    fn test_find_phrase_ignores_case() {
        let arr = InstrumentalArrangement {
            phrases: vec![Phrase::new("COUNT", 0), Phrase::new("end", 0)],
            ..Default::default()
        };
        assert_eq!(arr.find_phrase(END_PHRASE), Some(PhraseId(1)));
        assert_eq!(arr.find_phrase(NOGUITAR), None);
    }

    #[test]
    fn test_chord_template_equality_is_structural() {
        let a = ChordTemplate {
            name: "G".into(),
            display_name: "G".into(),
            fingers: [2, 1, -1, -1, 3, 4],
            frets: [3, 2, 0, 0, 3, 3],
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.frets[5] = 0;
        assert_ne!(a, b);
    }
}
