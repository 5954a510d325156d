use serde::{Deserialize, Serialize};

use crate::chart::ids::ChordId;
use crate::chart::xml::{counted_list, flag, secs};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendValue {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@step", default)]
    pub step: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@string", default)]
    pub string: i8,
    #[serde(rename = "@fret", default)]
    pub fret: i8,
    #[serde(rename = "@sustain", with = "secs", default)]
    pub sustain: i32,
    #[serde(rename = "@bend", default)]
    pub bend: f32,
    #[serde(rename = "@slideTo", default = "no_fret")]
    pub slide_to: i8,
    #[serde(rename = "@slideUnpitchTo", default = "no_fret")]
    pub slide_unpitch_to: i8,
    #[serde(rename = "@leftHand", default = "no_fret")]
    pub left_hand: i8,
    #[serde(rename = "@rightHand", default = "no_fret")]
    pub right_hand: i8,
    #[serde(rename = "@tap", default)]
    pub tap: i8,
    #[serde(rename = "@pickDirection", default)]
    pub pick_direction: i8,
    #[serde(rename = "@linkNext", with = "flag", default)]
    pub link_next: bool,
    #[serde(rename = "@accent", with = "flag", default)]
    pub accent: bool,
    #[serde(rename = "@hammerOn", with = "flag", default)]
    pub hammer_on: bool,
    #[serde(rename = "@pullOff", with = "flag", default)]
    pub pull_off: bool,
    #[serde(rename = "@harmonic", with = "flag", default)]
    pub harmonic: bool,
    #[serde(rename = "@harmonicPinch", with = "flag", default)]
    pub harmonic_pinch: bool,
    #[serde(rename = "@hopo", with = "flag", default)]
    pub hopo: bool,
    #[serde(rename = "@ignore", with = "flag", default)]
    pub ignore: bool,
    #[serde(rename = "@mute", with = "flag", default)]
    pub mute: bool,
    #[serde(rename = "@palmMute", with = "flag", default)]
    pub palm_mute: bool,
    #[serde(rename = "@pluck", default = "no_fret")]
    pub pluck: i8,
    #[serde(rename = "@slap", default = "no_fret")]
    pub slap: i8,
    #[serde(rename = "@tremolo", with = "flag", default)]
    pub tremolo: bool,
    #[serde(rename = "@vibrato", default)]
    pub vibrato: u8,
    #[serde(
        rename = "bendValues",
        with = "bend_values",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bend_values: Vec<BendValue>,
}

fn no_fret() -> i8 {
    -1
}

counted_list!(bend_values, BendValue, "bendValue");

impl Note {
    pub fn is_bend(&self) -> bool {
        !self.bend_values.is_empty()
    }

    pub(crate) fn shift(&mut self, by: i32) {
        self.time += by;
        for bv in &mut self.bend_values {
            bv.time += by;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chord {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@chordId")]
    pub chord_id: ChordId,
    #[serde(rename = "@linkNext", with = "flag", default)]
    pub link_next: bool,
    #[serde(rename = "@accent", with = "flag", default)]
    pub accent: bool,
    #[serde(rename = "@fretHandMute", with = "flag", default)]
    pub fret_hand_mute: bool,
    #[serde(rename = "@highDensity", with = "flag", default)]
    pub high_density: bool,
    #[serde(rename = "@ignore", with = "flag", default)]
    pub ignore: bool,
    #[serde(rename = "@palmMute", with = "flag", default)]
    pub palm_mute: bool,
    #[serde(rename = "@hopo", with = "flag", default)]
    pub hopo: bool,
    #[serde(rename = "@strum", default)]
    pub strum: String,
    #[serde(rename = "chordNote", default, skip_serializing_if = "Vec::is_empty")]
    pub chord_notes: Vec<Note>,
}

impl Chord {
    pub(crate) fn shift(&mut self, by: i32, chord_offset: usize) {
        self.time += by;
        self.chord_id = self.chord_id.offset(chord_offset);
        for cn in &mut self.chord_notes {
            cn.shift(by);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@fret")]
    pub fret: i8,
    #[serde(rename = "@width", default = "default_anchor_width")]
    pub width: f32,
}

fn default_anchor_width() -> f32 {
    4.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandShape {
    #[serde(rename = "@chordId")]
    pub chord_id: ChordId,
    #[serde(rename = "@startTime", with = "secs")]
    pub start_time: i32,
    #[serde(rename = "@endTime", with = "secs")]
    pub end_time: i32,
}

impl HandShape {
    pub(crate) fn shift(&mut self, by: i32, chord_offset: usize) {
        self.start_time += by;
        self.end_time += by;
        self.chord_id = self.chord_id.offset(chord_offset);
    }
}

/// One difficulty level of an arrangement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Level {
    #[serde(rename = "@difficulty")]
    pub difficulty: i8,
    #[serde(with = "notes", default)]
    pub notes: Vec<Note>,
    #[serde(with = "chords", default)]
    pub chords: Vec<Chord>,
    #[serde(with = "anchors", default)]
    pub anchors: Vec<Anchor>,
    #[serde(rename = "handShapes", with = "hand_shapes", default)]
    pub hand_shapes: Vec<HandShape>,
}

counted_list!(notes, Note, "note");
counted_list!(chords, Chord, "chord");
counted_list!(anchors, Anchor, "anchor");
counted_list!(hand_shapes, HandShape, "handShape");

impl Level {
    pub fn new(difficulty: i8) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
            && self.chords.is_empty()
            && self.anchors.is_empty()
            && self.hand_shapes.is_empty()
    }

    /// Append another level's content after this level's content.
    pub fn append(&mut self, other: &mut Level) {
        self.notes.append(&mut other.notes);
        self.chords.append(&mut other.chords);
        self.anchors.append(&mut other.anchors);
        self.hand_shapes.append(&mut other.hand_shapes);
    }

    /// Copies of everything in `[start, end)`.
    pub fn window(&self, start: i32, end: i32) -> Level {
        let within = |t: i32| t >= start && t < end;
        Level {
            difficulty: self.difficulty,
            notes: self.notes.iter().filter(|n| within(n.time)).cloned().collect(),
            chords: self.chords.iter().filter(|c| within(c.time)).cloned().collect(),
            anchors: self.anchors.iter().filter(|a| within(a.time)).cloned().collect(),
            hand_shapes: self
                .hand_shapes
                .iter()
                .filter(|hs| within(hs.start_time))
                .cloned()
                .collect(),
        }
    }

    pub fn sort_by_time(&mut self) {
        self.notes.sort_by_key(|n| n.time);
        self.chords.sort_by_key(|c| c.time);
        self.anchors.sort_by_key(|a| a.time);
        self.hand_shapes.sort_by_key(|hs| hs.start_time);
    }
}
