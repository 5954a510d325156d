use serde::{Deserialize, Serialize};

use crate::chart::xml::flag;

/// Playing-style capability flags of an arrangement.
///
/// The representation and path flags (`represent`, `bonus_arr`,
/// `path_lead`, `path_rhythm`, `path_bass`) and the route mask describe the
/// arrangement itself, not its content, and are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrangementProperties {
    #[serde(rename = "@represent", with = "flag", default)]
    pub represent: bool,
    #[serde(rename = "@bonusArr", with = "flag", default)]
    pub bonus_arr: bool,
    #[serde(rename = "@standardTuning", with = "flag", default)]
    pub standard_tuning: bool,
    #[serde(rename = "@nonStandardChords", with = "flag", default)]
    pub non_standard_chords: bool,
    #[serde(rename = "@barreChords", with = "flag", default)]
    pub barre_chords: bool,
    #[serde(rename = "@powerChords", with = "flag", default)]
    pub power_chords: bool,
    #[serde(rename = "@dropDPower", with = "flag", default)]
    pub drop_d_power: bool,
    #[serde(rename = "@openChords", with = "flag", default)]
    pub open_chords: bool,
    #[serde(rename = "@fingerPicking", with = "flag", default)]
    pub finger_picking: bool,
    #[serde(rename = "@pickDirection", with = "flag", default)]
    pub pick_direction: bool,
    #[serde(rename = "@doubleStops", with = "flag", default)]
    pub double_stops: bool,
    #[serde(rename = "@palmMutes", with = "flag", default)]
    pub palm_mutes: bool,
    #[serde(rename = "@harmonics", with = "flag", default)]
    pub harmonics: bool,
    #[serde(rename = "@pinchHarmonics", with = "flag", default)]
    pub pinch_harmonics: bool,
    #[serde(rename = "@hopo", with = "flag", default)]
    pub hopo: bool,
    #[serde(rename = "@tremolo", with = "flag", default)]
    pub tremolo: bool,
    #[serde(rename = "@slides", with = "flag", default)]
    pub slides: bool,
    #[serde(rename = "@unpitchedSlides", with = "flag", default)]
    pub unpitched_slides: bool,
    #[serde(rename = "@bends", with = "flag", default)]
    pub bends: bool,
    #[serde(rename = "@tapping", with = "flag", default)]
    pub tapping: bool,
    #[serde(rename = "@vibrato", with = "flag", default)]
    pub vibrato: bool,
    #[serde(rename = "@fretHandMutes", with = "flag", default)]
    pub fret_hand_mutes: bool,
    #[serde(rename = "@slapPop", with = "flag", default)]
    pub slap_pop: bool,
    #[serde(rename = "@twoFingerPicking", with = "flag", default)]
    pub two_finger_picking: bool,
    #[serde(rename = "@fifthsAndOctaves", with = "flag", default)]
    pub fifths_and_octaves: bool,
    #[serde(rename = "@syncopation", with = "flag", default)]
    pub syncopation: bool,
    #[serde(rename = "@bassPick", with = "flag", default)]
    pub bass_pick: bool,
    #[serde(rename = "@sustain", with = "flag", default)]
    pub sustain: bool,
    #[serde(rename = "@pathLead", with = "flag", default)]
    pub path_lead: bool,
    #[serde(rename = "@pathRhythm", with = "flag", default)]
    pub path_rhythm: bool,
    #[serde(rename = "@pathBass", with = "flag", default)]
    pub path_bass: bool,
    #[serde(rename = "@routeMask", default)]
    pub route_mask: u8,
}

impl ArrangementProperties {
    /// OR every content flag of `other` into `self`.
    pub fn merge(&mut self, other: &ArrangementProperties) {
        self.standard_tuning |= other.standard_tuning;
        self.non_standard_chords |= other.non_standard_chords;
        self.barre_chords |= other.barre_chords;
        self.power_chords |= other.power_chords;
        self.drop_d_power |= other.drop_d_power;
        self.open_chords |= other.open_chords;
        self.finger_picking |= other.finger_picking;
        self.pick_direction |= other.pick_direction;
        self.double_stops |= other.double_stops;
        self.palm_mutes |= other.palm_mutes;
        self.harmonics |= other.harmonics;
        self.pinch_harmonics |= other.pinch_harmonics;
        self.hopo |= other.hopo;
        self.tremolo |= other.tremolo;
        self.slides |= other.slides;
        self.unpitched_slides |= other.unpitched_slides;
        self.bends |= other.bends;
        self.tapping |= other.tapping;
        self.vibrato |= other.vibrato;
        self.fret_hand_mutes |= other.fret_hand_mutes;
        self.slap_pop |= other.slap_pop;
        self.two_finger_picking |= other.two_finger_picking;
        self.fifths_and_octaves |= other.fifths_and_octaves;
        self.syncopation |= other.syncopation;
        self.bass_pick |= other.bass_pick;
        self.sustain |= other.sustain;
    }
}
