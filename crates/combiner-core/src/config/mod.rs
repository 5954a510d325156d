//! Combination options and fixed limits.
//!
//! - `CombineOptions` - per-run switches, embeddable in a project file
//! - Section, tone, and lyric title constants

use serde::{Deserialize, Serialize};

/// Limits imposed by the game engine on a combined arrangement.
pub mod limits {
    /// Maximum number of phrase iterations when coercing phrases.
    pub const MAX_PHRASE_ITERATIONS: usize = 100;

    /// Number of alternate tone slots (A-D) in a tone palette.
    pub const TONE_SLOTS: usize = 4;
}

/// Lyric title cue configuration. All values are milliseconds.
pub mod lyrics {
    /// How long the track title is displayed at most.
    pub const TITLE_DISPLAY_TIME: i32 = 3000;

    /// Titles shorter than this are not added at all.
    pub const TITLE_MIN_DISPLAY_TIME: i32 = 500;

    /// Gap kept between the title and the first real lyric.
    pub const TITLE_GAP: i32 = 100;

    /// Note value used for vocals without pitch information.
    pub const DEFAULT_VOCAL_NOTE: u8 = 254;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombineOptions {
    /// Reduce phrases/sections to the engine limit when there is a single level.
    pub coerce_phrases: bool,
    /// Insert "N. Title" cues into the combined vocals.
    pub add_track_names_to_lyrics: bool,
    /// Condense every instrumental segment into a single phrase.
    pub condense: bool,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            coerce_phrases: true,
            add_track_names_to_lyrics: true,
            condense: false,
        }
    }
}
