//! Arrangement combination engine.
//!
//! Segments are added in performance order to one combiner per output
//! document. Instrumental segments go through rebasing, tone merging and
//! the cleanup passes in `dedup` and `coerce`; vocals and show lights are
//! only shifted in time.

pub mod coerce;
pub mod condense;
pub mod dedup;
mod instrumental;
pub mod rebase;
mod showlights;
pub mod tones;
mod vocals;

use std::fmt;

pub use instrumental::InstrumentalCombiner;
pub use showlights::ShowLightsCombiner;
pub use vocals::{VocalsCombiner, add_title_to_lyrics};

/// Non-fatal problem found while combining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineWarning {
    /// A fifth distinct tone appeared; its change was kept but no palette
    /// slot could be assigned.
    ToneCapacity { tone: String, time: i32 },
}

impl fmt::Display for CombineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineWarning::ToneCapacity { tone, time } => write!(
                f,
                "Too many tones: '{}' at {} could not be added to the tone palette",
                tone,
                crate::chart::xml::secs::to_string(*time)
            ),
        }
    }
}
