//! Chart document model and its XML codec.
//!
//! - `InstrumentalArrangement` - guitar/bass chart (`<song>`)
//! - `Level` and its notes, chords, anchors and hand shapes
//! - `Vocals`, `ShowLights` - timeline-only documents
//! - `PhraseId`, `ChordId` - typed cross-reference indices

mod arrangement;
mod ids;
mod level;
mod properties;
mod showlights;
mod tones;
mod vocals;
pub(crate) mod xml;

pub use arrangement::*;
pub use ids::*;
pub use level::*;
pub use properties::*;
pub use showlights::*;
pub use tones::*;
pub use vocals::*;
