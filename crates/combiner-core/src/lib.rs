pub mod audio;
pub mod chart;
pub mod combine;
pub mod config;
pub mod error;
pub mod project;

pub use audio::{AudioJoin, AudioSegment};
pub use chart::{InstrumentalArrangement, ShowLights, Vocals};
pub use combine::{
    CombineWarning, InstrumentalCombiner, ShowLightsCombiner, VocalsCombiner, add_title_to_lyrics,
};
pub use config::CombineOptions;
pub use error::{Error, Result};
pub use project::{
    ArrangementEntry, ArrangementType, Project, RunReport, ToneContext, Track, run_project,
    validate_single_level,
};
