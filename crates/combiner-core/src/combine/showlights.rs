//! Combination of show light documents.

use std::path::Path;

use tracing::info;

use crate::chart::ShowLights;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct ShowLightsCombiner {
    combined: Option<ShowLights>,
    song_length: i32,
}

impl ShowLightsCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combined(&self) -> Option<&ShowLights> {
        self.combined.as_ref()
    }

    pub fn add_next(&mut self, mut next: ShowLights, song_length: i32, trim_amount: i32) {
        let Some(combined) = self.combined.as_mut() else {
            self.combined = Some(next);
            self.song_length = song_length;
            return;
        };

        let start_time = self.song_length - trim_amount;
        for light in &mut next.lights {
            light.time += start_time;
        }
        combined.lights.append(&mut next.lights);
        self.song_length += song_length - trim_amount;
    }

    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let path = path.as_ref();
        let combined = self.combined.ok_or(Error::EmptyArrangement)?;
        combined.save(path)?;
        info!("Saved combined show lights as {}", path.display());
        Ok(())
    }
}
