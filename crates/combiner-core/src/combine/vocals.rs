//! Combination of lyrics documents.

use std::path::Path;

use tracing::{debug, info};

use crate::chart::{Vocal, Vocals};
use crate::config::lyrics::{TITLE_DISPLAY_TIME, TITLE_GAP, TITLE_MIN_DISPLAY_TIME};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct VocalsCombiner {
    combined: Option<Vocals>,
    song_length: i32,
}

impl VocalsCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn combined(&self) -> Option<&Vocals> {
        self.combined.as_ref()
    }

    /// Append the next segment's lyrics; `None` only advances the timeline.
    pub fn add_next(&mut self, next: Option<Vocals>, song_length: i32, trim_amount: i32) {
        let Some(combined) = self.combined.as_mut() else {
            self.combined = Some(next.unwrap_or_default());
            self.song_length = song_length;
            return;
        };

        if let Some(mut next) = next {
            let start_time = self.song_length - trim_amount;
            for vocal in &mut next.vocals {
                vocal.time += start_time;
            }
            combined.vocals.append(&mut next.vocals);
        }

        self.song_length += song_length - trim_amount;
    }

    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let path = path.as_ref();
        let combined = self.combined.ok_or(Error::EmptyArrangement)?;
        combined.save(path)?;
        info!("Saved combined vocals as {}", path.display());
        Ok(())
    }
}

/// Show `title` word by word in the silence before the first lyric.
///
/// The title starts at `start` and is shown for at most three seconds, ending
/// a short gap before the first lyric. Nothing is added when that leaves
/// less than half a second.
pub fn add_title_to_lyrics(vocals: &mut Vocals, title: &str, start: i32) {
    let mut display_time = TITLE_DISPLAY_TIME;
    if let Some(first) = vocals.vocals.first() {
        display_time = display_time.min(first.time - start - TITLE_GAP);
    }

    let words: Vec<&str> = title.split_whitespace().collect();
    if display_time <= TITLE_MIN_DISPLAY_TIME || words.is_empty() {
        debug!("No room for title '{}' before the first lyric", title);
        return;
    }

    let length = display_time / words.len() as i32;
    let title_vocals = words
        .iter()
        .enumerate()
        .map(|(i, word)| Vocal::new(start + length * i as i32, length, *word));
    vocals.vocals.splice(0..0, title_vocals);
}
