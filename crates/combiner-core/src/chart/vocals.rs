use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::xml::{self, secs};
use crate::config::lyrics::DEFAULT_VOCAL_NOTE;
use crate::error::Result;

/// One lyric syllable or word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocal {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@note", default = "default_note")]
    pub note: u8,
    #[serde(rename = "@length", with = "secs")]
    pub length: i32,
    #[serde(rename = "@lyric")]
    pub lyric: String,
}

fn default_note() -> u8 {
    DEFAULT_VOCAL_NOTE
}

impl Vocal {
    pub fn new(time: i32, length: i32, lyric: impl Into<String>) -> Self {
        Self {
            time,
            note: DEFAULT_VOCAL_NOTE,
            length,
            lyric: lyric.into(),
        }
    }
}

/// A lyrics document (`<vocals>`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocals {
    pub vocals: Vec<Vocal>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "vocals")]
struct VocalsFile {
    #[serde(rename = "@count", default)]
    count: usize,
    #[serde(rename = "vocal", default)]
    vocals: Vec<Vocal>,
}

impl Vocals {
    pub fn new(vocals: Vec<Vocal>) -> Self {
        Self { vocals }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file: VocalsFile = xml::load(path.as_ref())?;
        Ok(Self {
            vocals: file.vocals,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = VocalsFile {
            count: self.vocals.len(),
            vocals: self.vocals.clone(),
        };
        xml::save(path.as_ref(), &file)
    }

    pub fn len(&self) -> usize {
        self.vocals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocals.is_empty()
    }
}
